//! EcoRoute CLI
//!
//! Command-line client for EcoRoute. Each invocation is one UI event:
//! - Sign up, log in and log out
//! - Check a password against the signup rules
//! - Show the dashboard panels
//! - Search and select routes
//! - Ask the voice assistant
//! - Rate the app

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use ecoroute::auth::validation::PasswordRules;
use ecoroute::auth::{AuthError, AuthFlow, SignupForm, View};
use ecoroute::config::{generate_default_config, Config};
use ecoroute::dashboard::{Dashboard, DashboardEntry};
use ecoroute::remote::ApiClient;
use ecoroute::store::FileStore;

#[derive(Parser)]
#[command(name = "ecoroute")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Eco-friendly route planning")]
#[command(long_about = "EcoRoute finds greener routes, reports weather and traffic,\nanswers voice commands and works offline when the API is down.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Never contact the API
    #[arg(long, global = true)]
    pub offline: bool,

    /// Directory for local storage
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Password confirmation (must match)
        #[arg(long)]
        confirm: String,
    },

    /// Log in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show which password rules a password meets
    CheckPassword {
        password: String,
    },

    /// Show the dashboard panels
    Dashboard,

    /// Search routes and optionally select one
    Route {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Route to select (1-based)
        #[arg(short, long)]
        select: Option<usize>,
    },

    /// Send a command to the voice assistant
    Voice {
        /// Command text
        command: Vec<String>,
        /// Language code (en, hi, kn, ta, te, ml, bn, mr, gu, pa)
        #[arg(short, long, default_value = "en")]
        lang: String,
    },

    /// Rate EcoRoute
    Feedback {
        /// Stars, 1-5
        #[arg(short, long)]
        rating: usize,
        /// Feedback text
        text: Vec<String>,
    },

    /// Check the API connection
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_logged(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.api_url {
        config.client.api_url = url;
    }
    if cli.offline {
        config.client.offline = true;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    config.logging.init();

    let store = Arc::new(
        FileStore::in_dir(&config.storage.data_dir).context("Failed to open local storage")?,
    );
    let remote = if config.client.offline {
        None
    } else {
        Some(ApiClient::new(config.client.remote()).context("Failed to build HTTP client")?)
    };

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
            confirm,
        } => {
            let flow = auth_flow(&store, &remote);
            let form = SignupForm::new(name, email, password, confirm);

            match flow.signup(&form).await {
                Ok(outcome) => {
                    println!("Account created ({:?}). Please log in.", outcome.source);
                }
                Err(e) => return Err(auth_failure(e)),
            }
        }

        Commands::Login { email, password } => {
            let flow = auth_flow(&store, &remote);

            match flow.login(&email, &password).await {
                Ok(outcome) => {
                    println!("Logged in as {} ({:?})", outcome.email, outcome.source);
                }
                Err(e) => return Err(auth_failure(e)),
            }
        }

        Commands::Logout => {
            let view = auth_flow(&store, &remote).logout()?;
            println!("Logged out. Next: {}", view);
        }

        Commands::CheckPassword { password } => {
            let rules = PasswordRules::check(&password);
            for (rule, ok) in rules.indicators() {
                println!("  [{}] {}", if ok { "x" } else { " " }, rule.label());
            }
            if !rules.all_satisfied() {
                std::process::exit(1);
            }
        }

        Commands::Dashboard => {
            let dashboard = enter(&store, &remote)?;
            let weather = dashboard.weather();

            println!("Welcome, {}", dashboard.session().greeting_name);
            println!();
            println!("Weather: {}", weather.summary());
            println!("Humidity: {}%", weather.humidity);
            println!();
            println!("Traffic alerts:");
            for alert in dashboard.traffic_alerts() {
                println!("  [{:?}] {}", alert.level, alert);
            }
        }

        Commands::Route { from, to, select } => {
            let mut dashboard = enter(&store, &remote)?;

            let routes = dashboard.search_routes(&from, &to)?;
            println!(
                "{:<3} {:<16} {:<10} {:<8} {:<10} {:<8} {}",
                "#", "Route", "Distance", "Time", "Pollution", "CO2", "Eco score"
            );
            println!("{}", "-".repeat(66));
            for (i, route) in routes.iter().enumerate() {
                println!(
                    "{:<3} {:<16} {:<10} {:<8} {:<10} {:<8} {}",
                    i + 1,
                    route.name,
                    route.distance(),
                    route.time(),
                    route.pollution.to_string(),
                    route.co2(),
                    route.eco_score()
                );
            }

            if let Some(choice) = select {
                if choice == 0 {
                    bail!("Route numbers start at 1");
                }
                let utterance = dashboard.select_route(choice - 1)?;
                let stats = dashboard.stats();

                println!();
                println!("{}", utterance.text);
                if let (Some(co2), Some(density)) = (&stats.co2_level, stats.vehicle_density) {
                    println!("CO2 level: {}  Vehicle density: {}", co2, density);
                }
            }
        }

        Commands::Voice { command, lang } => {
            let mut dashboard = enter(&store, &remote)?;
            dashboard.set_language(&lang)?;

            let (reply, utterance) = dashboard.voice_command(&command.join(" "));
            println!("{}", reply.response);
            tracing::debug!(topic = ?reply.topic, lang = %utterance.lang, rate = utterance.rate, "Speaking");
        }

        Commands::Feedback { rating, text } => {
            let mut dashboard = enter(&store, &remote)?;
            if rating == 0 {
                bail!("Please provide feedback and rating");
            }
            dashboard.rate(rating - 1)?;

            let record = dashboard.submit_feedback(&text.join(" ")).await?;
            println!("Thank you for your feedback! ({} stars)", record.rating);
        }

        Commands::Status => {
            let Some(client) = &remote else {
                println!("Offline mode: the API is not contacted");
                return Ok(());
            };

            match client.test_connection().await {
                Ok(response) => {
                    println!("EcoRoute API at {}", client.config().base_url);
                    println!("  {} ({})", response.message, response.timestamp);
                }
                Err(e) => {
                    eprintln!("Cannot connect to EcoRoute API at {}", client.config().base_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Login and signup will use local storage until it is reachable.");
                    eprintln!("Start the server with:");
                    eprintln!("  ecoroute-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            if let Some(path) = output {
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", content);
            }
        }
    }

    Ok(())
}

fn auth_flow(store: &Arc<FileStore>, remote: &Option<ApiClient>) -> AuthFlow<FileStore> {
    match remote {
        Some(client) => AuthFlow::with_remote(Arc::clone(store), Arc::new(client.clone())),
        None => AuthFlow::offline(Arc::clone(store)),
    }
}

/// Open the dashboard or fail with the redirect target
fn enter(
    store: &Arc<FileStore>,
    remote: &Option<ApiClient>,
) -> anyhow::Result<Dashboard<FileStore>> {
    match Dashboard::enter(Arc::clone(store))? {
        DashboardEntry::Ready(dashboard) => Ok(match remote {
            Some(client) => dashboard.with_remote(client.clone()),
            None => dashboard,
        }),
        DashboardEntry::Redirect(View::Login) => bail!("Not logged in. Run `ecoroute login` first."),
        DashboardEntry::Redirect(view) => bail!("Redirected to {}", view),
    }
}

/// Print field messages one per line; other errors pass through
fn auth_failure(err: AuthError) -> anyhow::Error {
    if let Some(errors) = err.field_errors() {
        for message in errors.messages() {
            eprintln!("  {}", message);
        }
        return anyhow::anyhow!("Please fix the fields above");
    }
    err.into()
}
