//! Dashboard
//!
//! Headless view-model for the dashboard screen. It owns the state the page
//! would otherwise keep in globals (language, voice panel, current rating,
//! last route search) and is only reachable through the session guard.

pub mod conditions;
pub mod feedback;
pub mod routing;
pub mod voice;

pub use conditions::{sample_traffic_alerts, TrafficAlert, TrafficLevel, WeatherReport};
pub use feedback::{FeedbackError, FeedbackForm, FeedbackLog, FeedbackRecord, FeedbackResult};
pub use routing::{eco_score, route_options, MapOverlay, PollutionLevel, RouteOption};
pub use voice::{Language, Topic, Utterance, VoiceReply, VoiceResponder};

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{GuardDecision, Session, SessionGuard, SessionManager, View};
use crate::remote::ApiClient;
use crate::store::{KeyValueStore, StoreError};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Please enter both starting point and destination")]
    MissingEndpoints,

    #[error("No route option at index {0}")]
    RouteNotFound(usize),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Stat tiles updated by route selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub co2_level: Option<String>,
    pub vehicle_density: Option<PollutionLevel>,
}

/// Result of entering the dashboard
pub enum DashboardEntry<S: ?Sized> {
    /// No session: navigate away and do nothing else
    Redirect(View),
    Ready(Dashboard<S>),
}

pub struct Dashboard<S: ?Sized> {
    sessions: SessionManager<S>,
    session: Session,
    feedback_log: FeedbackLog<S>,
    feedback_form: FeedbackForm,
    responder: VoiceResponder,
    language: Language,
    voice_open: bool,
    routes: Vec<RouteOption>,
    overlay: MapOverlay,
    stats: DashboardStats,
    remote: Option<ApiClient>,
}

impl<S: KeyValueStore + ?Sized> Dashboard<S> {
    /// Run the session guard and bind a dashboard to the session it finds
    pub fn enter(store: Arc<S>) -> DashboardResult<DashboardEntry<S>> {
        let session = match SessionGuard::new(Arc::clone(&store)).check()? {
            GuardDecision::Redirect(view) => return Ok(DashboardEntry::Redirect(view)),
            GuardDecision::Proceed(session) => session,
        };

        tracing::debug!(email = %session.email, "Entering dashboard");

        Ok(DashboardEntry::Ready(Self {
            sessions: SessionManager::new(Arc::clone(&store)),
            session,
            feedback_log: FeedbackLog::new(store),
            feedback_form: FeedbackForm::new(),
            responder: VoiceResponder::new(),
            language: Language::default(),
            voice_open: false,
            routes: Vec::new(),
            overlay: MapOverlay::initial(),
            stats: DashboardStats::default(),
            remote: None,
        }))
    }

    /// Forward submitted feedback to the remote API as well
    pub fn with_remote(mut self, client: ApiClient) -> Self {
        self.remote = Some(client);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, code: &str) -> DashboardResult<Language> {
        let language = code
            .parse::<Language>()
            .map_err(|_| DashboardError::UnsupportedLanguage(code.to_string()))?;
        self.language = language;
        Ok(language)
    }

    // ============================================
    // Routes
    // ============================================

    /// Simulated search. Replaces the previous result set and map overlay.
    pub fn search_routes(&mut self, from: &str, to: &str) -> DashboardResult<&[RouteOption]> {
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(DashboardError::MissingEndpoints);
        }

        self.routes = route_options();
        self.overlay = MapOverlay::for_routes(&self.routes);
        tracing::debug!(from = %from, to = %to, options = self.routes.len(), "Route search");

        Ok(&self.routes)
    }

    pub fn routes(&self) -> &[RouteOption] {
        &self.routes
    }

    pub fn overlay(&self) -> &MapOverlay {
        &self.overlay
    }

    /// Pick a route from the last search. Updates the stat tiles and returns
    /// the navigation announcement.
    pub fn select_route(&mut self, index: usize) -> DashboardResult<Utterance> {
        let route = self
            .routes
            .get(index)
            .ok_or(DashboardError::RouteNotFound(index))?;

        self.stats = DashboardStats {
            co2_level: Some(route.co2()),
            vehicle_density: Some(route.pollution),
        };

        let text = format!(
            "Route selected. {}. Distance {}. Estimated time {}.",
            route.name,
            route.distance(),
            route.time()
        );
        Ok(Utterance::new(text, self.language))
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    // ============================================
    // Panels
    // ============================================

    pub fn weather(&self) -> WeatherReport {
        WeatherReport::sample()
    }

    pub fn traffic_alerts(&self) -> Vec<TrafficAlert> {
        sample_traffic_alerts()
    }

    // ============================================
    // Voice assistant
    // ============================================

    /// Open or close the voice panel; returns the new state
    pub fn toggle_voice(&mut self) -> bool {
        self.voice_open = !self.voice_open;
        self.voice_open
    }

    pub fn is_voice_open(&self) -> bool {
        self.voice_open
    }

    /// Answer a command in the current language, with the matching utterance
    pub fn voice_command(&self, text: &str) -> (VoiceReply, Utterance) {
        let reply = self.responder.respond(text, self.language);
        let utterance = Utterance::new(reply.response.clone(), self.language);
        (reply, utterance)
    }

    // ============================================
    // Feedback
    // ============================================

    /// Click a star (0-based)
    pub fn rate(&mut self, star: usize) -> DashboardResult<u8> {
        Ok(self.feedback_form.select_star(star)?)
    }

    pub fn feedback_form(&self) -> &FeedbackForm {
        &self.feedback_form
    }

    /// Store the feedback locally, then forward it to the remote if one is
    /// configured. A remote failure is logged and otherwise ignored.
    pub async fn submit_feedback(&mut self, text: &str) -> DashboardResult<FeedbackRecord> {
        self.feedback_form.set_text(text);
        let record = self
            .feedback_form
            .submit(&self.session.email, &self.feedback_log)?;

        if let Some(client) = &self.remote {
            if let Err(e) = client.submit_feedback(&record).await {
                tracing::warn!(error = %e, "Could not forward feedback to remote");
            }
        }

        Ok(record)
    }

    /// End the session; the dashboard is consumed
    pub fn logout(self) -> DashboardResult<View> {
        Ok(self.sessions.end()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{build_router, ApiConfig, AppState};
    use crate::remote::RemoteConfig;
    use crate::store::{MemoryStore, SqliteStore, CURRENT_USER_KEY};

    fn logged_in() -> (Arc<MemoryStore>, Dashboard<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.set_item(CURRENT_USER_KEY, "asha@gmail.com").unwrap();

        match Dashboard::enter(Arc::clone(&store)).unwrap() {
            DashboardEntry::Ready(dashboard) => (store, dashboard),
            DashboardEntry::Redirect(view) => panic!("unexpected redirect to {}", view),
        }
    }

    #[test]
    fn test_enter_without_session_redirects() {
        let store = Arc::new(MemoryStore::new());
        match Dashboard::enter(store).unwrap() {
            DashboardEntry::Redirect(view) => assert_eq!(view, View::Login),
            DashboardEntry::Ready(_) => panic!("dashboard opened without a session"),
        }
    }

    #[test]
    fn test_search_requires_both_endpoints() {
        let (_store, mut dashboard) = logged_in();

        let err = dashboard.search_routes("Home", " ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter both starting point and destination"
        );
        assert!(dashboard.routes().is_empty());
        assert_eq!(dashboard.overlay(), &MapOverlay::initial());
    }

    #[test]
    fn test_search_and_select_route() {
        let (_store, mut dashboard) = logged_in();

        let routes = dashboard.search_routes("Home", "Office").unwrap();
        assert_eq!(routes.len(), 3);
        assert_eq!(dashboard.overlay().polylines.len(), 3);

        let utterance = dashboard.select_route(0).unwrap();
        assert_eq!(
            utterance.text,
            "Route selected. Eco Route. Distance 12.5 km. Estimated time 28 min."
        );
        assert_eq!(utterance.lang, "en-US");
        assert_eq!(dashboard.stats().co2_level.as_deref(), Some("1.2 kg"));
        assert_eq!(dashboard.stats().vehicle_density, Some(PollutionLevel::Low));

        assert!(matches!(
            dashboard.select_route(3),
            Err(DashboardError::RouteNotFound(3))
        ));
    }

    #[test]
    fn test_voice_follows_language() {
        let (_store, mut dashboard) = logged_in();
        assert!(dashboard.toggle_voice());

        dashboard.set_language("hi").unwrap();
        let (reply, utterance) = dashboard.voice_command("traffic kaisa hai");
        assert_eq!(reply.topic, Topic::Traffic);
        assert_eq!(utterance.lang, "hi-IN");
        assert_eq!(utterance.text, reply.response);

        assert!(dashboard.set_language("fr").is_err());
        assert_eq!(dashboard.language(), Language::Hi);
        assert!(!dashboard.toggle_voice());
    }

    #[tokio::test]
    async fn test_feedback_uses_session_email() {
        let (_store, mut dashboard) = logged_in();

        let err = dashboard.submit_feedback("Lovely").await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Feedback(FeedbackError::MissingInput)
        ));

        assert_eq!(dashboard.rate(2).unwrap(), 3);
        let record = dashboard.submit_feedback("Lovely").await.unwrap();
        assert_eq!(record.user, "asha@gmail.com");
        assert_eq!(record.rating, 3);
        assert_eq!(dashboard.feedback_form().rating(), 0);
    }

    #[tokio::test]
    async fn test_feedback_forwarded_to_remote() {
        let server_store = Arc::new(SqliteStore::in_memory().unwrap());
        let state = AppState::new(Arc::clone(&server_store), ApiConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        let client = ApiClient::new(RemoteConfig::new(format!("http://{}", addr))).unwrap();

        let (store, dashboard) = logged_in();
        let mut dashboard = dashboard.with_remote(client);

        dashboard.rate(4).unwrap();
        let first = dashboard.submit_feedback("Great routes").await.unwrap();
        dashboard.rate(1).unwrap();
        let second = dashboard.submit_feedback("Map was slow").await.unwrap();

        let forwarded = FeedbackLog::new(server_store).list().unwrap();
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded, vec![first.clone(), second.clone()]);
        assert_eq!(FeedbackLog::new(store).list().unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_feedback_kept_locally_when_remote_down() {
        let client = ApiClient::new(RemoteConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_ms: 500,
        })
        .unwrap();

        let (store, dashboard) = logged_in();
        let mut dashboard = dashboard.with_remote(client);

        dashboard.rate(2).unwrap();
        let record = dashboard.submit_feedback("Lovely").await.unwrap();

        assert_eq!(record.rating, 3);
        assert_eq!(FeedbackLog::new(store).list().unwrap(), vec![record]);
        assert_eq!(dashboard.feedback_form().rating(), 0);
    }

    #[test]
    fn test_panels() {
        let (_store, dashboard) = logged_in();
        assert_eq!(dashboard.weather().summary(), "28°C, Partly Cloudy, AQI: Good");
        assert_eq!(dashboard.traffic_alerts().len(), 2);
    }

    #[test]
    fn test_logout_clears_session() {
        let (store, dashboard) = logged_in();
        assert_eq!(dashboard.logout().unwrap(), View::Login);
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());
    }
}
