//! Form validation
//!
//! Email and password checks shared by signup, login and the server's auth
//! routes. All checks are pure: nothing here touches a store or the network.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Every account email must end with this suffix
pub const REQUIRED_EMAIL_SUFFIX: &str = "@gmail.com";

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

static SPECIAL_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("valid special-char regex"));

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("valid digit regex"));

static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid uppercase regex"));

/// Check the required email suffix
pub fn is_valid_email(email: &str) -> bool {
    email.ends_with(REQUIRED_EMAIL_SUFFIX)
}

/// One of the four password requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordRule {
    Length,
    Special,
    Number,
    Uppercase,
}

impl PasswordRule {
    /// All rules, in reporting order
    pub fn all() -> &'static [PasswordRule] {
        &[
            PasswordRule::Length,
            PasswordRule::Special,
            PasswordRule::Number,
            PasswordRule::Uppercase,
        ]
    }

    /// Indicator label shown next to the password field
    pub fn label(&self) -> &'static str {
        match self {
            PasswordRule::Length => "At least 8 characters",
            PasswordRule::Special => "One special character",
            PasswordRule::Number => "One number",
            PasswordRule::Uppercase => "One uppercase letter",
        }
    }

    /// Error message when this rule fails
    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::Length => "Password must be at least 8 characters",
            PasswordRule::Special => "Password must contain a special character",
            PasswordRule::Number => "Password must contain a number",
            PasswordRule::Uppercase => "Password must contain an uppercase letter",
        }
    }
}

/// Result of checking a password against each rule independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordRules {
    pub length: bool,
    pub special: bool,
    pub number: bool,
    pub uppercase: bool,
}

impl PasswordRules {
    pub fn check(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            special: SPECIAL_CHAR.is_match(password),
            number: DIGIT.is_match(password),
            uppercase: UPPERCASE.is_match(password),
        }
    }

    pub fn is_satisfied(&self, rule: PasswordRule) -> bool {
        match rule {
            PasswordRule::Length => self.length,
            PasswordRule::Special => self.special,
            PasswordRule::Number => self.number,
            PasswordRule::Uppercase => self.uppercase,
        }
    }

    pub fn all_satisfied(&self) -> bool {
        self.length && self.special && self.number && self.uppercase
    }

    pub fn first_failure(&self) -> Option<PasswordRule> {
        PasswordRule::all()
            .iter()
            .copied()
            .find(|rule| !self.is_satisfied(*rule))
    }

    /// Indicator state for each rule, in display order
    pub fn indicators(&self) -> Vec<(PasswordRule, bool)> {
        PasswordRule::all()
            .iter()
            .map(|rule| (*rule, self.is_satisfied(*rule)))
            .collect()
    }
}

/// Per-field validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.confirm_password.is_none()
    }

    /// All messages in field order
    pub fn messages(&self) -> Vec<&str> {
        [&self.email, &self.password, &self.confirm_password]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

fn email_error(email: &str) -> Option<String> {
    if is_valid_email(email) {
        None
    } else {
        Some(format!("Email must end with {}", REQUIRED_EMAIL_SUFFIX))
    }
}

/// Validate a signup form. Every field is checked; each reports its first failure.
pub fn validate_signup(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationErrors> {
    let errors = ValidationErrors {
        email: email_error(email),
        password: PasswordRules::check(password)
            .first_failure()
            .map(|rule| rule.message().to_string()),
        confirm_password: (password != confirm_password)
            .then(|| "Passwords do not match".to_string()),
    };
    errors.into_result()
}

/// Validate a login form. Password format is not re-checked at login.
pub fn validate_login(email: &str) -> Result<(), ValidationErrors> {
    ValidationErrors {
        email: email_error(email),
        ..Default::default()
    }
    .into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_suffix() {
        assert!(is_valid_email("asha@gmail.com"));
        assert!(!is_valid_email("asha@yahoo.com"));
        assert!(!is_valid_email("asha@gmail.com.evil"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_rules_are_independent() {
        let cases = [
            ("aaaaaaaa", PasswordRules { length: true, special: false, number: false, uppercase: false }),
            ("!", PasswordRules { length: false, special: true, number: false, uppercase: false }),
            ("7", PasswordRules { length: false, special: false, number: true, uppercase: false }),
            ("Q", PasswordRules { length: false, special: false, number: false, uppercase: true }),
            ("Passw0rd!", PasswordRules { length: true, special: true, number: true, uppercase: true }),
        ];

        for (password, expected) in cases {
            assert_eq!(PasswordRules::check(password), expected, "password {:?}", password);
        }
    }

    #[test]
    fn test_each_special_character_counts() {
        for c in "!@#$%^&*(),.?\":{}|<>".chars() {
            assert!(PasswordRules::check(&c.to_string()).special, "char {:?}", c);
        }
        assert!(!PasswordRules::check("-_=+~").special);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(!PasswordRules::check("ééééééé").length);
        assert!(PasswordRules::check("éééééééé").length);
    }

    #[test]
    fn test_first_failure_order() {
        assert_eq!(PasswordRules::check("").first_failure(), Some(PasswordRule::Length));
        assert_eq!(
            PasswordRules::check("password").first_failure(),
            Some(PasswordRule::Special)
        );
        assert_eq!(
            PasswordRules::check("password!").first_failure(),
            Some(PasswordRule::Number)
        );
        assert_eq!(
            PasswordRules::check("passw0rd!").first_failure(),
            Some(PasswordRule::Uppercase)
        );
        assert_eq!(PasswordRules::check("Passw0rd!").first_failure(), None);
    }

    #[test]
    fn test_indicators_follow_rule_order() {
        let indicators = PasswordRules::check("Passw0rd").indicators();
        assert_eq!(
            indicators,
            vec![
                (PasswordRule::Length, true),
                (PasswordRule::Special, false),
                (PasswordRule::Number, true),
                (PasswordRule::Uppercase, true),
            ]
        );
    }

    #[test]
    fn test_validate_signup_reports_every_field() {
        let errors = validate_signup("asha@yahoo.com", "short", "other").unwrap_err();
        assert_eq!(errors.email.as_deref(), Some("Email must end with @gmail.com"));
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.confirm_password.as_deref(), Some("Passwords do not match"));
        assert_eq!(errors.messages().len(), 3);
    }

    #[test]
    fn test_validate_signup_ok() {
        assert!(validate_signup("asha@gmail.com", "Passw0rd!", "Passw0rd!").is_ok());
    }

    #[test]
    fn test_validate_login_ignores_password_format() {
        assert!(validate_login("asha@gmail.com").is_ok());
        let errors = validate_login("asha@example.com").unwrap_err();
        assert!(errors.password.is_none());
        assert!(errors.email.is_some());
    }
}
