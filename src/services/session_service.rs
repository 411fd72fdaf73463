use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::info;

/// Smallest password the login form accepts
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Operator credentials supplied by deployment configuration
#[derive(Clone)]
pub struct Credentials {
    pub mobile: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("mobile", &self.mobile)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoginError {
    #[error("Mobile is required")]
    MissingMobile,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    ShortPassword,
    #[error("{}", rejection_message(.mobile_ok, .password_ok))]
    Rejected { mobile_ok: bool, password_ok: bool },
}

fn rejection_message(mobile_ok: &bool, password_ok: &bool) -> String {
    let mut problems = Vec::new();
    if !*mobile_ok {
        problems.push("Invalid Mobile");
    }
    if !*password_ok {
        problems.push("Invalid Password");
    }
    problems.join(", ")
}

/// Logged-in operator. Exists only between a successful login and logout.
#[derive(Debug)]
pub struct Session {
    mobile: String,
    started_at: DateTime<Local>,
}

impl Session {
    /// Compare the submitted pair against the configured credentials.
    /// This is a gate for the console, not a security boundary.
    pub fn login(
        credentials: &Credentials,
        mobile: &str,
        password: &str,
    ) -> Result<Self, LoginError> {
        if mobile.is_empty() {
            return Err(LoginError::MissingMobile);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(LoginError::ShortPassword);
        }

        let mobile_ok = mobile == credentials.mobile;
        let password_ok = password == credentials.password;
        if !(mobile_ok && password_ok) {
            return Err(LoginError::Rejected {
                mobile_ok,
                password_ok,
            });
        }

        info!("Operator {} logged in", mobile);
        Ok(Self {
            mobile: mobile.to_string(),
            started_at: Local::now(),
        })
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Tear the session down
    pub fn end(self) {
        let minutes = (Local::now() - self.started_at).num_minutes();
        info!("Operator {} logged out after {} min", self.mobile, minutes);
    }
}
