use serde::{Deserialize, Deserializer, Serialize};

/// Role reported by the backend at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    User,
    Instructor,
    Supplier,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::User => "user",
            UserType::Instructor => "instructor",
            UserType::Supplier => "supplier",
        }
    }

    /// Parses a stored user type. Unknown roles fall back to [`UserType::User`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "supplier" => UserType::Supplier,
            "instructor" => UserType::Instructor,
            _ => UserType::User,
        }
    }
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UserType::parse(&raw))
    }
}

/// The authenticated identity. Created on login, cleared on logout.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub user_type: UserType,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>, user_type: UserType) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            user_type,
        }
    }

    pub fn is_supplier(&self) -> bool {
        self.user_type == UserType::Supplier
    }
}

// Keeps the token out of logs and panics.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("user_type", &self.user_type)
            .finish_non_exhaustive()
    }
}
