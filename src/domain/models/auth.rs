use serde::{Deserialize, Serialize};

/// Role tag granting organizer/administrator rights in the youth module.
pub const STAFF_ROLE: &str = "SK_STAFF";

/// Access token claims minted by the portal identity service. This service
/// only verifies them; it never issues tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub name: String,
    pub roles: Vec<String>,
}

/// The authenticated caller, passed explicitly into every operation.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl Caller {
    pub fn is_staff(&self) -> bool {
        self.roles.iter().any(|r| r == STAFF_ROLE)
    }
}
