use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims the client may not choose for itself
const RESERVED_CLAIMS: [&str; 3] = ["exp", "iat", "nbf"];

/// Body of the token issuing endpoint: the signed-in user as the client knows it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenRequest {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl AccessTokenRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            profile: Map::new(),
        }
    }

    /// Profile fields with the registered time claims removed
    pub fn signable_profile(&self) -> Map<String, Value> {
        let mut profile = self.profile.clone();
        for claim in RESERVED_CLAIMS {
            profile.remove(claim);
        }
        profile
    }
}

/// JWT claims: the client payload plus issue and expiry timestamps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
