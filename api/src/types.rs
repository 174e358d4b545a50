use serde::Deserialize;

/// Body of a successful `POST /api/auth/`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}
