use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginReqDto {
    pub rut: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshReqDto {
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResDto {
    pub access: String,
    /// Only present when the server rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Claims issued by the API's JWT backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
    #[serde(default)]
    pub jti: Option<String>,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}
