//! Admin token check.
//!
//! Every dashboard route takes an [`AdminToken`]. The token comes from the
//! `token` query parameter or the `x-admin-token` header and must equal
//! `ADMIN_TOKEN`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Header alternative to the `token` query parameter.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// A request authenticated with the admin token.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

impl AdminToken {
    /// Query string fragment carrying the token, for redirects.
    pub fn query(&self) -> String {
        token_query(&self.0)
    }
}

/// `token=<urlencoded>`
pub fn token_query(token: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("token", token)
        .finish()
}

/// The `token` query parameter, if present.
pub fn query_token(parts: &Parts) -> Option<String> {
    let query = parts.uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}

fn header_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

impl FromRequestParts<AppState> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = query_token(parts)
            .filter(|t| !t.is_empty())
            .or_else(|| header_token(parts));

        match token {
            Some(token) if token == state.config.admin_token => Ok(AdminToken(token)),
            _ => {
                tracing::warn!(path = %parts.uri.path(), "Rejected admin request");
                Err(AppError::Auth("Unauthorized".to_string()))
            }
        }
    }
}
