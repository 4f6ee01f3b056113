use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use recipebox_core::{Error, OwnerId};

use crate::{error::ApiError, state::AppState};

/// The owner resolved from the request's bearer token
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

impl FromRequestParts<Arc<AppState>> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let gate = Arc::clone(&state.gate);
        let owner = tokio::task::spawn_blocking(move || gate.resolve(&token)).await??;

        Ok(Owner(owner))
    }
}

fn bearer_token(parts: &Parts) -> Result<String, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Auth("no token".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Auth("no token".to_string()).into())
}
