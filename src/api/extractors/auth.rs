use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::{Caller, Claims};
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::Span;

/// Any authenticated portal user. The portal front-door sets the access
/// token as a cookie; service-to-service callers use a bearer header.
pub struct AuthUser(pub Caller);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let access_token = token_from_parts(parts).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&["barangay-portal"]);
        validation.set_issuer(&[app_state.config.auth_issuer.as_str()]);

        let token_data = decode::<Claims>(&access_token, &decoding_key, &validation)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let caller = Caller {
            id: token_data.claims.sub,
            name: token_data.claims.name,
            roles: token_data.claims.roles,
        };

        Span::current().record("user_id", caller.id.as_str());

        Ok(AuthUser(caller))
    }
}

/// A caller holding the youth-module staff capability.
pub struct StaffUser(pub Caller);

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;

        if !caller.is_staff() {
            return Err(StatusCode::FORBIDDEN);
        }

        Ok(StaffUser(caller))
    }
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(cookies) = parts.extensions.get::<Cookies>() {
        if let Some(cookie) = cookies.get("access_token") {
            return Some(cookie.value().to_string());
        }
    }

    parts.headers.get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}
