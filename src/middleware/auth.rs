use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::auth_provider::AuthProvider;
use crate::error::AppError;
use crate::models::User;
use crate::session::get_session_token;

/// The signed-in user, passed explicitly to every handler that needs it.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

async fn resolve_user(parts: &Parts) -> Result<Option<AuthUser>, AppError> {
    let provider = parts
        .extensions
        .get::<AuthProvider>()
        .cloned()
        .ok_or_else(|| AppError::Internal("AuthProvider extension missing".to_string()))?;

    let jar = CookieJar::from_headers(&parts.headers);
    match get_session_token(&jar) {
        Some(token) => provider.current_user(&token).await,
        None => Ok(None),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(parts)
            .await
            .map_err(AuthRejection::Error)?
            .ok_or(AuthRejection::Redirect)
    }
}

pub enum AuthRejection {
    Redirect,
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Redirect => Redirect::to("/auth/login").into_response(),
            AuthRejection::Error(e) => e.into_response(),
        }
    }
}

// Optional auth - doesn't redirect, just returns None if not logged in
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(resolve_user(parts).await?))
    }
}

// API auth - answers 401 instead of redirecting to the login page
pub struct ApiUser(pub AuthUser);

impl<S> FromRequestParts<S> for ApiUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(parts)
            .await?
            .map(ApiUser)
            .ok_or(AppError::Unauthorized)
    }
}
