//! Local email/password authentication.
//!
//! Every failure a user can cause is an [`AuthError`] whose message is shown
//! on the form as-is. Storage failures are passed through as [`AppError`].

use thiserror::Error;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{LoginCredentials, RegisterForm, User};
use crate::repositories::{SessionRepository, UserRepository};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email is required")]
    MissingEmail,

    #[error("Password must be at least 6 characters")]
    WeakPassword,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    App(#[from] AppError),
}

/// A freshly signed-in user and the session token to hand to the browser.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthProvider {
    user_repo: UserRepository,
    session_repo: SessionRepository,
}

impl AuthProvider {
    pub fn new(user_repo: UserRepository, session_repo: SessionRepository) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<SignedIn, AuthError> {
        let user = self
            .user_repo
            .verify_password(&credentials.email, &credentials.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.session_repo.create(&user.id).await?;
        tracing::info!("User {} signed in", user.id);

        Ok(SignedIn { user, token })
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<SignedIn, AuthError> {
        if form.email.trim().is_empty() {
            return Err(AuthError::MissingEmail);
        }
        if form.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.user_repo.find_by_email(&form.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = self
            .user_repo
            .create(&form.email, &form.password, form.display_name.as_deref())
            .await?;
        let token = self.session_repo.create(&user.id).await?;
        tracing::info!("Registered user {}", user.id);

        Ok(SignedIn { user, token })
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        self.session_repo.delete(token).await
    }

    /// Resolve a session token to the signed-in user, if it is still valid.
    pub async fn current_user(&self, token: &str) -> Result<Option<AuthUser>, AppError> {
        let user = self.session_repo.find_user(token).await?;
        Ok(user.map(AuthUser::from))
    }
}
