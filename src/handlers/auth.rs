use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;

use crate::auth_provider::{AuthError, AuthProvider};
use crate::error::Result;
use crate::handlers::render;
use crate::middleware::OptionalAuthUser;
use crate::models::{LoginCredentials, RegisterForm};
use crate::session::{create_session_cookie, get_session_token, remove_session_cookie};

#[derive(Clone)]
pub struct AuthState {
    pub auth: AuthProvider,
}

// Templates
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    email: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    email: String,
    display_name: String,
    error: Option<String>,
}

// Handlers
pub async fn login_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    render(&LoginTemplate {
        email: String::new(),
        error: None,
    })
}

pub async fn login_submit(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(credentials): Form<LoginCredentials>,
) -> Result<Response> {
    match state.auth.sign_in(&credentials).await {
        Ok(signed_in) => {
            let jar = jar.add(create_session_cookie(&signed_in.token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AuthError::App(e)) => Err(e),
        Err(e) => render(&LoginTemplate {
            email: credentials.email,
            error: Some(e.to_string()),
        }),
    }
}

pub async fn register_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    render(&RegisterTemplate {
        email: String::new(),
        display_name: String::new(),
        error: None,
    })
}

pub async fn register_submit(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match state.auth.register(&form).await {
        Ok(signed_in) => {
            let jar = jar.add(create_session_cookie(&signed_in.token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AuthError::App(e)) => Err(e),
        Err(e) => render(&RegisterTemplate {
            email: form.email,
            display_name: form.display_name.unwrap_or_default(),
            error: Some(e.to_string()),
        }),
    }
}

pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response> {
    if let Some(token) = get_session_token(&jar) {
        state.auth.sign_out(&token).await?;
    }

    let jar = jar.add(remove_session_cookie());
    Ok((jar, Redirect::to("/auth/login")).into_response())
}
