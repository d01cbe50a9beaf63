use crate::api::rest::session_gate::LOGIN_PATH;
use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::error::Error;
use crate::security::auth::{LoginCredentials, INVALID_CREDENTIALS};
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use log::error;

/// Where a successful login lands
pub const HOME_PATH: &str = "/";

/// GET /login
pub async fn login_form(State(state): State<AppState>) -> ApiResult<Html<String>> {
    Ok(Html(state.pages.render_login(None)?))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<LoginCredentials>,
) -> Response {
    match state.auth_service.login(&credentials).await {
        Ok(issued) => {
            let previous = jar
                .get(state.auth_service.cookie_name())
                .map(|cookie| cookie.value().to_string());
            state.auth_service.logout(previous.as_deref()).await;

            let cookie = Cookie::build(state.auth_service.cookie_name().to_string(), issued.token)
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.auth_service.secure_cookie())
                .finish();

            (jar.add(cookie), Redirect::to(HOME_PATH)).into_response()
        }
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::Authentication(_))) => {
            match state.pages.render_login(Some(INVALID_CREDENTIALS)) {
                Ok(html) => Html(html).into_response(),
                Err(e) => ApiError::from(e).into_response(),
            }
        }
        Err(e) => {
            error!("Login failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let name = state.auth_service.cookie_name().to_string();
    let token = jar.get(&name).map(|cookie| cookie.value().to_string());

    state.auth_service.logout(token.as_deref()).await;

    let jar = jar.remove(Cookie::build(name, "").path("/").finish());
    (jar, Redirect::to(LOGIN_PATH))
}
