//! Access control for protected routes.
//!
//! [`require_session`] is attached with `route_layer` to the protected router,
//! so a route is gated by where it is registered, not by code in its handler.
//! Admitted requests carry the resolved [`Session`] in their extensions.

use crate::api::rest::AppState;
use crate::security::auth::AuthService;
use crate::security::Session;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use log::debug;

/// Where denied requests are sent
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Admit(Session),
    Deny,
}

/// Decide whether the cookies in `jar` belong to a logged-in session
pub async fn check(auth: &AuthService, jar: &CookieJar) -> GateDecision {
    let Some(cookie) = jar.get(auth.cookie_name()) else {
        return GateDecision::Deny;
    };

    match auth.resolve(cookie.value()).await {
        Some(session) => GateDecision::Admit(session),
        None => GateDecision::Deny,
    }
}

pub async fn require_session<B>(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    match check(&state.auth_service, &jar).await {
        GateDecision::Admit(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        GateDecision::Deny => {
            debug!("No session for {}, redirecting to login", request.uri().path());
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::security::auth::LoginCredentials;
    use axum_extra::extract::cookie::Cookie;

    fn admin() -> LoginCredentials {
        LoginCredentials {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }

    #[tokio::test]
    async fn test_no_cookie_denied() {
        let auth = AuthService::new(&SecurityConfig::default());
        assert_eq!(check(&auth, &CookieJar::new()).await, GateDecision::Deny);
    }

    #[tokio::test]
    async fn test_live_session_admitted() {
        let auth = AuthService::new(&SecurityConfig::default());
        let issued = auth.login(&admin()).await.unwrap();
        let jar = CookieJar::new().add(Cookie::new("session", issued.token));

        assert_eq!(check(&auth, &jar).await, GateDecision::Admit(issued.session));
    }

    #[tokio::test]
    async fn test_cookie_under_other_name_denied() {
        let auth = AuthService::new(&SecurityConfig::default());
        let issued = auth.login(&admin()).await.unwrap();
        let jar = CookieJar::new().add(Cookie::new("other", issued.token));

        assert_eq!(check(&auth, &jar).await, GateDecision::Deny);
    }

    #[tokio::test]
    async fn test_revoked_session_denied() {
        let auth = AuthService::new(&SecurityConfig::default());
        let issued = auth.login(&admin()).await.unwrap();
        auth.logout(Some(&issued.token)).await;
        let jar = CookieJar::new().add(Cookie::new("session", issued.token));

        assert_eq!(check(&auth, &jar).await, GateDecision::Deny);
    }
}
