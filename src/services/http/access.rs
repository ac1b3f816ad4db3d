use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tokio::sync::mpsc;

use super::{call, ApiError, AppState};
use crate::gate::{self, AccessState, Decision};
use crate::models::members::{Member, Role};
use crate::repositories::auth::AuthApi;
use crate::services::members::MemberRequest;

const ACCESS_TOKEN_COOKIE: &str = "access_token";
const ME_PATH: &str = "/api/me";

/// Who is behind a request, as far as gating is concerned.
#[derive(Clone, Debug)]
pub struct Session {
    pub state: AccessState,
    pub member: Option<Member>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session {
            state: AccessState::Unauthenticated,
            member: None,
        }
    }

    pub fn for_member(member: Member) -> Self {
        Session {
            state: AccessState::from(member.role()),
            member: Some(member),
        }
    }

    pub fn require_admin(&self) -> Result<&Member, ApiError> {
        match &self.member {
            Some(member) if member.role() == Role::Admin => Ok(member),
            Some(_) => Err(ApiError::forbidden("Only admins can do this.")),
            None => Err(ApiError::unauthorized()),
        }
    }
}

#[async_trait]
pub trait AccessResolver: Send + Sync + 'static {
    async fn resolve(&self, access_token: Option<&str>) -> Session;
}

/// Resolves tokens with the auth service, then looks the user up as a member.
pub struct MemberResolver {
    auth_api: AuthApi,
    member_channel: mpsc::Sender<MemberRequest>,
}

impl MemberResolver {
    pub fn new(auth_api: AuthApi, member_channel: mpsc::Sender<MemberRequest>) -> Self {
        MemberResolver {
            auth_api,
            member_channel,
        }
    }
}

#[async_trait]
impl AccessResolver for MemberResolver {
    async fn resolve(&self, access_token: Option<&str>) -> Session {
        let Some(access_token) = access_token else {
            return Session::anonymous();
        };

        let user = match self.auth_api.get_user(access_token).await {
            Ok(Some(user)) => user,
            Ok(None) => return Session::anonymous(),
            Err(e) => {
                log::error!("Could not resolve session: {}", e);
                return Session::anonymous();
            }
        };

        let name = user.display_name();
        let email = user.email.clone().unwrap_or_default();
        let member = call(&self.member_channel, |response| MemberRequest::EnsureMember {
            id: user.id.clone(),
            name,
            email,
            response,
        })
        .await;

        match member {
            Ok(member) => Session::for_member(member),
            Err(e) => {
                log::error!("Could not load member {}: {}", user.id, e);
                Session::anonymous()
            }
        }
    }
}

/// Reads the bearer token from the `Authorization` header, falling back to
/// the `access_token` cookie.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == ACCESS_TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub async fn gate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Public paths skip the auth service round trip.
    let session = if gate::depends_on_session(&path) || path == ME_PATH {
        let token = access_token(request.headers());
        state.resolver.resolve(token.as_deref()).await
    } else {
        Session::anonymous()
    };

    match gate::decide(session.state, &path) {
        Decision::Allow => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Decision::RedirectTo(target) if path.starts_with("/api/") => {
            log::debug!("Rejected {:?} request to {}.", session.state, path);
            match session.state {
                AccessState::Unauthenticated => ApiError::unauthorized().into_response(),
                _ => ApiError::forbidden(format!("Access is gated, see {}.", target))
                    .into_response(),
            }
        }
        Decision::RedirectTo(target) => Redirect::temporary(target).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderValue, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    async fn auth_user(headers: HeaderMap) -> Response {
        let authorized = headers.get("apikey").is_some_and(|key| key == "anon-key")
            && headers
                .get(header::AUTHORIZATION)
                .is_some_and(|value| value == "Bearer good-token");
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        Json(json!({
            "id": "user-7",
            "email": "maria@igreja.org",
            "user_metadata": {"full_name": "Maria Lima"}
        }))
        .into_response()
    }

    async fn auth_server() -> String {
        let app = Router::new().route("/auth/v1/user", get(auth_user));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", address)
    }

    fn member_service() -> mpsc::Sender<MemberRequest> {
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                if let MemberRequest::EnsureMember {
                    id,
                    name,
                    email,
                    response,
                } = request
                {
                    let now = chrono::Utc::now().naive_utc();
                    let _ = response.send(Ok(Member {
                        id,
                        name,
                        email,
                        role: Role::Pending.to_string(),
                        created_at: now,
                        updated_at: now,
                    }));
                }
            }
        });
        tx
    }

    #[tokio::test]
    async fn test_new_user_becomes_pending_member() {
        let auth_api = AuthApi::new("anon-key".to_string(), auth_server().await);
        let resolver = MemberResolver::new(auth_api, member_service());

        let session = resolver.resolve(Some("good-token")).await;
        assert_eq!(session.state, AccessState::PendingApproval);
        let member = session.member.unwrap();
        assert_eq!(member.id, "user-7");
        assert_eq!(member.name, "Maria Lima");
        assert_eq!(member.email, "maria@igreja.org");
    }

    #[tokio::test]
    async fn test_rejected_token_is_anonymous() {
        let auth_api = AuthApi::new("anon-key".to_string(), auth_server().await);
        let resolver = MemberResolver::new(auth_api, member_service());

        let session = resolver.resolve(Some("expired-token")).await;
        assert_eq!(session.state, AccessState::Unauthenticated);
        assert!(session.member.is_none());

        let session = resolver.resolve(None).await;
        assert_eq!(session.state, AccessState::Unauthenticated);
    }

    #[test]
    fn test_token_from_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=cookie"));
        assert_eq!(access_token(&headers), Some("abc.def".to_string()));
    }

    #[test]
    fn test_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=xyz; lang=pt-BR"),
        );
        assert_eq!(access_token(&headers), Some("xyz".to_string()));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(access_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(access_token(&headers), None);
    }
}
