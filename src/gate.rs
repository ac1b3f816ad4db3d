//! Request gating by session presence and member role.

use serde::Serialize;

use crate::models::members::Role;

pub const LOGIN_PATH: &str = "/login";
pub const PENDING_PATH: &str = "/pending";
pub const HOME_PATH: &str = "/admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    Unauthenticated,
    PendingApproval,
    Authorized,
}

impl From<Role> for AccessState {
    fn from(role: Role) -> Self {
        match role {
            Role::Pending => AccessState::PendingApproval,
            Role::Member | Role::Admin => AccessState::Authorized,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(&'static str),
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Paths that need at least a session to be reached.
pub fn is_protected(path: &str) -> bool {
    is_under(path, HOME_PATH) || is_under(path, "/api/admin") || path == PENDING_PATH
}

/// Whether `decide` can answer differently for different states on `path`.
pub fn depends_on_session(path: &str) -> bool {
    is_protected(path) || path == LOGIN_PATH
}

pub fn decide(state: AccessState, path: &str) -> Decision {
    match state {
        AccessState::Unauthenticated if is_protected(path) => Decision::RedirectTo(LOGIN_PATH),
        AccessState::PendingApproval if path == LOGIN_PATH => Decision::RedirectTo(PENDING_PATH),
        AccessState::PendingApproval if is_protected(path) && path != PENDING_PATH => {
            Decision::RedirectTo(PENDING_PATH)
        }
        AccessState::Authorized if path == LOGIN_PATH || path == PENDING_PATH => {
            Decision::RedirectTo(HOME_PATH)
        }
        _ => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated() {
        let state = AccessState::Unauthenticated;
        assert_eq!(decide(state, "/admin"), Decision::RedirectTo("/login"));
        assert_eq!(decide(state, "/admin/events"), Decision::RedirectTo("/login"));
        assert_eq!(decide(state, "/api/admin/tasks"), Decision::RedirectTo("/login"));
        assert_eq!(decide(state, "/pending"), Decision::RedirectTo("/login"));
        assert_eq!(decide(state, "/login"), Decision::Allow);
        assert_eq!(decide(state, "/"), Decision::Allow);
        assert_eq!(decide(state, "/api/donation/pix"), Decision::Allow);
    }

    #[test]
    fn test_pending_approval() {
        let state = AccessState::PendingApproval;
        assert_eq!(decide(state, "/admin"), Decision::RedirectTo("/pending"));
        assert_eq!(decide(state, "/api/admin/events/1"), Decision::RedirectTo("/pending"));
        assert_eq!(decide(state, "/login"), Decision::RedirectTo("/pending"));
        assert_eq!(decide(state, "/pending"), Decision::Allow);
        assert_eq!(decide(state, "/api/events/upcoming"), Decision::Allow);
    }

    #[test]
    fn test_authorized() {
        let state = AccessState::Authorized;
        assert_eq!(decide(state, "/admin/members"), Decision::Allow);
        assert_eq!(decide(state, "/api/admin/dashboard"), Decision::Allow);
        assert_eq!(decide(state, "/login"), Decision::RedirectTo("/admin"));
        assert_eq!(decide(state, "/pending"), Decision::RedirectTo("/admin"));
        assert_eq!(decide(state, "/"), Decision::Allow);
    }

    #[test]
    fn test_prefix_match_respects_segments() {
        assert!(is_protected("/admin"));
        assert!(is_protected("/admin/"));
        assert!(!is_protected("/administrators"));
        assert!(!is_protected("/api/administrators"));
        assert!(!is_protected("/pending/other"));
    }

    #[test]
    fn test_public_paths_ignore_session() {
        for path in ["/", "/health", "/api/site", "/api/donation/pix", "/api/events/upcoming"] {
            assert!(!depends_on_session(path), "{}", path);
            for state in [
                AccessState::Unauthenticated,
                AccessState::PendingApproval,
                AccessState::Authorized,
            ] {
                assert_eq!(decide(state, path), Decision::Allow);
            }
        }
        assert!(depends_on_session("/login"));
        assert!(depends_on_session("/pending"));
        assert!(depends_on_session("/api/admin/site"));
    }

    #[test]
    fn test_state_from_role() {
        assert_eq!(AccessState::from(Role::Pending), AccessState::PendingApproval);
        assert_eq!(AccessState::from(Role::Member), AccessState::Authorized);
        assert_eq!(AccessState::from(Role::Admin), AccessState::Authorized);
    }
}
