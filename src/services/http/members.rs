use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::json;

use super::{access::Session, call, ApiError, AppState};
use crate::models::members::{Member, Role, RoleChange};
use crate::services::members::MemberRequest;

pub async fn me(
    Extension(session): Extension<Session>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match session.member {
        Some(member) => Ok(Json(json!({
            "member": member,
            "access": session.state,
        }))),
        None => Err(ApiError::unauthorized()),
    }
}

pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, ApiError> {
    let members = call(&state.member_channel, |response| MemberRequest::ListMembers {
        response,
    })
    .await?;

    Ok(Json(members))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Member>, ApiError> {
    let member = call(&state.member_channel, |response| MemberRequest::GetMember {
        id,
        response,
    })
    .await?;

    Ok(Json(member))
}

pub async fn set_member_role(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(change): Json<RoleChange>,
) -> Result<Json<Member>, ApiError> {
    let admin = session.require_admin()?;

    // Keeps at least the acting admin able to manage roles.
    if admin.id == id && change.role != Role::Admin {
        return Err(ApiError::forbidden("Admins cannot demote themselves."));
    }

    let member = call(&state.member_channel, |response| MemberRequest::SetRole {
        id,
        role: change.role,
        response,
    })
    .await?;

    Ok(Json(member))
}
