use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::members::{self, Role};
use crate::repositories::members::MemberRepository;

pub enum MemberRequest {
    EnsureMember {
        id: String,
        name: String,
        email: String,
        response: oneshot::Sender<Result<members::Member, ServiceError>>,
    },
    GetMember {
        id: String,
        response: oneshot::Sender<Result<members::Member, ServiceError>>,
    },
    ListMembers {
        response: oneshot::Sender<Result<Vec<members::Member>, ServiceError>>,
    },
    SetRole {
        id: String,
        role: Role,
        response: oneshot::Sender<Result<members::Member, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct MemberRequestHandler {
    repository: MemberRepository,
}

impl MemberRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = MemberRepository::new(sql_conn);

        MemberRequestHandler { repository }
    }

    async fn ensure_member(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<members::Member, ServiceError> {
        self.repository
            .ensure_member(id, name, email)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn get_member(&self, id: &str) -> Result<members::Member, ServiceError> {
        self.repository
            .get_member(id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {}", id)))
    }

    async fn list_members(&self) -> Result<Vec<members::Member>, ServiceError> {
        self.repository
            .list_members()
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn set_role(&self, id: &str, role: Role) -> Result<members::Member, ServiceError> {
        let member = self
            .repository
            .set_role(id, role)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {}", id)))?;

        log::info!("Member {} is now {}.", member.id, role);
        Ok(member)
    }
}

#[async_trait]
impl RequestHandler<MemberRequest> for MemberRequestHandler {
    async fn handle_request(&self, request: MemberRequest) {
        match request {
            MemberRequest::EnsureMember {
                id,
                name,
                email,
                response,
            } => {
                let member = self.ensure_member(&id, &name, &email).await;
                let _ = response.send(member);
            }
            MemberRequest::GetMember { id, response } => {
                let member = self.get_member(&id).await;
                let _ = response.send(member);
            }
            MemberRequest::ListMembers { response } => {
                let members = self.list_members().await;
                let _ = response.send(members);
            }
            MemberRequest::SetRole { id, role, response } => {
                let member = self.set_role(&id, role).await;
                let _ = response.send(member);
            }
        }
    }
}

pub struct MemberService;

impl MemberService {
    pub fn new() -> Self {
        MemberService {}
    }
}

#[async_trait]
impl Service<MemberRequest, MemberRequestHandler> for MemberService {}
