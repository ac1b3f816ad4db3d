use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::events;
use crate::repositories::events::EventRepository;

pub enum EventRequest {
    ListUpcoming {
        response: oneshot::Sender<Result<Vec<events::Event>, ServiceError>>,
    },
    ListEvents {
        response: oneshot::Sender<Result<Vec<events::Event>, ServiceError>>,
    },
    GetEvent {
        id: String,
        response: oneshot::Sender<Result<events::Event, ServiceError>>,
    },
    CreateEvent {
        event: events::NewEvent,
        response: oneshot::Sender<Result<events::Event, ServiceError>>,
    },
    UpdateEvent {
        id: String,
        event: events::NewEvent,
        response: oneshot::Sender<Result<events::Event, ServiceError>>,
    },
    DeleteEvent {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct EventRequestHandler {
    repository: EventRepository,
}

impl EventRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = EventRepository::new(sql_conn);

        EventRequestHandler { repository }
    }

    async fn list_upcoming(&self) -> Result<Vec<events::Event>, ServiceError> {
        self.repository
            .list_upcoming_events()
            .await
            .map_err(|e| ServiceError::Repository("Events".to_string(), e.to_string()))
    }

    async fn list_events(&self) -> Result<Vec<events::Event>, ServiceError> {
        self.repository
            .list_events()
            .await
            .map_err(|e| ServiceError::Repository("Events".to_string(), e.to_string()))
    }

    async fn get_event(&self, id: &str) -> Result<events::Event, ServiceError> {
        self.repository
            .get_event(id)
            .await
            .map_err(|e| ServiceError::Repository("Events".to_string(), e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {}", id)))
    }

    async fn create_event(&self, event: events::NewEvent) -> Result<events::Event, ServiceError> {
        event.validate().map_err(ServiceError::InvalidRequest)?;

        let event = self
            .repository
            .new_event(&event)
            .await
            .map_err(|e| ServiceError::Repository("Events".to_string(), e.to_string()))?;

        log::info!("Created event {} ({}).", event.id, event.title);
        Ok(event)
    }

    async fn update_event(
        &self,
        id: &str,
        event: events::NewEvent,
    ) -> Result<events::Event, ServiceError> {
        event.validate().map_err(ServiceError::InvalidRequest)?;

        self.repository
            .update_event(id, &event)
            .await
            .map_err(|e| ServiceError::Repository("Events".to_string(), e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("Event {}", id)))
    }

    async fn delete_event(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = self
            .repository
            .delete_event(id)
            .await
            .map_err(|e| ServiceError::Repository("Events".to_string(), e.to_string()))?;

        if !deleted {
            return Err(ServiceError::NotFound(format!("Event {}", id)));
        }

        log::info!("Deleted event {}.", id);
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<EventRequest> for EventRequestHandler {
    async fn handle_request(&self, request: EventRequest) {
        match request {
            EventRequest::ListUpcoming { response } => {
                let _ = response.send(self.list_upcoming().await);
            }
            EventRequest::ListEvents { response } => {
                let _ = response.send(self.list_events().await);
            }
            EventRequest::GetEvent { id, response } => {
                let _ = response.send(self.get_event(&id).await);
            }
            EventRequest::CreateEvent { event, response } => {
                let _ = response.send(self.create_event(event).await);
            }
            EventRequest::UpdateEvent {
                id,
                event,
                response,
            } => {
                let _ = response.send(self.update_event(&id, event).await);
            }
            EventRequest::DeleteEvent { id, response } => {
                let _ = response.send(self.delete_event(&id).await);
            }
        }
    }
}

pub struct EventService;

impl EventService {
    pub fn new() -> Self {
        EventService {}
    }
}

#[async_trait]
impl Service<EventRequest, EventRequestHandler> for EventService {}
