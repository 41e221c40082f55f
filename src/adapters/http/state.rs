//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::adapters::websocket::RoomManager;
use crate::application::{
    CreateResourceHandler, DeleteResourceHandler, ListResourcesHandler, RequestMembershipHandler,
    ReviewRequestHandler, UpdateResourceHandler,
};
use crate::config::AppConfig;
use crate::domain::authorization::Acl;
use crate::ports::{MembershipNotifier, NoopMembershipNotifier, ResourceRepository, ViewEngine};

use super::middleware::{SessionSettings, TemplateLocals};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub locals: Arc<TemplateLocals>,
    pub acl: Arc<Acl>,
    pub resources: Arc<dyn ResourceRepository>,
    pub views: Arc<dyn ViewEngine>,
    pub sessions: SessionSettings,
    pub rooms: Arc<RoomManager>,
    pub notifier: Arc<dyn MembershipNotifier>,
    /// Database handle passed to module configuration hooks. Absent when
    /// running on in-memory adapters.
    pub database: Option<PgPool>,
}

impl AppState {
    /// Assemble the state with an empty ACL and a fresh room manager.
    /// Membership changes reach the rooms only when real-time is enabled.
    pub fn new(
        config: Arc<AppConfig>,
        locals: Arc<TemplateLocals>,
        resources: Arc<dyn ResourceRepository>,
        views: Arc<dyn ViewEngine>,
        sessions: SessionSettings,
        database: Option<PgPool>,
    ) -> Self {
        let rooms = Arc::new(RoomManager::with_default_capacity());
        let notifier: Arc<dyn MembershipNotifier> = if config.features.enable_realtime {
            rooms.clone()
        } else {
            Arc::new(NoopMembershipNotifier)
        };
        Self {
            config,
            locals,
            acl: Arc::new(Acl::new()),
            resources,
            views,
            sessions,
            rooms,
            notifier,
            database,
        }
    }

    pub fn list_handler(&self) -> ListResourcesHandler {
        ListResourcesHandler::new(self.resources.clone())
    }

    pub fn create_handler(&self) -> CreateResourceHandler {
        CreateResourceHandler::new(self.resources.clone())
    }

    pub fn update_handler(&self) -> UpdateResourceHandler {
        UpdateResourceHandler::new(self.resources.clone())
    }

    pub fn delete_handler(&self) -> DeleteResourceHandler {
        DeleteResourceHandler::new(self.resources.clone())
    }

    pub fn request_membership_handler(&self) -> RequestMembershipHandler {
        RequestMembershipHandler::new(self.resources.clone(), self.notifier.clone())
    }

    pub fn review_request_handler(&self) -> ReviewRequestHandler {
        ReviewRequestHandler::new(self.resources.clone(), self.notifier.clone())
    }
}
