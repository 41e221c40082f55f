//! HTTP adapter shared by the four resource families.
//!
//! Endpoints (shown for programs):
//! - `GET    /api/programs`                                 - list
//! - `POST   /api/programs`                                 - create
//! - `GET    /api/programs/:id`                             - read
//! - `PUT    /api/programs/:id`                             - update
//! - `DELETE /api/programs/:id`                             - delete
//! - `GET    /api/programs/members/:id`                     - list members
//! - `GET    /api/programs/requests/:id`                    - list join requests
//! - `GET    /api/programs/requests/confirm/:id/:user_id`   - confirm member
//! - `GET    /api/programs/requests/deny/:id/:user_id`      - deny member
//! - `GET    /api/new/program`                              - creation scaffold
//! - `GET    /api/request/program/:id`                      - submit join request

mod dto;
mod error;
mod gate;
mod handlers;
mod loader;
mod routes;

pub use dto::{
    CreateResourceRequest, MemberResponse, ResourceDetailResponse, ResourceResponse,
    ReviewResponse, ScaffoldResponse, UpdateResourceRequest, UserRelationshipResponse,
};
pub use error::ResourceApiError;
pub use gate::{policy_gate, PolicyGate};
pub use handlers::{
    confirm_member, create, delete, deny_member, list, list_members, list_requests,
    new_scaffold, read, request_membership, update, FamilyState,
};
pub use loader::{load_resource, LoadedResource, ResourceLoader};
pub use routes::{Gate, RouteTable};
