//! In-memory storage adapters.

mod in_memory_resource_repository;
mod in_memory_session_store;

pub use in_memory_resource_repository::InMemoryResourceRepository;
pub use in_memory_session_store::InMemorySessionStore;
