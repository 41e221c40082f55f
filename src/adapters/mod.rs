//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum middleware, resource routes and shared state
//! - `postgres` - sqlx-backed repositories and session store
//! - `storage` - in-memory repositories and session store
//! - `views` - file-backed template engine
//! - `websocket` - real-time membership updates

pub mod http;
pub mod postgres;
pub mod storage;
pub mod views;
pub mod websocket;

pub use storage::{InMemoryResourceRepository, InMemorySessionStore};
pub use views::FileViewEngine;
pub use websocket::RoomManager;
