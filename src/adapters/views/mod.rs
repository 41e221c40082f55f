//! View engine adapters.

mod file_view_engine;

pub use file_view_engine::{substitute, FileViewEngine, VIEW_EXTENSION};
