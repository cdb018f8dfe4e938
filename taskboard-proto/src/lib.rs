//! Shared task model, request schema, and wire format for Taskboard.

pub mod schema;
pub mod seed;
pub mod task;
pub mod view;
pub mod wire;
