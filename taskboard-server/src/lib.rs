//! Taskboard API server library.
//!
//! Exposes the router, service, and store for use in tests and embedding.
//! Requests flow `routes` -> [`service::TaskService`] -> [`store::TaskStore`].

pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod store;
