//! Core feedr library (config, storage, API client, session).

pub mod api;
pub mod config;
pub mod gate;
pub mod session;
pub mod store;
