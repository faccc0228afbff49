//! Student roster data layer: a persisted roster store, a mock HTTP-style
//! request layer with artificial latency, the API facade the UI calls, and
//! the list view projection.

pub mod auth;
pub mod backend;
pub mod config;
pub mod grades;
pub mod ipc;
pub mod model;
pub mod seed;
pub mod storage;
pub mod store;
pub mod theme;
pub mod validate;
pub mod view;
