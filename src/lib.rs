//! Inventory API - product inventory over HTTP
//!
//! CRUD over a single `Product` entity in a relational store, with
//! generated SKUs and a write-invalidate read cache in front of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod sku;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use service::ProductService;
pub use tasks::spawn_cleanup_task;
