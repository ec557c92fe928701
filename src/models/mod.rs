//! Data models for the inventory API
//!
//! The `Product` entity plus the DTOs used for serializing/deserializing
//! HTTP request and response bodies.

pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use product::Product;
pub use requests::{parse_body, PageRequest, ProductFields, ProductPatch, QuantityQuery};
pub use responses::{
    ErrorResponse, HealthResponse, JsonPayload, MessageResponse, MutationResponse,
    ProductListResponse, ProductResponse,
};
