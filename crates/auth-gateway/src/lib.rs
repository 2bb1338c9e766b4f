//! Typed HTTP operations against the ShopSense identity service.
//!
//! This crate provides:
//! - `AuthGateway`: stateless, typed calls to the auth and receipts endpoints
//! - `RequestAuthorizer`: the single point of truth for the bearer header
//!   attached to outgoing requests
//! - `GatewayError`: the failure taxonomy the session engine decides
//!   transitions from
//!
//! Nothing in this crate mutates session state; it only returns results.

mod authorizer;
mod error;
mod gateway;
mod types;

pub use authorizer::RequestAuthorizer;
pub use error::{GatewayError, GatewayResult};
pub use gateway::AuthGateway;
pub use types::{Identity, LoginResponse, ProfileUpdate, Receipt};
