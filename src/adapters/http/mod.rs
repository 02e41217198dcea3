//! HTTP adapter - axum routes for the caller-facing operations.
//!
//! The two synchronous operations (grant, broadcast) are invoked by
//! clients; the two maintenance endpoints are hit by the external
//! scheduler on its 24-hour cadence and are admin-gated. The timer
//! itself lives outside this service.

mod dto;
mod handlers;
mod middleware;
mod routes;

pub use dto::{
    BroadcastRequest, BroadcastResponse, ErrorResponse, GrantRequest, GrantResponse,
    ReapResponse, SweepResponse,
};
pub use handlers::AppState;
pub use middleware::{auth_middleware, OptionalCaller};
pub use routes::router;
