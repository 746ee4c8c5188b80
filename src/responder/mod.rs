//! Responder Module
//!
//! Static HTTP responder the remote fetcher talks to.
//!
//! # Endpoints
//! - `GET /test` - the fixed resource, JSON encoded
//! - `GET /health` - Health check endpoint
//!
//! Any other method on `/test` is answered with 405.

pub mod handlers;
pub mod routes;
mod server;

pub use handlers::ResponderState;
pub use routes::create_router;
pub use server::Responder;
