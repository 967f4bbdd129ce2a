//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `POST /store` - Store a value under a new key
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /replay/:operation` - Call history of an operation
//! - `GET /page?url=` - Tracked page fetch
//! - `GET /page/count?url=` - Page access count
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
