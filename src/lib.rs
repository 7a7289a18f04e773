//! apicors - CORS policy for localhost browser clients of an API.
//!
//! [`web_config`] builds the policy and registers it for `/api/**`; the
//! resulting [`cors::CorsRegistry`] is injected into the router built by
//! [`routes::create_router`].

pub mod config;
pub mod cors;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod web_config;
