//! CORS policy model, registration table, and request processing.

mod origin;
mod path;
mod policy;
pub mod processor;
mod registry;

pub use origin::OriginPattern;
pub use path::PathPattern;
pub use policy::{CorsPolicy, CorsPolicyBuilder, HeaderList};
pub use processor::{process, CorsDecision};
pub use registry::{CorsRegistry, CorsRegistryBuilder};
