mod enrichment_service;
mod paginator;
mod transport_rate_limiter;
mod transport_rest;
mod transport_retrier;

pub use enrichment_service::*;
pub use paginator::*;
pub use transport_rate_limiter::*;
pub use transport_rest::*;
pub use transport_retrier::*;
