mod enrichment;
mod transport;

pub use enrichment::*;
pub use transport::*;
