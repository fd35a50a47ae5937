//! Client library for the SuperSearch Enrichment feature of the Instantly API.
//!
//! SuperSearch enrichments find and augment lead records with contact,
//! company, and AI-generated personalization data. This crate models the
//! documented request bodies as typed parameters, sends them over an
//! authenticated transport, and passes the JSON responses through unchanged.
//!
//! The client reads its API key from the `INSTANTLY_API_KEY` environment
//! variable.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
