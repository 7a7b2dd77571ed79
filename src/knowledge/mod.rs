//! Regulatory knowledge base.
//!
//! - Document records and their validation
//! - Effective-knowledge resolution by reference date
//! - Ingestion sources (built-in fixture, JSON file)

mod corpus;
mod document;
mod error;
mod resolver;
mod source;

pub use corpus::*;
pub use document::*;
pub use error::*;
pub use resolver::*;
pub use source::*;
