//! # Bands Common Library
//!
//! Shared code for the bands microservices:
//! - XML error envelope returned by every failing endpoint
//! - XML request extractor and response wrapper
//! - Configuration file loading and default paths
//! - Graceful shutdown signal
//! - Health check body

pub mod config;
pub mod envelope;
pub mod error;
pub mod health;
pub mod shutdown;
pub mod xml;

pub use envelope::{ErrorDesc, FieldError};
pub use error::{Error, Result};
pub use xml::{OptionalXml, Xml, XmlRejection};
