//! # entityloom-dsl
//!
//! The document-decoder boundary for entityloom: turns a named document's
//! raw text into a syntax-agnostic [`Node`] tree. Schema and data bundles are
//! both just `map[filename -> document text]`; this crate is the only place
//! that knows the documents are written in YAML.

mod decoder;
mod error;
mod node;

pub use decoder::{DocumentDecoder, YamlDecoder};
pub use error::DslError;
pub use node::Node;
