mod envelope;
mod error;
mod facade;
mod router;

pub use error::EnvelopeError;
pub use facade::Facade;
pub use router::Router;
