//! Domain models for extracted veterinary records.

mod pet;
mod record;
mod visit;

pub use pet::*;
pub use record::*;
pub use visit::*;
