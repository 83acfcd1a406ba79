//! Rule-based entity annotation for veterinary clinical text.
//!
//! This crate tags spans of a document against fixed vocabularies (species,
//! symptoms, medications) and a few syntactic patterns (name headers, weight
//! expressions, date headers). Rules are plain data; an [`Annotator`] compiles
//! them once and is read-only afterwards.

pub mod annotate;
pub mod rules;

pub use annotate::*;
pub use rules::*;
