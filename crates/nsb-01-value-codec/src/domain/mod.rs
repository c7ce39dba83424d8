//! Boxed value domain: vocabulary and triples.

pub mod triple;
pub mod vocabulary;

pub use triple::BsvTriple;
pub use vocabulary::{lookup, BsvType, TypeNameStatus};
