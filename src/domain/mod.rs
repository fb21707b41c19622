//! Domain entities owned by the in-memory stores

pub mod entities;

pub use entities::*;
