//! Serde helpers.

pub mod decimal;
pub mod duration;
