//! Exposes the texture descriptions and the transient pool backing graph resources.

pub mod pool;
pub mod texture;
