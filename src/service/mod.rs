//! Business logic on top of the repository layer.

pub mod registry;
pub mod resolver;
