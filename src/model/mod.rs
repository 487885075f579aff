//! Domain types shared between the service and data layers.

pub mod command;
pub mod name;
