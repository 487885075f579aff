//! Background jobs.

pub mod resync;
