//! Serenity fixtures for testing Discord event handling.

pub mod guild;

pub use guild::create_test_guild;
