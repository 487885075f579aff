pub mod prelude;

pub mod command;
pub mod name_index;
pub mod registration;
pub mod server;
