mod command;
mod name_index;
mod registration;
mod server;
