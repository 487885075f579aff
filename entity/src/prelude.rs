pub use super::command::Entity as Command;
pub use super::name_index::Entity as NameIndex;
pub use super::registration::Entity as Registration;
pub use super::server::Entity as Server;
