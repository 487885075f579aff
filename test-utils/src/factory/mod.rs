//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with a `Factory` struct for
//! customization and a `create_*` convenience function for quick default
//! creation. Factories handle foreign key relationships through required
//! constructor arguments, keeping tests concise.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let server = factory::server::create_server(&db).await?;
//!     let binding = factory::name_index::create_binding(&db, server.id, server.id).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! Use the factory builders for custom values:
//!
//! ```rust,ignore
//! let server = factory::server::ServerFactory::new(&db)
//!     .platform_id("987654321")
//!     .name("CustomServer")
//!     .active(false)
//!     .build()
//!     .await?;
//! ```

pub mod command;
pub mod helpers;
pub mod name_index;
pub mod registration;
pub mod server;

// Re-export commonly used factory functions for concise usage
pub use command::create_command;
pub use name_index::create_binding;
pub use registration::create_registration;
pub use server::create_server;
