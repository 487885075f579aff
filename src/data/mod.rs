//! Database repository layer for all domain entities.
//!
//! Repository structs handle database operations (CRUD) for each domain in
//! the application. Repositories are generic over `ConnectionTrait`, so the
//! same methods run against the pooled connection or inside a scoped
//! transaction; reads are snapshot-consistent within their enclosing
//! transaction. Database errors are classified into `StoreError` on the way
//! out, never silently swallowed.

pub mod command;
pub mod name_index;
pub mod registration;
pub mod server;

#[cfg(test)]
mod test;
