use thiserror::Error;

/// Failures when turning a user-typed name into a server id.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No active binding for the name within the scope.
    #[error("No server named '{name}' in scope {scope_id}")]
    NotFound { name: String, scope_id: i32 },

    /// More than one active binding matched case-insensitively.
    ///
    /// The one-active-mapping invariant makes this impossible in healthy
    /// data, so hitting it signals storage corruption. It is reported, never
    /// retried.
    #[error("{count} active bindings for '{name}' in scope {scope_id}; expected at most one")]
    Ambiguous {
        name: String,
        scope_id: i32,
        count: usize,
    },
}
