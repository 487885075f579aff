//! Name scoping and normalization.

/// The namespace a raw name must be unique within.
///
/// Scopes are always a parent server's internal id; there is no global
/// namespace. A server's own display name lives in its own scope, and
/// cross-server aliases live in the scope of the server that registered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope(pub i32);

/// Normalizes a user-typed name into the case-insensitive match key.
///
/// The raw form is kept alongside for display and audit; only the normalized
/// form participates in uniqueness and lookup.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
