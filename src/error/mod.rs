//! Error types for the sync core.
//!
//! This module provides the application's error hierarchy. The `AppError`
//! enum serves as the top-level error type that wraps domain-specific errors.
//! Resolver and store errors propagate to callers unmodified; only the sync
//! coordinator decides whether a given error class is retried or surfaced to
//! an operator.

pub mod config;
pub mod resolve;
pub mod store;

use thiserror::Error;

use crate::error::{config::ConfigError, resolve::ResolveError, store::StoreError};
use crate::gateway::GatewayError;

/// Top-level application error type.
///
/// Aggregates all error types that can occur in the application. Most
/// variants use `#[from]` for automatic conversion; `serenity::Error` is
/// converted manually so it can be boxed.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Name resolution failure (unknown or ambiguous name).
    #[error(transparent)]
    ResolveErr(#[from] ResolveError),

    /// Durable state store failure (constraint violation, pool timeout, or
    /// an underlying database error).
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Remote command-registration failure at the gateway edge.
    #[error(transparent)]
    GatewayErr(#[from] GatewayError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

impl AppError {
    /// Whether the error indicates a data-integrity fault.
    ///
    /// Integrity faults (a violated storage constraint, an ambiguous name
    /// binding) are never retried automatically: retrying a logically
    /// inconsistent state risks masking corruption. Everything else is
    /// treated as transient and eligible for backoff retry.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            AppError::StoreErr(StoreError::ConstraintViolation(_))
                | AppError::ResolveErr(ResolveError::Ambiguous { .. })
        )
    }

    /// Short machine-readable label for operator alerts.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ConfigErr(_) => "config",
            AppError::ResolveErr(ResolveError::NotFound { .. }) => "name_not_found",
            AppError::ResolveErr(ResolveError::Ambiguous { .. }) => "ambiguous_name",
            AppError::StoreErr(StoreError::ConstraintViolation(_)) => "constraint_violation",
            AppError::StoreErr(StoreError::PoolTimeout) => "pool_timeout",
            AppError::StoreErr(StoreError::Db(_)) => "database",
            AppError::GatewayErr(GatewayError::Timeout) => "gateway_timeout",
            AppError::GatewayErr(GatewayError::Remote(_)) => "gateway_rejection",
            AppError::DiscordErr(_) => "discord",
            AppError::SchedulerErr(_) => "scheduler",
        }
    }
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as
/// serenity::Error is very large and would make all AppError variants larger
/// if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::StoreErr(StoreError::from(err))
    }
}
