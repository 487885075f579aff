use crate::data::server::ServerRepository;
use chrono::Utc;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod list_stale;
mod mark_inactive;
mod update_last_sync;
mod upsert;
