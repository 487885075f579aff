use crate::data::name_index::NameIndexRepository;
use crate::model::name::Scope;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod deactivate_for_server;
mod find_active;
mod register;
