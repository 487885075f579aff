use crate::data::command::CommandRepository;
use crate::model::command::{CommandDescriptor, ParamType};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod insert_missing;
mod list_for_server;
mod upsert;
