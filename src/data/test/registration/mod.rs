use crate::data::registration::RegistrationRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete_for_server;
mod record;
