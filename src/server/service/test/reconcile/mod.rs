use super::create_param;
use crate::server::{
    error::AppError,
    model::command::{CommandScope, DeploymentStatus},
    registry::fake::{FakeRegistry, RegistryCall},
    service::{
        cache::CommandCache, command::CommandService, reconcile::ReconciliationService,
    },
};
use test_utils::{builder::TestBuilder, factory::command::CommandFactory};

mod rate_limit_overview;
mod remove_from_discord;
