use std::sync::Arc;

use crate::{config::Config, repositories::UserStore, services::SessionLifecycle};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub lifecycle: SessionLifecycle,
    pub config: Config,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, lifecycle: SessionLifecycle, config: Config) -> Self {
        Self {
            users,
            lifecycle,
            config,
        }
    }
}
