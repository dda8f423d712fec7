//! Shared `axum` state: the process-wide [`galaxy_store::Store`] and
//! [`galaxy_common::clock::Clock`] handles the §9 "global singletons ...
//! become process-wide state whose lifecycle is owned by the Action
//! Gateway" note calls for.

use std::sync::Arc;

use galaxy_common::clock::Clock;
use galaxy_store::Store;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}
