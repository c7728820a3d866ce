//! Application state.

use std::sync::Arc;

use aviary_core::Config;
use aviary_index::IndexMaintainer;

/// Main application state: the index maintainer (over injected stores) and
/// the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub maintainer: Arc<IndexMaintainer>,
    pub config: Config,
}

impl AppState {
    pub fn new(maintainer: Arc<IndexMaintainer>, config: Config) -> Self {
        AppState { maintainer, config }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
