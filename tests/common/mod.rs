pub mod mocks;

use recall::{RecallConfig, Session};
use std::sync::Arc;

pub use mocks::ScriptedApi;

/// A session with default configuration backed by `api`
pub fn session_with(api: &Arc<ScriptedApi>) -> Session {
    Session::with_api(RecallConfig::default(), api.clone())
}

/// Yields until `cond` holds, so spawned tasks get to run on the test runtime
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
