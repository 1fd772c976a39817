//! Shared cover handle
//!
//! A cover's motion state (timestamp, positions, direction) has to change as a
//! unit. When the host touches one cover from several tasks (relay event
//! handler, command handler, state poller) every access goes through one lock.

use crate::{CoverState, TimeBasedCover};
use std::sync::Arc;
use timecover_travel::{Clock, SystemClock};
use tokio::sync::RwLock;

/// Cover shared between async tasks
pub type SharedCover<C = SystemClock> = Arc<RwLock<TimeBasedCover<C>>>;

/// Wrap a cover for shared access
pub fn shared<C: Clock + Clone>(cover: TimeBasedCover<C>) -> SharedCover<C> {
    Arc::new(RwLock::new(cover))
}

/// Read a consistent snapshot of the cover
pub async fn snapshot<C: Clock + Clone>(cover: &SharedCover<C>) -> CoverState {
    cover.read().await.state()
}
