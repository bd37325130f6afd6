// ============================================================================
// Messaging - Event Bus Collaborator
// ============================================================================
//
// The coordinator announces every committed entity change through the
// `EventPublisher` trait. The bus gives no transactional coordination with
// the record store; a rejected publish is a terminal failure for that call
// and triggers compensation in the coordinator.
//
// ============================================================================

mod event;
mod redpanda;

pub use event::{Event, EventType};
pub use redpanda::RedpandaPublisher;

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Publisher double that records accepted events and can be switched
    /// into a failing mode to exercise compensation paths.
    #[derive(Default)]
    pub struct CollectingPublisher {
        events: Mutex<Vec<Event>>,
        fail: AtomicBool,
    }

    impl CollectingPublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_publishes(&self) {
            self.fail.store(true, Ordering::SeqCst);
        }

        pub fn published(&self) -> Vec<Event> {
            self.events.lock().expect("events lock poisoned").clone()
        }
    }

    #[async_trait]
    impl EventPublisher for CollectingPublisher {
        async fn publish(&self, event: &Event) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("broker unavailable");
            }
            self.events
                .lock()
                .expect("events lock poisoned")
                .push(event.clone());
            Ok(())
        }
    }
}
