//! Transport between sessions.

use tokio::sync::broadcast;

/// Carries opaque payloads between sessions.
///
/// Every subscriber receives every published payload, including its own.
pub trait ChangeNotifier: Send + Sync {
    fn publish(&self, payload: &str);
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// Process-local bus backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct InProcessChangeBus {
    sender: broadcast::Sender<String>,
}

impl InProcessChangeBus {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InProcessChangeBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl ChangeNotifier for InProcessChangeBus {
    fn publish(&self, payload: &str) {
        if self.sender.send(payload.to_string()).is_err() {
            tracing::trace!("change published with no subscribers");
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}
