//! Change notification service
//!
//! One payload-less broadcast channel per entity collection. Services signal
//! a collection after committing a mutation; subscribers re-read on signal.
//! Dropping a receiver unsubscribes it.

use shared::types::Collection;
use tokio::sync::broadcast;

/// Buffered signals per subscriber. A lagged subscriber only needs to re-read
/// once, so a small buffer is enough.
const CHANNEL_CAPACITY: usize = 32;

/// In-process change notifier, one channel per collection.
#[derive(Debug)]
pub struct ChangeNotifier {
    senders: [broadcast::Sender<()>; Collection::ALL.len()],
}

fn slot(collection: Collection) -> usize {
    match collection {
        Collection::StockItems => 0,
        Collection::StockMovements => 1,
        Collection::Categories => 2,
        Collection::ActivityLogs => 3,
        Collection::UniformItems => 4,
        Collection::UniformCategories => 5,
        Collection::UniformMovements => 6,
        Collection::Issuances => 7,
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            senders: std::array::from_fn(|_| broadcast::channel(CHANNEL_CAPACITY).0),
        }
    }

    /// Subscribe to change signals for one collection. The receiver
    /// unsubscribes when dropped.
    pub fn subscribe(&self, collection: Collection) -> broadcast::Receiver<()> {
        self.senders[slot(collection)].subscribe()
    }

    /// Signal that something in the collection changed.
    pub fn notify(&self, collection: Collection) {
        // A send error only means nobody is listening right now
        let _ = self.senders[slot(collection)].send(());
    }

    /// Signal several collections at once.
    pub fn notify_all(&self, collections: &[Collection]) {
        for &collection in collections {
            self.notify(collection);
        }
    }

    /// Number of live subscribers for one collection.
    pub fn subscriber_count(&self, collection: Collection) -> usize {
        self.senders[slot(collection)].receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
