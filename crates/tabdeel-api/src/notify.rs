use tokio::sync::broadcast;

use tabdeel_types::events::MarketEvent;

/// In-process fan-out of market events after successful writes. Push
/// delivery to clients is an external collaborator; whatever provides it
/// subscribes here.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<MarketEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.tx.subscribe()
    }

    /// Fire-and-forget: publishing with no subscribers is fine.
    pub fn publish(&self, event: MarketEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabdeel_types::models::ItemStatus;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscribers_see_published_events() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        let id = Uuid::new_v4();
        notifier.publish(MarketEvent::ItemStatusChanged {
            id,
            owner_id: Uuid::new_v4(),
            status: ItemStatus::Removed,
        });

        match rx.recv().await.unwrap() {
            MarketEvent::ItemStatusChanged { id: got, status, .. } => {
                assert_eq!(got, id);
                assert_eq!(status, ItemStatus::Removed);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let notifier = Notifier::new();
        notifier.publish(MarketEvent::ItemStatusChanged {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            status: ItemStatus::Exchanged,
        });
    }
}
