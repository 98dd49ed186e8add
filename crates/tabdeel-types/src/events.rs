use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ItemStatus, SwapStatus};

/// Events published after successful writes. The service carries no wire
/// transport of its own; push delivery belongs to whatever subscribes to
/// the in-process notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MarketEvent {
    /// A new swap offer landed in someone's inbox
    SwapRequestCreated {
        id: Uuid,
        requester_id: Uuid,
        target_owner_id: Uuid,
        target_item_id: Uuid,
        offered_item_id: Uuid,
    },

    /// A pending request was accepted or declined
    SwapRequestResolved {
        id: Uuid,
        status: SwapStatus,
        requester_id: Uuid,
        target_owner_id: Uuid,
    },

    /// A message was appended to an accepted request's thread
    MessageCreated {
        id: Uuid,
        swap_request_id: Uuid,
        sender_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A listing changed lifecycle state
    ItemStatusChanged {
        id: Uuid,
        owner_id: Uuid,
        status: ItemStatus,
    },
}

impl MarketEvent {
    /// The two users a consumer would route this event to.
    pub fn audience(&self) -> Vec<Uuid> {
        match self {
            Self::SwapRequestCreated { requester_id, target_owner_id, .. }
            | Self::SwapRequestResolved { requester_id, target_owner_id, .. } => {
                vec![*requester_id, *target_owner_id]
            }
            Self::MessageCreated { sender_id, .. } => vec![*sender_id],
            Self::ItemStatusChanged { owner_id, .. } => vec![*owner_id],
        }
    }
}
