use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public user profile. The password hash never leaves tabdeel-db.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub city: String,
    pub avatar_url: Option<String>,
    pub preferred_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Physical condition of a listed item. Serialized with the labels the
/// listing form shows ("Like New" etc.), which is also how rows store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Like New" => Some(Condition::LikeNew),
            "Good" => Some(Condition::Good),
            "Fair" => Some(Condition::Fair),
            _ => None,
        }
    }
}

/// Listing lifecycle. `Active` is the only state from which anything moves;
/// `Exchanged` and `Removed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Exchanged,
    Removed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Exchanged => "exchanged",
            ItemStatus::Removed => "removed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ItemStatus::Active),
            "exchanged" => Some(ItemStatus::Exchanged),
            "removed" => Some(ItemStatus::Removed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Image ids resolved by the external image store; never dereferenced here.
    pub images: Vec<String>,
    pub category: String,
    pub condition: Condition,
    pub city: String,
    pub desired_keywords: String,
    pub desired_categories: Vec<String>,
    pub status: ItemStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One-shot lifecycle: `Pending` transitions exactly once, to `Accepted` or
/// `Declined`, and never again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Declined,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SwapStatus::Pending),
            "accepted" => Some(SwapStatus::Accepted),
            "declined" => Some(SwapStatus::Declined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: Uuid,
    pub target_item_id: Uuid,
    pub target_owner_id: Uuid,
    pub requester_id: Uuid,
    pub offered_item_id: Uuid,
    pub message: Option<String>,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    /// Also bumped on every message send; conversation lists order by this.
    pub updated_at: DateTime<Utc>,
}

impl SwapRequest {
    pub fn participants(&self) -> [Uuid; 2] {
        [self.requester_id, self.target_owner_id]
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.requester_id == user_id || self.target_owner_id == user_id
    }

    /// The counterparty from `viewer`'s side. Callers must have already
    /// checked `is_participant`.
    pub fn other_party(&self, viewer: Uuid) -> Uuid {
        if self.requester_id == viewer {
            self.target_owner_id
        } else {
            self.requester_id
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub swap_request_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A conversation is a view over an accepted swap request, not a stored
/// entity. It exists exactly while the backing request is `accepted`.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    /// Same id as the backing swap request.
    pub id: Uuid,
    pub swap_request: SwapRequest,
    pub other_user: User,
    /// `None` until the first message; the API layer renders the
    /// "swap accepted" placeholder for that case.
    pub last_message: Option<Message>,
}
