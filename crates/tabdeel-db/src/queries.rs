use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use tabdeel_types::models::{Condition, Item, ItemStatus, Message, SwapRequest, SwapStatus, User};

use crate::Database;
use crate::models::{ResolveOutcome, UserAuthRow};

const ITEM_COLS: &str = "id, title, description, images, category, condition, city, \
     desired_keywords, desired_categories, status, owner_id, created_at, updated_at";

const SWAP_COLS: &str = "id, target_item_id, target_owner_id, requester_id, offered_item_id, \
     message, status, created_at, updated_at";

const MESSAGE_COLS: &str = "id, swap_request_id, sender_id, text, created_at";

impl Database {
    // -- Users --

    pub fn insert_user(&self, user: &User, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, name, city, avatar_url, preferred_categories, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    user.id.to_string(),
                    user.username,
                    password_hash,
                    user.name,
                    user.city,
                    user.avatar_url,
                    serde_json::to_string(&user.preferred_categories)?,
                    encode_ts(user.created_at),
                ],
            )?;
            Ok(())
        })
    }

    pub fn auth_by_username(&self, username: &str) -> Result<Option<UserAuthRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(UserAuthRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, name, city, avatar_url, preferred_categories, created_at
                 FROM users WHERE id = ?1",
                [id.to_string()],
                row_to_user,
            )
            .optional()
        })
    }

    pub fn update_user_profile(
        &self,
        id: Uuid,
        name: &str,
        city: &str,
        avatar_url: Option<&str>,
        preferred_categories: &[String],
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE users SET name = ?2, city = ?3, avatar_url = ?4, preferred_categories = ?5
                 WHERE id = ?1",
                rusqlite::params![
                    id.to_string(),
                    name,
                    city,
                    avatar_url,
                    serde_json::to_string(preferred_categories)?,
                ],
            )?;
            Ok(affected > 0)
        })
    }

    // -- Items --

    pub fn insert_item(&self, item: &Item) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                &format!("INSERT INTO items ({ITEM_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"),
                rusqlite::params![
                    item.id.to_string(),
                    item.title,
                    item.description,
                    serde_json::to_string(&item.images)?,
                    item.category,
                    item.condition.as_str(),
                    item.city,
                    item.desired_keywords,
                    serde_json::to_string(&item.desired_categories)?,
                    item.status.as_str(),
                    item.owner_id.to_string(),
                    encode_ts(item.created_at),
                    encode_ts(item.updated_at),
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {ITEM_COLS} FROM items WHERE id = ?1"),
                [id.to_string()],
                row_to_item,
            )
            .optional()
        })
    }

    /// Equality-conjunction query over active listings. The optional filters
    /// AND onto the status predicate; anything fuzzier happens above this
    /// layer.
    pub fn list_active_items(
        &self,
        category: Option<&str>,
        city: Option<&str>,
        condition: Option<&str>,
    ) -> Result<Vec<Item>> {
        self.with_conn(|conn| {
            let mut sql =
                format!("SELECT {ITEM_COLS} FROM items WHERE status = 'active'");
            let mut params: Vec<&dyn rusqlite::types::ToSql> = Vec::new();

            if let Some(ref c) = category {
                sql.push_str(" AND category = ?");
                params.push(c);
            }
            if let Some(ref c) = city {
                sql.push_str(" AND city = ?");
                params.push(c);
            }
            if let Some(ref c) = condition {
                sql.push_str(" AND condition = ?");
                params.push(c);
            }
            sql.push_str(" ORDER BY created_at DESC, id");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), row_to_item)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_items_by_owner(&self, owner_id: Uuid) -> Result<Vec<Item>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLS} FROM items WHERE owner_id = ?1 ORDER BY created_at DESC, id"
            ))?;
            let rows = stmt
                .query_map([owner_id.to_string()], row_to_item)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Full-row rewrite of a listing, gated on it still being active.
    pub fn update_item_row(&self, item: &Item) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE items SET title = ?2, description = ?3, images = ?4, category = ?5,
                        condition = ?6, city = ?7, desired_keywords = ?8,
                        desired_categories = ?9, updated_at = ?10
                 WHERE id = ?1 AND status = 'active'",
                rusqlite::params![
                    item.id.to_string(),
                    item.title,
                    item.description,
                    serde_json::to_string(&item.images)?,
                    item.category,
                    item.condition.as_str(),
                    item.city,
                    item.desired_keywords,
                    serde_json::to_string(&item.desired_categories)?,
                    encode_ts(item.updated_at),
                ],
            )?;
            Ok(affected > 0)
        })
    }

    /// Compare-and-set status transition. Returns false when the row was not
    /// in `from` anymore, which is how terminal states stay terminal.
    pub fn set_item_status(
        &self,
        id: Uuid,
        from: ItemStatus,
        to: ItemStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE items SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
                rusqlite::params![
                    id.to_string(),
                    from.as_str(),
                    to.as_str(),
                    encode_ts(updated_at),
                ],
            )?;
            Ok(affected > 0)
        })
    }

    // -- Swap requests --

    pub fn insert_swap_request(&self, request: &SwapRequest) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                &format!("INSERT INTO swap_requests ({SWAP_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                rusqlite::params![
                    request.id.to_string(),
                    request.target_item_id.to_string(),
                    request.target_owner_id.to_string(),
                    request.requester_id.to_string(),
                    request.offered_item_id.to_string(),
                    request.message,
                    request.status.as_str(),
                    encode_ts(request.created_at),
                    encode_ts(request.updated_at),
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_swap_request(&self, id: Uuid) -> Result<Option<SwapRequest>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {SWAP_COLS} FROM swap_requests WHERE id = ?1"),
                [id.to_string()],
                row_to_swap,
            )
            .optional()
        })
    }

    /// Requests sent by `user_id`. One half of the union the ledger builds;
    /// the store only indexes single-field equality, so sent and received
    /// are always two separate queries.
    pub fn list_swaps_by_requester(
        &self,
        user_id: Uuid,
        status: Option<SwapStatus>,
    ) -> Result<Vec<SwapRequest>> {
        self.list_swaps("requester_id", user_id, status)
    }

    /// Requests received by `user_id` (they own the target item).
    pub fn list_swaps_by_target_owner(
        &self,
        user_id: Uuid,
        status: Option<SwapStatus>,
    ) -> Result<Vec<SwapRequest>> {
        self.list_swaps("target_owner_id", user_id, status)
    }

    fn list_swaps(
        &self,
        user_col: &str,
        user_id: Uuid,
        status: Option<SwapStatus>,
    ) -> Result<Vec<SwapRequest>> {
        self.with_conn(|conn| {
            let mut sql = format!("SELECT {SWAP_COLS} FROM swap_requests WHERE {user_col} = ?");
            let uid = user_id.to_string();
            let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&uid];

            let status_str = status.map(|s| s.as_str());
            if let Some(ref s) = status_str {
                sql.push_str(" AND status = ?");
                params.push(s);
            }
            sql.push_str(" ORDER BY created_at DESC, id");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), row_to_swap)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Guarded pending→terminal transition. The whole check-and-set runs in
    /// one transaction: every id in `require_active_items` must still be an
    /// active listing, then the conditional UPDATE settles which responder
    /// wins. Losing either guard leaves the row untouched.
    pub fn resolve_swap_request(
        &self,
        id: Uuid,
        new_status: SwapStatus,
        require_active_items: &[Uuid],
        updated_at: DateTime<Utc>,
    ) -> Result<ResolveOutcome> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            for item_id in require_active_items {
                let status: Option<String> = tx
                    .query_row(
                        "SELECT status FROM items WHERE id = ?1",
                        [item_id.to_string()],
                        |row| row.get(0),
                    )
                    .optional()?;
                if status.as_deref() != Some("active") {
                    return Ok(ResolveOutcome::ItemUnavailable(item_id.to_string()));
                }
            }

            let affected = tx.execute(
                "UPDATE swap_requests SET status = ?2, updated_at = ?3
                 WHERE id = ?1 AND status = 'pending'",
                rusqlite::params![id.to_string(), new_status.as_str(), encode_ts(updated_at)],
            )?;

            if affected == 0 {
                return Ok(ResolveOutcome::NotPending);
            }

            tx.commit()?;
            Ok(ResolveOutcome::Resolved)
        })
    }

    // -- Messages --

    /// Appends to a thread and bumps the parent request's updated_at in the
    /// same transaction; that timestamp is what orders conversation lists.
    pub fn append_message(&self, message: &Message) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                &format!("INSERT INTO messages ({MESSAGE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                rusqlite::params![
                    message.id.to_string(),
                    message.swap_request_id.to_string(),
                    message.sender_id.to_string(),
                    message.text,
                    encode_ts(message.created_at),
                ],
            )?;
            tx.execute(
                "UPDATE swap_requests SET updated_at = ?2 WHERE id = ?1",
                rusqlite::params![
                    message.swap_request_id.to_string(),
                    encode_ts(message.created_at),
                ],
            )?;

            tx.commit()?;
            Ok(())
        })
    }

    pub fn list_messages(&self, swap_request_id: Uuid) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLS} FROM messages WHERE swap_request_id = ?1
                 ORDER BY created_at ASC, id"
            ))?;
            let rows = stmt
                .query_map([swap_request_id.to_string()], row_to_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn latest_message(&self, swap_request_id: Uuid) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {MESSAGE_COLS} FROM messages WHERE swap_request_id = ?1
                     ORDER BY created_at DESC, id DESC LIMIT 1"
                ),
                [swap_request_id.to_string()],
                row_to_message,
            )
            .optional()
        })
    }
}

// -- Row converters --

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(row.get::<_, String>(0)?, 0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        city: row.get(3)?,
        avatar_url: row.get(4)?,
        preferred_categories: parse_json_vec(row.get::<_, String>(5)?, 5)?,
        created_at: parse_ts(row.get::<_, String>(6)?, 6)?,
    })
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    let condition_raw: String = row.get(5)?;
    let status_raw: String = row.get(9)?;
    Ok(Item {
        id: parse_uuid(row.get::<_, String>(0)?, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        images: parse_json_vec(row.get::<_, String>(3)?, 3)?,
        category: row.get(4)?,
        condition: Condition::parse(&condition_raw)
            .ok_or_else(|| bad_column(5, &condition_raw))?,
        city: row.get(6)?,
        desired_keywords: row.get(7)?,
        desired_categories: parse_json_vec(row.get::<_, String>(8)?, 8)?,
        status: ItemStatus::parse(&status_raw).ok_or_else(|| bad_column(9, &status_raw))?,
        owner_id: parse_uuid(row.get::<_, String>(10)?, 10)?,
        created_at: parse_ts(row.get::<_, String>(11)?, 11)?,
        updated_at: parse_ts(row.get::<_, String>(12)?, 12)?,
    })
}

fn row_to_swap(row: &rusqlite::Row<'_>) -> rusqlite::Result<SwapRequest> {
    let status_raw: String = row.get(6)?;
    Ok(SwapRequest {
        id: parse_uuid(row.get::<_, String>(0)?, 0)?,
        target_item_id: parse_uuid(row.get::<_, String>(1)?, 1)?,
        target_owner_id: parse_uuid(row.get::<_, String>(2)?, 2)?,
        requester_id: parse_uuid(row.get::<_, String>(3)?, 3)?,
        offered_item_id: parse_uuid(row.get::<_, String>(4)?, 4)?,
        message: row.get(5)?,
        status: SwapStatus::parse(&status_raw).ok_or_else(|| bad_column(6, &status_raw))?,
        created_at: parse_ts(row.get::<_, String>(7)?, 7)?,
        updated_at: parse_ts(row.get::<_, String>(8)?, 8)?,
    })
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: parse_uuid(row.get::<_, String>(0)?, 0)?,
        swap_request_id: parse_uuid(row.get::<_, String>(1)?, 1)?,
        sender_id: parse_uuid(row.get::<_, String>(2)?, 2)?,
        text: row.get(3)?,
        created_at: parse_ts(row.get::<_, String>(4)?, 4)?,
    })
}

/// RFC 3339 with fixed micros so the TEXT column sorts chronologically.
fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: String, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_uuid(raw: String, idx: usize) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_json_vec(raw: String, idx: usize) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn bad_column(idx: usize, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unrecognized value '{raw}'").into(),
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn user(db: &Database, username: &str, city: &str) -> User {
        let u = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            name: format!("{username} full"),
            city: city.to_string(),
            avatar_url: None,
            preferred_categories: vec!["Books".to_string()],
            created_at: Utc::now(),
        };
        db.insert_user(&u, "argon2-hash").unwrap();
        u
    }

    fn item(db: &Database, owner: &User, title: &str, created_at: DateTime<Utc>) -> Item {
        let i = Item {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "A perfectly serviceable thing, lightly used.".to_string(),
            images: vec!["img-1".to_string()],
            category: "Books".to_string(),
            condition: Condition::Good,
            city: owner.city.clone(),
            desired_keywords: "anything".to_string(),
            desired_categories: vec![],
            status: ItemStatus::Active,
            owner_id: owner.id,
            created_at,
            updated_at: created_at,
        };
        db.insert_item(&i).unwrap();
        i
    }

    fn swap(db: &Database, requester: &User, target: &Item, offered: &Item) -> SwapRequest {
        let now = Utc::now();
        let r = SwapRequest {
            id: Uuid::new_v4(),
            target_item_id: target.id,
            target_owner_id: target.owner_id,
            requester_id: requester.id,
            offered_item_id: offered.id,
            message: None,
            status: SwapStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        db.insert_swap_request(&r).unwrap();
        r
    }

    #[test]
    fn item_round_trip() {
        let db = db();
        let owner = user(&db, "ahmed", "Karachi");
        let created = item(&db, &owner, "Cricket ball", Utc::now());

        let fetched = db.get_item(created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Cricket ball");
        assert_eq!(fetched.condition, Condition::Good);
        assert_eq!(fetched.status, ItemStatus::Active);
        assert_eq!(fetched.owner_id, owner.id);
        assert_eq!(fetched.images, vec!["img-1".to_string()]);
    }

    #[test]
    fn active_listing_filters_are_conjunctive() {
        let db = db();
        let a = user(&db, "ahmed", "Karachi");
        let b = user(&db, "zainab", "Lahore");
        item(&db, &a, "Ball", Utc::now());
        item(&db, &b, "Guitar", Utc::now());

        let karachi = db.list_active_items(None, Some("Karachi"), None).unwrap();
        assert_eq!(karachi.len(), 1);
        assert_eq!(karachi[0].title, "Ball");

        let none = db
            .list_active_items(Some("Electronics"), Some("Karachi"), None)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn newest_listings_come_first() {
        let db = db();
        let owner = user(&db, "ahmed", "Karachi");
        let base = Utc::now();
        item(&db, &owner, "older", base - Duration::seconds(10));
        item(&db, &owner, "newer", base);

        let items = db.list_active_items(None, None, None).unwrap();
        assert_eq!(items[0].title, "newer");
        assert_eq!(items[1].title, "older");
    }

    #[test]
    fn status_cas_is_one_way() {
        let db = db();
        let owner = user(&db, "ahmed", "Karachi");
        let i = item(&db, &owner, "Ball", Utc::now());

        assert!(db
            .set_item_status(i.id, ItemStatus::Active, ItemStatus::Exchanged, Utc::now())
            .unwrap());
        // Terminal: no second transition, in either direction.
        assert!(!db
            .set_item_status(i.id, ItemStatus::Active, ItemStatus::Removed, Utc::now())
            .unwrap());
        assert_eq!(
            db.get_item(i.id).unwrap().unwrap().status,
            ItemStatus::Exchanged
        );
    }

    #[test]
    fn resolve_swap_is_settled_by_conditional_update() {
        let db = db();
        let a = user(&db, "ahmed", "Karachi");
        let b = user(&db, "zainab", "Lahore");
        let target = item(&db, &b, "Guitar", Utc::now());
        let offered = item(&db, &a, "Ball", Utc::now());
        let req = swap(&db, &a, &target, &offered);

        let first = db
            .resolve_swap_request(req.id, SwapStatus::Accepted, &[target.id, offered.id], Utc::now())
            .unwrap();
        assert_eq!(first, ResolveOutcome::Resolved);

        // The losing responder sees NotPending, never a silent overwrite.
        let second = db
            .resolve_swap_request(req.id, SwapStatus::Declined, &[], Utc::now())
            .unwrap();
        assert_eq!(second, ResolveOutcome::NotPending);
        assert_eq!(
            db.get_swap_request(req.id).unwrap().unwrap().status,
            SwapStatus::Accepted
        );
    }

    #[test]
    fn resolve_guard_rejects_stale_items() {
        let db = db();
        let a = user(&db, "ahmed", "Karachi");
        let b = user(&db, "zainab", "Lahore");
        let target = item(&db, &b, "Guitar", Utc::now());
        let offered = item(&db, &a, "Ball", Utc::now());
        let req = swap(&db, &a, &target, &offered);

        db.set_item_status(offered.id, ItemStatus::Active, ItemStatus::Removed, Utc::now())
            .unwrap();

        let outcome = db
            .resolve_swap_request(req.id, SwapStatus::Accepted, &[target.id, offered.id], Utc::now())
            .unwrap();
        assert_eq!(outcome, ResolveOutcome::ItemUnavailable(offered.id.to_string()));
        assert_eq!(
            db.get_swap_request(req.id).unwrap().unwrap().status,
            SwapStatus::Pending
        );
    }

    #[test]
    fn append_message_bumps_parent_updated_at() {
        let db = db();
        let a = user(&db, "ahmed", "Karachi");
        let b = user(&db, "zainab", "Lahore");
        let target = item(&db, &b, "Guitar", Utc::now());
        let offered = item(&db, &a, "Ball", Utc::now());
        let req = swap(&db, &a, &target, &offered);
        db.resolve_swap_request(req.id, SwapStatus::Accepted, &[], Utc::now())
            .unwrap();

        let later = Utc::now() + Duration::seconds(5);
        let msg = Message {
            id: Uuid::new_v4(),
            swap_request_id: req.id,
            sender_id: a.id,
            text: "salaam".to_string(),
            created_at: later,
        };
        db.append_message(&msg).unwrap();

        // Stored at micros precision, so compare at micros precision.
        let stored = db.get_swap_request(req.id).unwrap().unwrap();
        assert_eq!(stored.updated_at.timestamp_micros(), later.timestamp_micros());
        assert_eq!(db.latest_message(req.id).unwrap().unwrap().text, "salaam");
    }

    #[test]
    fn messages_come_back_oldest_first() {
        let db = db();
        let a = user(&db, "ahmed", "Karachi");
        let b = user(&db, "zainab", "Lahore");
        let target = item(&db, &b, "Guitar", Utc::now());
        let offered = item(&db, &a, "Ball", Utc::now());
        let req = swap(&db, &a, &target, &offered);
        db.resolve_swap_request(req.id, SwapStatus::Accepted, &[], Utc::now())
            .unwrap();

        let base = Utc::now();
        for (offset, text) in [(0, "first"), (3, "second"), (7, "third")] {
            db.append_message(&Message {
                id: Uuid::new_v4(),
                swap_request_id: req.id,
                sender_id: a.id,
                text: text.to_string(),
                created_at: base + Duration::seconds(offset),
            })
            .unwrap();
        }

        let texts: Vec<String> = db
            .list_messages(req.id)
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }
}
