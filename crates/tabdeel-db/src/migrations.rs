use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                   TEXT PRIMARY KEY,
            username             TEXT NOT NULL UNIQUE,
            password             TEXT NOT NULL,
            name                 TEXT NOT NULL,
            city                 TEXT NOT NULL,
            avatar_url           TEXT,
            preferred_categories TEXT NOT NULL DEFAULT '[]',
            created_at           TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS items (
            id                 TEXT PRIMARY KEY,
            title              TEXT NOT NULL,
            description        TEXT NOT NULL,
            images             TEXT NOT NULL DEFAULT '[]',
            category           TEXT NOT NULL,
            condition          TEXT NOT NULL,
            city               TEXT NOT NULL,
            desired_keywords   TEXT NOT NULL,
            desired_categories TEXT NOT NULL DEFAULT '[]',
            status             TEXT NOT NULL DEFAULT 'active',
            owner_id           TEXT NOT NULL REFERENCES users(id),
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_items_status
            ON items(status, category, city);
        CREATE INDEX IF NOT EXISTS idx_items_owner
            ON items(owner_id);

        CREATE TABLE IF NOT EXISTS swap_requests (
            id              TEXT PRIMARY KEY,
            target_item_id  TEXT NOT NULL REFERENCES items(id),
            target_owner_id TEXT NOT NULL REFERENCES users(id),
            requester_id    TEXT NOT NULL REFERENCES users(id),
            offered_item_id TEXT NOT NULL REFERENCES items(id),
            message         TEXT,
            status          TEXT NOT NULL DEFAULT 'pending',
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_swaps_requester
            ON swap_requests(requester_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_swaps_target_owner
            ON swap_requests(target_owner_id, created_at);

        CREATE TABLE IF NOT EXISTS messages (
            id              TEXT PRIMARY KEY,
            swap_request_id TEXT NOT NULL REFERENCES swap_requests(id),
            sender_id       TEXT NOT NULL REFERENCES users(id),
            text            TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_swap
            ON messages(swap_request_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
