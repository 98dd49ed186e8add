/// Credential row for the auth path. Everything else maps straight onto the
/// tabdeel-types domain models via the row converters in queries.rs; this is
/// the one shape that must not leak past the API's auth handlers.
pub struct UserAuthRow {
    pub id: String,
    pub username: String,
    pub password: String,
}

/// Outcome of the guarded pending→resolved transition. The conditional
/// UPDATE settles concurrent responders: exactly one observes `Resolved`.
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved,
    /// The request row was already accepted or declined (or the CAS lost).
    NotPending,
    /// An accept guard found this item no longer active.
    ItemUnavailable(String),
}
