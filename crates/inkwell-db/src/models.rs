//! Database row types — these map directly to SQLite rows.
//! Distinct from inkwell-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

/// A diary or post row; both tables share this shape.
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

/// Column updates for an entry. `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct EntryPatchRow {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTable {
    Diaries,
    Posts,
}

impl EntryTable {
    pub fn name(self) -> &'static str {
        match self {
            Self::Diaries => "diaries",
            Self::Posts => "posts",
        }
    }
}

/// Row visibility for a query. `OwnedBy` adds an `owner_id` predicate to the
/// same statement that looks the row up, so rows of other owners are never
/// observed, not even as "exists but forbidden".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    OwnedBy(String),
}

impl Scope {
    /// Bound into `(?N IS NULL OR owner_id = ?N)`.
    pub(crate) fn owner_param(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::OwnedBy(owner) => Some(owner),
        }
    }
}
