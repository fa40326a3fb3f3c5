//! Conversions from store rows to wire models.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use inkwell_db::{CommentRow, UserRow};
use inkwell_types::models::{Comment, User};

/// Timestamps are written with microsecond precision so that what a create
/// call returns is exactly what a later read parses back.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let ts = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("corrupt timestamp '{}'", raw))?;
    Ok(ts.with_timezone(&Utc))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().with_context(|| format!("corrupt id '{}'", raw))
}

pub(crate) fn user_from_row(row: &UserRow) -> Result<User> {
    Ok(User {
        id: parse_id(&row.id)?,
        username: row.username.clone(),
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn comment_from_row(row: CommentRow) -> Result<Comment> {
    Ok(Comment {
        id: parse_id(&row.id)?,
        post: parse_id(&row.post_id)?,
        owner: parse_id(&row.owner_id)?,
        content: row.content,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_survives_storage() {
        let raw = now_timestamp();
        let parsed = parse_timestamp(&raw).unwrap();
        assert_eq!(parsed.to_rfc3339_opts(SecondsFormat::Micros, true), raw);
    }

    #[test]
    fn corrupt_values_are_errors() {
        assert!(parse_timestamp("2026-13-45 99:00").is_err());
        assert!(parse_id("not-a-uuid").is_err());
    }
}
