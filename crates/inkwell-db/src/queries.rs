use crate::models::{CommentRow, EntryPatchRow, EntryRow, EntryTable, Scope, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, created_at),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Diaries / Posts --

    pub fn insert_entry(&self, table: EntryTable, row: &EntryRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, owner_id, title, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    table.name()
                ),
                rusqlite::params![row.id, row.owner_id, row.title, row.content, row.created_at],
            )?;
            Ok(())
        })
    }

    pub fn list_entries(&self, table: EntryTable, scope: &Scope) -> Result<Vec<EntryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, owner_id, title, content, created_at FROM {}
                 WHERE (?1 IS NULL OR owner_id = ?1)
                 ORDER BY created_at, rowid",
                table.name()
            ))?;

            let rows = stmt
                .query_map([scope.owner_param()], map_entry)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_entry(&self, table: EntryTable, id: &str, scope: &Scope) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| query_entry(conn, table, id, scope))
    }

    /// Applies `patch` to the entry if it is visible under `scope`.
    /// Returns the updated row, or `None` when no visible row has that id.
    pub fn update_entry(
        &self,
        table: EntryTable,
        id: &str,
        scope: &Scope,
        patch: &EntryPatchRow,
    ) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                &format!(
                    "UPDATE {}
                     SET title = COALESCE(?1, title), content = COALESCE(?2, content)
                     WHERE id = ?3 AND (?4 IS NULL OR owner_id = ?4)",
                    table.name()
                ),
                rusqlite::params![patch.title, patch.content, id, scope.owner_param()],
            )?;

            if changed == 0 {
                return Ok(None);
            }
            query_entry(conn, table, id, scope)
        })
    }

    /// Returns `false` when no row with that id is visible under `scope`.
    pub fn delete_entry(&self, table: EntryTable, id: &str, scope: &Scope) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                &format!(
                    "DELETE FROM {} WHERE id = ?1 AND (?2 IS NULL OR owner_id = ?2)",
                    table.name()
                ),
                rusqlite::params![id, scope.owner_param()],
            )?;
            Ok(deleted > 0)
        })
    }

    // -- Comments --

    pub fn post_exists(&self, post_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM posts WHERE id = ?1", [post_id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn insert_comment(&self, row: &CommentRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (id, post_id, owner_id, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![row.id, row.post_id, row.owner_id, row.content, row.created_at],
            )?;
            Ok(())
        })
    }

    pub fn list_comments_for_post(&self, post_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, post_id, owner_id, content, created_at FROM comments
                 WHERE post_id = ?1
                 ORDER BY created_at, rowid",
            )?;

            let rows = stmt
                .query_map([post_id], |row| {
                    Ok(CommentRow {
                        id: row.get(0)?,
                        post_id: row.get(1)?,
                        owner_id: row.get(2)?,
                        content: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &'static str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, password, created_at FROM users WHERE {} = ?1",
        column
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_entry(conn: &Connection, table: EntryTable, id: &str, scope: &Scope) -> Result<Option<EntryRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, owner_id, title, content, created_at FROM {}
         WHERE id = ?1 AND (?2 IS NULL OR owner_id = ?2)",
        table.name()
    ))?;

    let row = stmt
        .query_row(rusqlite::params![id, scope.owner_param()], map_entry)
        .optional()?;

    Ok(row)
}

fn map_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
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

    fn db_with_users() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "alice", "hash", "2026-01-01T00:00:00.000000Z").unwrap();
        db.create_user("bob", "bob", "hash", "2026-01-01T00:00:00.000000Z").unwrap();
        db
    }

    fn entry(id: &str, owner: &str, at: &str) -> EntryRow {
        EntryRow {
            id: id.into(),
            owner_id: owner.into(),
            title: format!("title {id}"),
            content: format!("content {id}"),
            created_at: at.into(),
        }
    }

    fn owned(owner: &str) -> Scope {
        Scope::OwnedBy(owner.into())
    }

    #[test]
    fn list_respects_scope() {
        let db = db_with_users();
        db.insert_entry(EntryTable::Diaries, &entry("d1", "alice", "2026-01-01T00:00:01.000000Z")).unwrap();
        db.insert_entry(EntryTable::Diaries, &entry("d2", "bob", "2026-01-01T00:00:02.000000Z")).unwrap();
        db.insert_entry(EntryTable::Diaries, &entry("d3", "alice", "2026-01-01T00:00:03.000000Z")).unwrap();

        let mine: Vec<_> = db
            .list_entries(EntryTable::Diaries, &owned("alice"))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(mine, vec!["d1", "d3"]);

        let all = db.list_entries(EntryTable::Diaries, &Scope::All).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn tables_are_separate() {
        let db = db_with_users();
        db.insert_entry(EntryTable::Posts, &entry("p1", "alice", "2026-01-01T00:00:01.000000Z")).unwrap();

        assert!(db.list_entries(EntryTable::Diaries, &Scope::All).unwrap().is_empty());
        assert!(db.get_entry(EntryTable::Diaries, "p1", &Scope::All).unwrap().is_none());
    }

    #[test]
    fn update_of_foreign_row_is_a_miss() {
        let db = db_with_users();
        db.insert_entry(EntryTable::Posts, &entry("p1", "alice", "2026-01-01T00:00:01.000000Z")).unwrap();

        let patch = EntryPatchRow {
            title: Some("hijacked".into()),
            content: None,
        };
        assert!(db.update_entry(EntryTable::Posts, "p1", &owned("bob"), &patch).unwrap().is_none());

        let stored = db.get_entry(EntryTable::Posts, "p1", &Scope::All).unwrap().unwrap();
        assert_eq!(stored.title, "title p1");
    }

    #[test]
    fn partial_update_keeps_untouched_columns() {
        let db = db_with_users();
        db.insert_entry(EntryTable::Diaries, &entry("d1", "alice", "2026-01-01T00:00:01.000000Z")).unwrap();

        let patch = EntryPatchRow {
            title: None,
            content: Some("rewritten".into()),
        };
        let row = db
            .update_entry(EntryTable::Diaries, "d1", &owned("alice"), &patch)
            .unwrap()
            .unwrap();
        assert_eq!(row.title, "title d1");
        assert_eq!(row.content, "rewritten");
    }

    #[test]
    fn delete_is_scoped() {
        let db = db_with_users();
        db.insert_entry(EntryTable::Diaries, &entry("d1", "alice", "2026-01-01T00:00:01.000000Z")).unwrap();

        assert!(!db.delete_entry(EntryTable::Diaries, "d1", &owned("bob")).unwrap());
        assert!(db.delete_entry(EntryTable::Diaries, "d1", &owned("alice")).unwrap());
        assert!(!db.delete_entry(EntryTable::Diaries, "d1", &owned("alice")).unwrap());
    }

    #[test]
    fn deleting_post_removes_its_comments() {
        let db = db_with_users();
        db.insert_entry(EntryTable::Posts, &entry("p1", "alice", "2026-01-01T00:00:01.000000Z")).unwrap();
        db.insert_comment(&CommentRow {
            id: "c1".into(),
            post_id: "p1".into(),
            owner_id: "bob".into(),
            content: "nice".into(),
            created_at: "2026-01-01T00:00:02.000000Z".into(),
        })
        .unwrap();
        assert_eq!(db.list_comments_for_post("p1").unwrap().len(), 1);

        db.delete_entry(EntryTable::Posts, "p1", &owned("alice")).unwrap();
        assert!(db.list_comments_for_post("p1").unwrap().is_empty());
    }

    #[test]
    fn comment_requires_existing_post() {
        let db = db_with_users();
        assert!(!db.post_exists("missing").unwrap());

        let res = db.insert_comment(&CommentRow {
            id: "c1".into(),
            post_id: "missing".into(),
            owner_id: "bob".into(),
            content: "orphan".into(),
            created_at: "2026-01-01T00:00:02.000000Z".into(),
        });
        assert!(crate::is_constraint_violation(&res.unwrap_err()));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = db_with_users();
        let err = db
            .create_user("alice-2", "alice", "hash", "2026-01-01T00:00:00.000000Z")
            .unwrap_err();
        assert!(crate::is_constraint_violation(&err));
        assert!(!crate::is_constraint_violation(&anyhow::anyhow!("DB lock poisoned")));
        assert_eq!(db.get_user_by_username("alice").unwrap().unwrap().id, "alice");
        assert!(db.get_user_by_id("nobody").unwrap().is_none());
    }
}
