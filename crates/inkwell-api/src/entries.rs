//! Operations shared by diaries and posts. The two differ only in their
//! table and in the scope [`scoped_query`] assigns to reads.

use uuid::Uuid;

use inkwell_db::{Database, EntryPatchRow, EntryRow, EntryTable};
use inkwell_types::api::{EntryPatch, EntryRequest};
use inkwell_types::models::{Diary, Identity, Post};

use crate::error::ApiError;
use crate::rows::{now_timestamp, parse_id, parse_timestamp};
use crate::scope::{Access, Resource, scoped_query};
use crate::validation::validate_entry;

pub(crate) trait Entry: Sized {
    const TABLE: EntryTable;
    const RESOURCE: Resource;
    const NAME: &'static str;

    fn from_row(row: EntryRow) -> anyhow::Result<Self>;
}

impl Entry for Diary {
    const TABLE: EntryTable = EntryTable::Diaries;
    const RESOURCE: Resource = Resource::Diary;
    const NAME: &'static str = "diary";

    fn from_row(row: EntryRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            owner: parse_id(&row.owner_id)?,
            title: row.title,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl Entry for Post {
    const TABLE: EntryTable = EntryTable::Posts;
    const RESOURCE: Resource = Resource::Post;
    const NAME: &'static str = "post";

    fn from_row(row: EntryRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            owner: parse_id(&row.owner_id)?,
            title: row.title,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Path ids that are not UUIDs cannot name any row.
pub(crate) fn parse_path_id<E: Entry>(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(E::NAME))
}

pub(crate) fn create<E: Entry>(db: &Database, identity: &Identity, req: EntryRequest) -> Result<E, ApiError> {
    validate_entry(&EntryPatch::from(req.clone()))?;

    let row = EntryRow {
        id: Uuid::new_v4().to_string(),
        owner_id: identity.user_id.to_string(),
        title: req.title,
        content: req.content,
        created_at: now_timestamp(),
    };
    db.insert_entry(E::TABLE, &row)?;

    Ok(E::from_row(row)?)
}

pub(crate) fn list<E: Entry>(db: &Database, identity: &Identity) -> Result<Vec<E>, ApiError> {
    let scope = scoped_query(identity, E::RESOURCE, Access::Read);
    let rows = db.list_entries(E::TABLE, &scope)?;

    let entries = rows
        .into_iter()
        .map(E::from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(entries)
}

pub(crate) fn get<E: Entry>(db: &Database, identity: &Identity, id: Uuid) -> Result<E, ApiError> {
    let scope = scoped_query(identity, E::RESOURCE, Access::Read);
    let row = db
        .get_entry(E::TABLE, &id.to_string(), &scope)?
        .ok_or(ApiError::NotFound(E::NAME))?;

    Ok(E::from_row(row)?)
}

pub(crate) fn update<E: Entry>(
    db: &Database,
    identity: &Identity,
    id: Uuid,
    patch: EntryPatch,
) -> Result<E, ApiError> {
    let scope = scoped_query(identity, E::RESOURCE, Access::Write);

    // Ownership comes first: a foreign row is not found even if the body is bad.
    if db.get_entry(E::TABLE, &id.to_string(), &scope)?.is_none() {
        return Err(ApiError::NotFound(E::NAME));
    }
    validate_entry(&patch)?;

    let patch = EntryPatchRow {
        title: patch.title,
        content: patch.content,
    };
    let row = db
        .update_entry(E::TABLE, &id.to_string(), &scope, &patch)?
        .ok_or(ApiError::NotFound(E::NAME))?;

    Ok(E::from_row(row)?)
}

pub(crate) fn delete<E: Entry>(db: &Database, identity: &Identity, id: Uuid) -> Result<(), ApiError> {
    let scope = scoped_query(identity, E::RESOURCE, Access::Write);
    if db.delete_entry(E::TABLE, &id.to_string(), &scope)? {
        Ok(())
    } else {
        Err(ApiError::NotFound(E::NAME))
    }
}
