use inkwell_db::Scope;
use inkwell_types::models::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Diary,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Row visibility for `identity` acting on `resource`.
///
/// Diaries are private in both directions. Posts are readable by everyone
/// and writable only by their owner. Ownership is the only predicate.
pub fn scoped_query(identity: &Identity, resource: Resource, access: Access) -> Scope {
    match (resource, access) {
        (Resource::Post, Access::Read) => Scope::All,
        (Resource::Diary, _) | (Resource::Post, Access::Write) => {
            Scope::OwnedBy(identity.user_id.to_string())
        }
    }
}
