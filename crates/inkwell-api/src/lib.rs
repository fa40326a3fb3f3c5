pub mod auth;
pub mod comments;
pub mod diaries;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod routes;
pub mod scope;
pub mod validation;

mod entries;
mod rows;

pub use auth::{AppState, AppStateInner, AuthSettings};
pub use error::ApiError;
pub use routes::router;
