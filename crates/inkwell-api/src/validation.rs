use std::collections::BTreeMap;

use uuid::Uuid;

use inkwell_types::api::{CommentRequest, EntryPatch, RegisterRequest};

use crate::error::ApiError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;
const PASSWORD_MIN: usize = 8;
const TITLE_MAX: usize = 200;
const COMMENT_MAX: usize = 1000;

/// Field name -> messages, reported together for one payload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();

    let len = req.username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        errors.add(
            "username",
            format!("Must be between {USERNAME_MIN} and {USERNAME_MAX} characters."),
        );
    }
    if !req.username.chars().all(is_username_char) {
        errors.add(
            "username",
            "May contain only letters, digits and @/./+/-/_ characters.",
        );
    }
    if req.password.chars().count() < PASSWORD_MIN {
        errors.add(
            "password",
            format!("Must be at least {PASSWORD_MIN} characters."),
        );
    }

    errors.finish()
}

/// Checks the fields a patch carries; absent fields are not validated.
pub fn validate_entry(patch: &EntryPatch) -> Result<(), ApiError> {
    let mut errors = FieldErrors::default();

    if let Some(title) = &patch.title {
        check_text(&mut errors, "title", title, Some(TITLE_MAX));
    }
    if let Some(content) = &patch.content {
        check_text(&mut errors, "content", content, None);
    }

    errors.finish()
}

/// Returns the parsed parent post id. Whether that post exists is checked
/// against the store by the caller.
pub fn validate_comment(req: &CommentRequest) -> Result<Uuid, ApiError> {
    let mut errors = FieldErrors::default();
    let post = req.post.parse::<Uuid>().ok();
    if post.is_none() {
        errors.add("post", invalid_post(&req.post));
    }
    check_text(&mut errors, "content", &req.content, Some(COMMENT_MAX));
    errors.finish()?;

    post.ok_or_else(|| ApiError::validation("post", invalid_post(&req.post)))
}

pub fn invalid_post(raw: &str) -> String {
    format!("Invalid post id \"{raw}\".")
}

fn check_text(errors: &mut FieldErrors, field: &str, value: &str, max: Option<usize>) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            errors.add(field, format!("Ensure this field has no more than {max} characters."));
        }
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}
