//! Field validators for [`Author`](crate::Author) and [`Post`](crate::Post).
//!
//! Every validator returns the given value unchanged if it satisfies
//! the field's constraint. They are run every time a field is assigned,
//! whether it is through a constructor like [`NewAuthor::new`] or
//! through a change set like [`PostChanges::title`].
//!
//! [`NewAuthor::new`]: crate::model::NewAuthor::new
//! [`PostChanges::title`]: crate::model::PostChanges::title
use thiserror::Error;

pub mod author;
pub mod post;

pub use self::author::{validate_name, validate_name_present, validate_phone_number};
pub use self::post::{validate_category, validate_content, validate_summary, validate_title};

/// A field value has violated one of its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Author name is required.")]
    NameRequired,
    #[error("Author name must be unique.")]
    NameTaken,
    #[error("Phone number must be exactly 10 digits.")]
    InvalidPhoneNumber,
    #[error("Post content must be at least {} characters long.", post::CONTENT_MIN_CHARS)]
    ContentTooShort,
    #[error("Post summary must be a maximum of {} characters.", post::SUMMARY_MAX_CHARS)]
    SummaryTooLong,
    #[error("Post category must be either 'Fiction' or 'Non-Fiction'.")]
    InvalidCategory,
    #[error("Post title must be clickbait-y and contain one of the following: 'Won't Believe', 'Secret', 'Top', 'Guess'.")]
    TitleNotClickbait,
}

impl ValidationError {
    /// Name of the field that failed to validate.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameTaken => "name",
            Self::InvalidPhoneNumber => "phone_number",
            Self::ContentTooShort => "content",
            Self::SummaryTooLong => "summary",
            Self::InvalidCategory => "category",
            Self::TitleNotClickbait => "title",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn test_messages() {
        assert_eq!(
            "Post content must be at least 250 characters long.",
            ValidationError::ContentTooShort.to_string()
        );
        assert_eq!(
            "Post summary must be a maximum of 250 characters.",
            ValidationError::SummaryTooLong.to_string()
        );
        assert_eq!(
            "Author name must be unique.",
            ValidationError::NameTaken.to_string()
        );
    }

    #[test]
    fn test_field_names() {
        assert_eq!("name", ValidationError::NameTaken.field());
        assert_eq!("phone_number", ValidationError::InvalidPhoneNumber.field());
        assert_eq!("title", ValidationError::TitleNotClickbait.field());
    }
}
