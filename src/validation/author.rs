use error_stack::{Report, ResultExt};
use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;
use crate::model::{Error, Result};
use crate::store::AuthorStore;

#[allow(clippy::expect_used)]
static PHONE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10}$").expect("compile phone number regex")
});

/// Checks that the author name is not empty or made of whitespace only.
///
/// This is the part of [`validate_name`] that does not need to look
/// up the store.
pub fn validate_name_present(name: &str) -> std::result::Result<&str, ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::NameRequired)
    } else {
        Ok(name)
    }
}

/// Validates an author name and makes sure no other author in
/// the `store` already uses it.
///
/// A passing lookup does not reserve the name. Inserts and renames
/// go through the store which rejects conflicts on its own, so the
/// result of this function may already be stale by the time the
/// name is written.
#[tracing::instrument(skip_all, name = "validate.author.name")]
pub async fn validate_name<'a, S>(store: &S, name: &'a str) -> Result<&'a str>
where
    S: AuthorStore + ?Sized,
{
    validate_name_present(name).map_err(Error::invalid)?;

    let existing = store
        .find_author_by_name(name)
        .await
        .change_context(Error::Store)
        .attach_printable("could not look up author by name")?;

    if existing.is_some() {
        return Err(Report::new(Error::invalid(ValidationError::NameTaken)));
    }

    Ok(name)
}

/// Phone numbers must be exactly 10 ASCII digits.
pub fn validate_phone_number(phone_number: &str) -> std::result::Result<&str, ValidationError> {
    if PHONE_NUMBER_REGEX.is_match(phone_number) {
        Ok(phone_number)
    } else {
        Err(ValidationError::InvalidPhoneNumber)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ErrorExt, NewAuthor};
    use crate::store::MemoryStore;

    #[test]
    fn test_validate_name_present() {
        assert_eq!(Ok("Jane Doe"), validate_name_present("Jane Doe"));
        assert_eq!(Ok("  padded  "), validate_name_present("  padded  "));

        assert_eq!(Err(ValidationError::NameRequired), validate_name_present(""));
        assert_eq!(Err(ValidationError::NameRequired), validate_name_present("   "));
        assert_eq!(Err(ValidationError::NameRequired), validate_name_present("\t\n"));
    }

    #[tokio::test]
    async fn test_validate_name_with_empty_store() {
        let store = MemoryStore::new();
        assert_eq!("Jane Doe", validate_name(&store, "Jane Doe").await.unwrap());

        let error = validate_name(&store, " ").await.unwrap_err();
        assert_eq!(Some(&ValidationError::NameRequired), error.validation_error());
    }

    #[tokio::test]
    async fn test_validate_name_rejects_existing() {
        let store = MemoryStore::new();
        NewAuthor::new("Jane Doe")
            .unwrap()
            .insert(&store)
            .await
            .unwrap();

        let error = validate_name(&store, "Jane Doe").await.unwrap_err();
        assert_eq!(Some(&ValidationError::NameTaken), error.validation_error());

        // names are compared exactly
        assert_eq!("jane doe", validate_name(&store, "jane doe").await.unwrap());
        assert_eq!("Jane Doe ", validate_name(&store, "Jane Doe ").await.unwrap());
    }

    #[test]
    fn test_validate_phone_number() {
        assert_eq!(Ok("5551234567"), validate_phone_number("5551234567"));
        assert_eq!(Ok("0000000000"), validate_phone_number("0000000000"));

        let invalid = [
            "",
            "555123456",
            "55512345678",
            "555-123-456",
            "555123456a",
            " 555123456",
            "5551234567\n",
            "５５５１２３４５６７",
        ];
        for phone_number in invalid {
            assert_eq!(
                Err(ValidationError::InvalidPhoneNumber),
                validate_phone_number(phone_number),
                "{phone_number:?} should be rejected"
            );
        }
    }
}
