use super::ValidationError;

/// Minimum amount of characters a post content must have.
pub const CONTENT_MIN_CHARS: usize = 250;

/// Maximum amount of characters a post summary may have.
pub const SUMMARY_MAX_CHARS: usize = 250;

/// Post titles must contain at least one of these phrases.
pub const CLICKBAIT_PHRASES: [&str; 4] = ["Won't Believe", "Secret", "Top", "Guess"];

/// Accepted values of a post category.
pub const CATEGORIES: [&str; 2] = ["Fiction", "Non-Fiction"];

pub fn validate_content(content: &str) -> Result<&str, ValidationError> {
    if content.chars().count() < CONTENT_MIN_CHARS {
        Err(ValidationError::ContentTooShort)
    } else {
        Ok(content)
    }
}

pub fn validate_summary(summary: &str) -> Result<&str, ValidationError> {
    if summary.chars().count() > SUMMARY_MAX_CHARS {
        Err(ValidationError::SummaryTooLong)
    } else {
        Ok(summary)
    }
}

pub fn validate_category(category: &str) -> Result<&str, ValidationError> {
    if CATEGORIES.contains(&category) {
        Ok(category)
    } else {
        Err(ValidationError::InvalidCategory)
    }
}

/// Case-sensitive, so "top" or "SECRET" alone are not enough.
pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    if CLICKBAIT_PHRASES.iter().any(|phrase| title.contains(phrase)) {
        Ok(title)
    } else {
        Err(ValidationError::TitleNotClickbait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        let exact = "a".repeat(CONTENT_MIN_CHARS);
        let longer = "a".repeat(CONTENT_MIN_CHARS + 10);
        assert_eq!(Ok(exact.as_str()), validate_content(&exact));
        assert_eq!(Ok(longer.as_str()), validate_content(&longer));

        let shorter = "a".repeat(CONTENT_MIN_CHARS - 1);
        assert_eq!(Err(ValidationError::ContentTooShort), validate_content(&shorter));
        assert_eq!(Err(ValidationError::ContentTooShort), validate_content(""));
    }

    #[test]
    fn test_validate_content_counts_characters() {
        // 249 characters but more than 250 bytes
        let content = "é".repeat(CONTENT_MIN_CHARS - 1);
        assert!(content.len() > CONTENT_MIN_CHARS);
        assert_eq!(Err(ValidationError::ContentTooShort), validate_content(&content));
    }

    #[test]
    fn test_validate_summary() {
        let exact = "s".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(Ok(""), validate_summary(""));
        assert_eq!(Ok(exact.as_str()), validate_summary(&exact));

        let longer = "s".repeat(SUMMARY_MAX_CHARS + 1);
        assert_eq!(Err(ValidationError::SummaryTooLong), validate_summary(&longer));

        let multibyte = "ü".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(Ok(multibyte.as_str()), validate_summary(&multibyte));
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(Ok("Fiction"), validate_category("Fiction"));
        assert_eq!(Ok("Non-Fiction"), validate_category("Non-Fiction"));

        for category in ["", "fiction", "Non Fiction", "NonFiction", " Fiction", "Poetry"] {
            assert_eq!(
                Err(ValidationError::InvalidCategory),
                validate_category(category),
                "{category:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_title() {
        let valid = [
            "Top 10 Secrets",
            "You Won't Believe What Happened",
            "The Secret Life of Pets",
            "Guess Who Came to Dinner",
            "Topaz Mining Report",
        ];
        for title in valid {
            assert_eq!(Ok(title), validate_title(title), "{title:?} should pass");
        }

        let invalid = ["", "A Normal Day", "top tips", "you won't believe", "SECRET", "guess"];
        for title in invalid {
            assert_eq!(
                Err(ValidationError::TitleNotClickbait),
                validate_title(title),
                "{title:?} should be rejected"
            );
        }
    }
}
