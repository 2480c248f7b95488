//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::genre::Genre;
use super::instance::BookInstance;
use super::language::Language;

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub language_id: Option<i32>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: Option<String>,
    pub isbn: Option<String>,
}

/// Book detail with relations loaded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author_name: Option<String>,
    pub genres: Vec<Genre>,
    pub language: Option<Language>,
    pub instances: Vec<BookInstance>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub author_id: i32,
    pub summary: Option<String>,
    #[validate(custom(function = validate_isbn))]
    pub isbn: Option<String>,
    pub language_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub summary: Option<String>,
    #[validate(custom(function = validate_isbn))]
    pub isbn: Option<String>,
    pub language_id: Option<i32>,
    pub genre_ids: Option<Vec<i32>>,
}

/// ISBN-10 or ISBN-13, hyphens and spaces ignored. Checksum is not verified.
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    let digits: String = isbn.chars().filter(|c| *c != '-' && *c != ' ').collect();
    let valid = match digits.len() {
        10 => {
            let (head, tail) = digits.split_at(9);
            head.chars().all(|c| c.is_ascii_digit())
                && tail.chars().all(|c| c.is_ascii_digit() || c == 'X' || c == 'x')
        }
        13 => digits.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("isbn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn_13_with_hyphens_is_accepted() {
        assert!(validate_isbn("978-3-16-148410-0").is_ok());
        assert!(validate_isbn("9783161484100").is_ok());
    }

    #[test]
    fn isbn_10_with_check_character_is_accepted() {
        assert!(validate_isbn("0-19-852663-6").is_ok());
        assert!(validate_isbn("043942089X").is_ok());
    }

    #[test]
    fn update_cannot_blank_the_title() {
        let update = UpdateBook {
            title: Some(String::new()),
            author_id: None,
            summary: None,
            isbn: None,
            language_id: None,
            genre_ids: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn malformed_isbn_is_rejected() {
        assert!(validate_isbn("12345").is_err());
        assert!(validate_isbn("978-3-16-14841O-0").is_err());
        assert!(validate_isbn("X123456789").is_err());
    }
}
