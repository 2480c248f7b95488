//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookShort;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author detail with their books
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<BookShort>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Update author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Check the lifespan ordering rule: a death date must not precede birth.
pub fn lifespan_is_valid(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> bool {
    match (birth, death) {
        (Some(b), Some(d)) => d >= b,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_cannot_blank_a_name() {
        let update = UpdateAuthor {
            first_name: Some(String::new()),
            last_name: None,
            date_of_birth: None,
            date_of_death: None,
        };
        assert!(update.validate().is_err());

        let update = UpdateAuthor {
            first_name: Some("Iain".to_string()),
            last_name: None,
            date_of_birth: None,
            date_of_death: None,
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn lifespan_ordering() {
        let birth = NaiveDate::from_ymd_opt(1920, 1, 2);
        let death = NaiveDate::from_ymd_opt(1992, 4, 6);
        assert!(lifespan_is_valid(birth, death));
        assert!(lifespan_is_valid(birth, None));
        assert!(lifespan_is_valid(None, death));
        assert!(!lifespan_is_valid(death, birth));
        assert!(lifespan_is_valid(birth, birth));
    }
}
