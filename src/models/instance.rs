//! Book instance (lending copy) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserShort;

/// Loan status of a book instance. Both the database and the JSON
/// representation carry the single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    /// Return the legacy single-letter code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as text code)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookInstance {
    /// A copy counts against a due date only while it is on loan.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == LoanStatus::OnLoan
            && self.due_back.map(|d| d < today).unwrap_or(false)
    }
}

/// Borrowed copy with book and borrower context, for loan listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowedInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower: Option<UserShort>,
    pub is_overdue: bool,
}

/// Create book instance request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInstance {
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
}

/// Update book instance request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInstance {
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
}

/// Renewal form submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewalRequest {
    /// New due date (YYYY-MM-DD)
    pub due_back: NaiveDate,
}

/// Pre-filled renewal form data
#[derive(Debug, Serialize, ToSchema)]
pub struct RenewalProposal {
    pub instance: BorrowedInstance,
    /// Default renewal date (today plus the configured renewal period)
    pub proposed_due_back: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(status.as_code().parse::<LoanStatus>().unwrap(), status);
        }
        assert!("x".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn overdue_requires_on_loan_status() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let mut copy = BookInstance {
            id: Uuid::new_v4(),
            book_id: 1,
            imprint: None,
            due_back: Some(today - chrono::Duration::days(1)),
            status: LoanStatus::OnLoan,
            borrower_id: Some(7),
            created_at: None,
            updated_at: None,
        };
        assert!(copy.is_overdue(today));

        copy.status = LoanStatus::Reserved;
        assert!(!copy.is_overdue(today));

        copy.status = LoanStatus::OnLoan;
        copy.due_back = None;
        assert!(!copy.is_overdue(today));
    }
}
