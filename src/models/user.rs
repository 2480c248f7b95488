//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Access rights levels per concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// Account type slug (string identifier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountTypeSlug {
    Member,
    Librarian,
    Admin,
}

impl AccountTypeSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTypeSlug::Member => "member",
            AccountTypeSlug::Librarian => "librarian",
            AccountTypeSlug::Admin => "admin",
        }
    }

    /// Rights granted by this account type.
    ///
    /// Loans write is the "mark returned" permission: it gates the borrowed
    /// listing of all users and the renewal workflow.
    pub fn rights(&self) -> UserRights {
        match self {
            AccountTypeSlug::Member => UserRights {
                catalog_rights: Rights::Read,
                loans_rights: Rights::None,
                settings_rights: Rights::None,
            },
            AccountTypeSlug::Librarian => UserRights {
                catalog_rights: Rights::Write,
                loans_rights: Rights::Write,
                settings_rights: Rights::Read,
            },
            AccountTypeSlug::Admin => UserRights {
                catalog_rights: Rights::Write,
                loans_rights: Rights::Write,
                settings_rights: Rights::Write,
            },
        }
    }
}

impl std::fmt::Display for AccountTypeSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountTypeSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(AccountTypeSlug::Member),
            "librarian" => Ok(AccountTypeSlug::Librarian),
            "admin" => Ok(AccountTypeSlug::Admin),
            _ => Err(format!("Invalid account type slug: {}", s)),
        }
    }
}

// SQLx conversion for AccountTypeSlug (stored as text)
impl sqlx::Type<Postgres> for AccountTypeSlug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AccountTypeSlug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AccountTypeSlug {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// User status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum UserStatus {
    Active = 0,
    Blocked = 1,
    Deleted = 2,
}

impl From<i16> for UserStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => UserStatus::Blocked,
            2 => UserStatus::Deleted,
            _ => UserStatus::Active,
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub account_type: AccountTypeSlug,
    pub status: i16,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Short user representation embedded in loan listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Login (username) - required and unique, used for authentication
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub account_type: Option<AccountTypeSlug>,
}

/// Per-concern rights carried in JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRights {
    pub catalog_rights: Rights,
    pub loans_rights: Rights,
    pub settings_rights: Rights,
}

impl Default for UserRights {
    fn default() -> Self {
        Self {
            catalog_rights: Rights::None,
            loans_rights: Rights::None,
            settings_rights: Rights::None,
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub account_type: AccountTypeSlug,
    pub rights: UserRights,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks
    pub fn require_read_catalog(&self) -> Result<(), AppError> {
        if self.rights.catalog_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read the catalog".to_string()))
        }
    }

    pub fn require_write_catalog(&self) -> Result<(), AppError> {
        if self.rights.catalog_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to edit the catalog".to_string()))
        }
    }

    pub fn require_read_loans(&self) -> Result<(), AppError> {
        if self.rights.loans_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read loans".to_string()))
        }
    }

    pub fn require_write_loans(&self) -> Result<(), AppError> {
        if self.rights.loans_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to manage loans".to_string()))
        }
    }

    pub fn require_read_settings(&self) -> Result<(), AppError> {
        if self.rights.settings_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read settings".to_string()))
        }
    }

    /// Check if user is admin (account_type = "admin")
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountTypeSlug::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(account_type: AccountTypeSlug) -> UserClaims {
        UserClaims {
            sub: "test".to_string(),
            user_id: 1,
            account_type,
            rights: account_type.rights(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn member_cannot_manage_loans() {
        let claims = claims_for(AccountTypeSlug::Member);
        assert!(claims.require_read_catalog().is_ok());
        assert!(claims.require_write_catalog().is_err());
        assert!(claims.require_read_loans().is_err());
        assert!(claims.require_write_loans().is_err());
    }

    #[test]
    fn librarian_holds_renewal_permission() {
        let claims = claims_for(AccountTypeSlug::Librarian);
        assert!(claims.require_write_loans().is_ok());
        assert!(claims.require_write_catalog().is_ok());
        assert!(!claims.is_admin());
    }

    #[test]
    fn token_round_trip_preserves_rights() {
        let mut claims = claims_for(AccountTypeSlug::Admin);
        claims.exp = chrono::Utc::now().timestamp() + 3600;
        claims.iat = chrono::Utc::now().timestamp();

        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, claims.user_id);
        assert!(parsed.require_read_settings().is_ok());
    }

    #[test]
    fn account_type_slug_parses_case_insensitively() {
        assert_eq!("Librarian".parse::<AccountTypeSlug>().unwrap(), AccountTypeSlug::Librarian);
        assert!("patron".parse::<AccountTypeSlug>().is_err());
    }
}
