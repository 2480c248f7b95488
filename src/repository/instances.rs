//! Book instances repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        instance::{BookInstance, BorrowedInstance, CreateInstance, LoanStatus},
        user::UserShort,
    },
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Total instance count
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count instances by status
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Copies on loan to one borrower, due date ascending
    pub async fn borrowed_by_user(&self, user_id: i32) -> AppResult<Vec<BorrowedInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
                   bi.due_back, bi.status, bi.borrower_id,
                   u.first_name, u.last_name
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.borrower_id = $1 AND bi.status = 'o'
            ORDER BY bi.due_back
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::borrowed_from_row).collect()
    }

    /// All copies on loan, due date ascending
    pub async fn borrowed_all(&self) -> AppResult<Vec<BorrowedInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
                   bi.due_back, bi.status, bi.borrower_id,
                   u.first_name, u.last_name
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.status = 'o'
            ORDER BY bi.due_back
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::borrowed_from_row).collect()
    }

    /// One copy with book and borrower context
    pub async fn get_borrowed(&self, id: Uuid) -> AppResult<BorrowedInstance> {
        let row = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
                   bi.due_back, bi.status, bi.borrower_id,
                   u.first_name, u.last_name
            FROM book_instances bi
            JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        Self::borrowed_from_row(row)
    }

    fn borrowed_from_row(row: sqlx::postgres::PgRow) -> AppResult<BorrowedInstance> {
        let status: LoanStatus = row.get("status");
        let due_back: Option<NaiveDate> = row.get("due_back");
        let borrower_id: Option<i32> = row.get("borrower_id");
        let today = Utc::now().date_naive();

        Ok(BorrowedInstance {
            id: row.get("id"),
            book_id: row.get("book_id"),
            book_title: row.get("book_title"),
            imprint: row.get("imprint"),
            due_back,
            status,
            borrower: borrower_id.map(|id| UserShort {
                id,
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
            }),
            is_overdue: status == LoanStatus::OnLoan
                && due_back.map(|d| d < today).unwrap_or(false),
        })
    }

    /// Create a new instance for a book
    pub async fn create(&self, book_id: i32, instance: &CreateInstance) -> AppResult<BookInstance> {
        let created = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(instance.status.unwrap_or(LoanStatus::Maintenance))
        .bind(instance.borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Write the full availability state of a copy in one statement
    pub async fn set_state(
        &self,
        id: Uuid,
        imprint: Option<&str>,
        status: LoanStatus,
        due_back: Option<NaiveDate>,
        borrower_id: Option<i32>,
    ) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances SET
                imprint = COALESCE($1, imprint),
                status = $2,
                due_back = $3,
                borrower_id = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(imprint)
        .bind(status)
        .bind(due_back)
        .bind(borrower_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Renewal write: a single due-date update
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET due_back = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Delete an instance
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
