//! Catalog management service

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        author::{lifespan_is_valid, Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        book::{Book, BookDetails, BookShort, CreateBook, UpdateBook},
        genre::{CreateGenre, Genre, UpdateGenre},
        instance::{BookInstance, CreateInstance, LoanStatus, UpdateInstance},
        language::{CreateLanguage, Language, UpdateLanguage},
    },
    repository::Repository,
};

/// Resolved availability state of a copy.
///
/// Status, borrower and due date are not independently writable: a copy on
/// loan must name its borrower, and a copy in any other state carries
/// neither borrower nor due date.
pub fn resolve_loan_state(
    status: LoanStatus,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
) -> AppResult<(LoanStatus, Option<NaiveDate>, Option<i32>)> {
    if status == LoanStatus::OnLoan {
        if borrower_id.is_none() {
            return Err(AppError::Validation(
                "A copy on loan must have a borrower".to_string(),
            ));
        }
        Ok((status, due_back, borrower_id))
    } else {
        Ok((status, None, None))
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    // ----- Books -----

    /// List books, capped at the configured list limit
    pub async fn list_books(&self, per_page: Option<i64>) -> AppResult<Vec<BookShort>> {
        let limit = per_page
            .unwrap_or(self.config.list_limit)
            .clamp(1, self.config.list_limit);
        self.repository.books.list(limit).await
    }

    /// Get full book detail by ID
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    /// Create a book after checking its references
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_book_refs(Some(book.author_id), book.language_id, Some(&book.genre_ids))
            .await?;
        self.repository.books.create(&book).await
    }

    /// Update a book after checking any changed references
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.check_book_refs(book.author_id, book.language_id, book.genre_ids.as_deref())
            .await?;
        self.repository.books.update(id, &book).await
    }

    /// Delete a book and its copies
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.get_by_id(id).await?;
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }

    async fn check_book_refs(
        &self,
        author_id: Option<i32>,
        language_id: Option<i32>,
        genre_ids: Option<&[i32]>,
    ) -> AppResult<()> {
        if let Some(author_id) = author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        if let Some(language_id) = language_id {
            self.repository.languages.get_by_id(language_id).await?;
        }
        if let Some(genre_ids) = genre_ids {
            if !self.repository.genres.all_exist(genre_ids).await? {
                return Err(AppError::Validation(
                    "One or more genre ids do not exist".to_string(),
                ));
            }
        }
        Ok(())
    }

    // ----- Authors -----

    /// List authors, capped at the configured list limit
    pub async fn list_authors(&self, per_page: Option<i64>) -> AppResult<Vec<Author>> {
        let limit = per_page
            .unwrap_or(self.config.list_limit)
            .clamp(1, self.config.list_limit);
        self.repository.authors.list(limit).await
    }

    /// Get an author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.get_books(id).await?;
        Ok(AuthorDetails { author, books })
    }

    /// Create an author
    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if !lifespan_is_valid(author.date_of_birth, author.date_of_death) {
            return Err(AppError::Validation(
                "Date of death precedes date of birth".to_string(),
            ));
        }
        self.repository.authors.create(&author).await
    }

    /// Update an author, re-checking the lifespan rule against merged dates
    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let existing = self.repository.authors.get_by_id(id).await?;
        let birth = author.date_of_birth.or(existing.date_of_birth);
        let death = author.date_of_death.or(existing.date_of_death);
        if !lifespan_is_valid(birth, death) {
            return Err(AppError::Validation(
                "Date of death precedes date of birth".to_string(),
            ));
        }
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author.
    ///
    /// Refused while books still reference them, unless `force` is set, in
    /// which case their books and copies are removed as well.
    pub async fn delete_author(&self, id: i32, force: bool) -> AppResult<()> {
        self.repository.authors.get_by_id(id).await?;
        let book_count = self.repository.authors.book_count(id).await?;

        if book_count > 0 && !force {
            return Err(AppError::Conflict(format!(
                "Author has {} book(s); delete them first or pass force=true",
                book_count
            )));
        }

        if book_count > 0 {
            self.repository.authors.delete_cascade(id).await?;
            tracing::info!("Deleted author id={} with {} book(s)", id, book_count);
        } else {
            self.repository.authors.delete(id).await?;
            tracing::info!("Deleted author id={}", id);
        }
        Ok(())
    }

    // ----- Genres -----

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if self.repository.genres.name_exists(&genre.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Genre '{}' already exists",
                genre.name
            )));
        }
        self.repository.genres.create(&genre.name).await
    }

    pub async fn update_genre(&self, id: i32, genre: UpdateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if self
            .repository
            .genres
            .name_exists(&genre.name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Genre '{}' already exists",
                genre.name
            )));
        }
        self.repository.genres.update(id, &genre.name).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await
    }

    // ----- Languages -----

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        language
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if self
            .repository
            .languages
            .name_exists(&language.name, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Language '{}' already exists",
                language.name
            )));
        }
        self.repository.languages.create(&language.name).await
    }

    pub async fn update_language(&self, id: i32, language: UpdateLanguage) -> AppResult<Language> {
        language
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if self
            .repository
            .languages
            .name_exists(&language.name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Language '{}' already exists",
                language.name
            )));
        }
        self.repository.languages.update(id, &language.name).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }

    // ----- Book instances -----

    /// Get one copy by ID
    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.instances.get_by_id(id).await
    }

    /// Create a copy of a book, normalizing its availability state
    pub async fn create_instance(
        &self,
        book_id: i32,
        instance: CreateInstance,
    ) -> AppResult<BookInstance> {
        self.repository.books.get_by_id(book_id).await?;
        if let Some(borrower_id) = instance.borrower_id {
            self.repository.users.get_by_id(borrower_id).await?;
        }

        let status = instance.status.unwrap_or(LoanStatus::Maintenance);
        let (status, due_back, borrower_id) =
            resolve_loan_state(status, instance.due_back, instance.borrower_id)?;

        self.repository
            .instances
            .create(
                book_id,
                &CreateInstance {
                    imprint: instance.imprint,
                    due_back,
                    status: Some(status),
                    borrower_id,
                },
            )
            .await
    }

    /// Update a copy, merging with its current state and normalizing
    pub async fn update_instance(
        &self,
        id: Uuid,
        update: UpdateInstance,
    ) -> AppResult<BookInstance> {
        let existing = self.repository.instances.get_by_id(id).await?;

        let status = update.status.unwrap_or(existing.status);
        let due_back = update.due_back.or(existing.due_back);
        let borrower_id = update.borrower_id.or(existing.borrower_id);

        if let Some(borrower_id) = update.borrower_id {
            self.repository.users.get_by_id(borrower_id).await?;
        }

        let (status, due_back, borrower_id) = resolve_loan_state(status, due_back, borrower_id)?;

        self.repository
            .instances
            .set_state(id, update.imprint.as_deref(), status, due_back, borrower_id)
            .await
    }

    /// Delete a copy
    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_loan_requires_borrower() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 20);
        assert!(resolve_loan_state(LoanStatus::OnLoan, due, None).is_err());

        let (status, due_back, borrower) =
            resolve_loan_state(LoanStatus::OnLoan, due, Some(3)).unwrap();
        assert_eq!(status, LoanStatus::OnLoan);
        assert_eq!(due_back, due);
        assert_eq!(borrower, Some(3));
    }

    #[test]
    fn non_loan_states_clear_borrower_and_due_date() {
        let due = NaiveDate::from_ymd_opt(2026, 9, 20);
        for status in [
            LoanStatus::Available,
            LoanStatus::Maintenance,
            LoanStatus::Reserved,
        ] {
            let (resolved, due_back, borrower) =
                resolve_loan_state(status, due, Some(3)).unwrap();
            assert_eq!(resolved, status);
            assert_eq!(due_back, None);
            assert_eq!(borrower, None);
        }
    }
}
