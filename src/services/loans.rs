//! Loan views and the renewal workflow

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::instance::{BorrowedInstance, LoanStatus, RenewalProposal},
    repository::Repository,
};

/// Validate a submitted renewal date against the allowed window.
///
/// Mirrors the original renewal form rules: not in the past, and at most
/// `max_weeks` weeks ahead of today.
pub fn validate_renewal_date(
    due_back: NaiveDate,
    today: NaiveDate,
    max_weeks: i64,
) -> AppResult<()> {
    if due_back < today {
        return Err(AppError::Validation(
            "Invalid renewal date - in the past".to_string(),
        ));
    }
    if due_back > today + Duration::weeks(max_weeks) {
        return Err(AppError::Validation(format!(
            "Invalid renewal date - more than {} weeks ahead",
            max_weeks
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: CatalogConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Copies on loan to one user, due date ascending
    pub async fn borrowed_by_user(&self, user_id: i32) -> AppResult<Vec<BorrowedInstance>> {
        self.repository.instances.borrowed_by_user(user_id).await
    }

    /// All copies on loan, due date ascending
    pub async fn borrowed_all(&self) -> AppResult<Vec<BorrowedInstance>> {
        self.repository.instances.borrowed_all().await
    }

    /// Pre-filled renewal form data: the copy plus a proposed due date of
    /// today plus the configured renewal period.
    pub async fn renewal_proposal(&self, instance_id: Uuid) -> AppResult<RenewalProposal> {
        let instance = self.repository.instances.get_borrowed(instance_id).await?;
        let proposed_due_back = Utc::now().date_naive() + Duration::weeks(self.config.renewal_weeks);
        Ok(RenewalProposal {
            instance,
            proposed_due_back,
        })
    }

    /// Process a renewal submission: validate the date and write it back.
    /// Only a copy that is actually on loan can be renewed; any other
    /// status must not carry a due date.
    pub async fn renew(&self, instance_id: Uuid, due_back: NaiveDate) -> AppResult<BorrowedInstance> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        if instance.status != LoanStatus::OnLoan {
            return Err(AppError::Conflict(format!(
                "Copy {} is not on loan",
                instance_id
            )));
        }

        let today = Utc::now().date_naive();
        validate_renewal_date(due_back, today, self.config.max_renewal_weeks)?;

        self.repository
            .instances
            .set_due_back(instance_id, due_back)
            .await?;

        tracing::info!("Renewed instance {} until {}", instance_id, due_back);
        self.repository.instances.get_borrowed(instance_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renewal_date_today_is_accepted() {
        let today = day(2026, 8, 30);
        assert!(validate_renewal_date(today, today, 4).is_ok());
    }

    #[test]
    fn renewal_date_in_the_past_is_rejected() {
        let today = day(2026, 8, 30);
        assert!(validate_renewal_date(day(2026, 8, 29), today, 4).is_err());
    }

    #[test]
    fn renewal_window_upper_bound_is_inclusive() {
        let today = day(2026, 8, 30);
        let limit = today + Duration::weeks(4);
        assert!(validate_renewal_date(limit, today, 4).is_ok());
        assert!(validate_renewal_date(limit + Duration::days(1), today, 4).is_err());
    }
}
