//! Loan listings and the renewal workflow

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instance::{BorrowedInstance, RenewalProposal, RenewalRequest},
};

use super::AuthenticatedUser;

/// Copies on loan to the current user, due date ascending
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user's borrowed copies", body = Vec<BorrowedInstance>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowedInstance>>> {
    let instances = state.services.loans.borrowed_by_user(claims.user_id).await?;
    Ok(Json(instances))
}

/// All copies on loan, due date ascending (staff only)
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrowed copies", body = Vec<BorrowedInstance>),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowedInstance>>> {
    claims.require_read_loans()?;

    let instances = state.services.loans.borrowed_all().await?;
    Ok(Json(instances))
}

/// Pre-filled renewal form for a copy (staff only)
#[utoipa::path(
    get,
    path = "/instances/{id}/renewal",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    responses(
        (status = 200, description = "Renewal proposal", body = RenewalProposal),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn renewal_proposal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require_write_loans()?;

    let proposal = state.services.loans.renewal_proposal(id).await?;
    Ok(Json(proposal))
}

/// Submit a renewal: set the copy's due date (staff only)
#[utoipa::path(
    post,
    path = "/instances/{id}/renewal",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Instance ID")
    ),
    request_body = RenewalRequest,
    responses(
        (status = 200, description = "Copy renewed", body = BorrowedInstance),
        (status = 400, description = "Renewal date out of bounds"),
        (status = 404, description = "Instance not found"),
        (status = 409, description = "Copy is not on loan")
    )
)]
pub async fn renew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewalRequest>,
) -> AppResult<Json<BorrowedInstance>> {
    claims.require_write_loans()?;

    let renewed = state.services.loans.renew(id, request.due_back).await?;
    Ok(Json(renewed))
}
