//! Admin layout endpoint

use axum::Json;

use crate::{admin, error::AppResult};

use super::AuthenticatedUser;

/// Serve the admin layout registry for the generic admin frontend
#[utoipa::path(
    get,
    path = "/admin/layout",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin layout registry", body = Vec<admin::AdminEntity>),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn get_layout(
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<admin::AdminEntity>>> {
    claims.require_read_settings()?;

    Ok(Json(admin::layout()))
}
