//! Landing-page counters endpoint

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;

/// Session cookie carrying the visit-counter key
const SESSION_COOKIE: &str = "libcat_session";

/// Landing-page counters
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Total number of books
    pub num_books: i64,
    /// Total number of copies
    pub num_instances: i64,
    /// Copies currently available
    pub num_instances_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Prior visits in this session (0 on the first visit)
    pub num_visits: i64,
}

/// Catalog counters plus the per-session visit counter.
///
/// Every figure is recomputed per request; the visit counter lives in the
/// session store under the id carried by the session cookie, which is
/// issued here on first contact.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog counters", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<StatsResponse>)> {
    let (session_id, jar) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), jar),
        None => {
            let session_id = Uuid::new_v4().to_string();
            let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            (session_id, jar.add(cookie))
        }
    };

    let counts = state.services.stats.catalog_counts().await?;
    let num_visits = state.services.sessions.record_visit(&session_id).await?;

    Ok((
        jar,
        Json(StatsResponse {
            num_books: counts.num_books,
            num_instances: counts.num_instances,
            num_instances_available: counts.num_instances_available,
            num_authors: counts.num_authors,
            num_visits,
        }),
    ))
}
