//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, authors, books, genres, health, instances, languages, loans, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LibCat API",
        version = "1.0.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::create_user,
        // Stats
        stats::get_stats,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Languages
        languages::list_languages,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Instances
        instances::get_instance,
        instances::create_instance,
        instances::update_instance,
        instances::delete_instance,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renewal_proposal,
        loans::renew,
        // Admin
        admin::get_layout,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::CreateUser,
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::genre::UpdateGenre,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            crate::models::language::UpdateLanguage,
            // Instances and loans
            crate::models::instance::LoanStatus,
            crate::models::instance::BookInstance,
            crate::models::instance::BorrowedInstance,
            crate::models::instance::CreateInstance,
            crate::models::instance::UpdateInstance,
            crate::models::instance::RenewalRequest,
            crate::models::instance::RenewalProposal,
            // Stats
            stats::StatsResponse,
            // Admin
            crate::admin::AdminEntity,
            crate::admin::Fieldset,
            crate::admin::Inline,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "stats", description = "Landing-page counters"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Author catalog"),
        (name = "genres", description = "Genre management"),
        (name = "languages", description = "Language management"),
        (name = "instances", description = "Lending copies"),
        (name = "loans", description = "Loan listings and renewals"),
        (name = "admin", description = "Admin layout registry")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
