//! API integration tests
//!
//! These tests run against a live server with seeded data. They expect an
//! admin account (admin/admin), a librarian account (librarian/librarian)
//! and a member account (member/member).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get a token for a given account
async fn get_token(client: &Client, login: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn get_admin_token(client: &Client) -> String {
    get_token(client, "admin", "admin").await
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_loans_require_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_list_all_loans() {
    let client = Client::new();
    let token = get_token(&client, "member", "member").await;

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_librarian_can_list_all_loans() {
    let client = Client::new();
    let token = get_token(&client, "librarian", "librarian").await;

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let loans = body.as_array().expect("Expected an array");

    // Loans are ordered by due date, oldest first
    let mut previous: Option<String> = None;
    for loan in loans {
        assert_eq!(loan["status"], "o");
        if let Some(due) = loan["due_back"].as_str() {
            if let Some(prev) = &previous {
                assert!(prev.as_str() <= due);
            }
            previous = Some(due.to_string());
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_create_user_without_names() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Names are optional; only login and password are required
    let login = format!("minimal-{}", chrono::Utc::now().timestamp_millis());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "login": login,
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["login"], login);
    assert!(body["first_name"].is_null());
    assert!(body["last_name"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_lists_only_own_loans() {
    let client = Client::new();
    let token = get_token(&client, "member", "member").await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let my_id = me["id"].as_i64().expect("No id in response");

    let response = client
        .get(format!("{}/loans/my", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let loans = body.as_array().expect("Expected an array");

    // Every entry belongs to the caller, is on loan, and the list is
    // ordered by due date
    let mut previous: Option<String> = None;
    for loan in loans {
        assert_eq!(loan["status"], "o");
        assert_eq!(loan["borrower"]["id"].as_i64(), Some(my_id));
        if let Some(due) = loan["due_back"].as_str() {
            if let Some(prev) = &previous {
                assert!(prev.as_str() <= due);
            }
            previous = Some(due.to_string());
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_book_list_is_capped() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body.as_array().expect("Expected an array");
    assert!(books.len() <= 5);

    // Asking for more than the cap still returns at most the cap
    let response = client
        .get(format!("{}/books?per_page=50", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.as_array().expect("Expected an array").len() <= 5);
}

#[tokio::test]
#[ignore]
async fn test_visit_counter_increments_per_session() {
    // Cookie-enabled client so the session cookie is carried between calls
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let first: Value = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let second: Value = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let n1 = first["num_visits"].as_i64().expect("num_visits missing");
    let n2 = second["num_visits"].as_i64().expect("num_visits missing");
    assert_eq!(n2, n1 + 1);

    // A fresh session starts over at zero
    let fresh = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let body: Value = fresh
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["num_visits"].as_i64(), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_stats_counts_are_consistent() {
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let total = body["num_instances"].as_i64().expect("num_instances missing");
    let available = body["num_instances_available"]
        .as_i64()
        .expect("num_instances_available missing");

    assert!(available <= total);
    assert!(body["num_books"].as_i64().unwrap_or(-1) >= 0);
    assert!(body["num_authors"].as_i64().unwrap_or(-1) >= 0);
}

#[tokio::test]
#[ignore]
async fn test_genre_crud() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Create
    let response = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": "Integration Test Genre" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let genre: Value = response.json().await.expect("Failed to parse response");
    let id = genre["id"].as_i64().expect("No id in response");

    // Duplicate name is rejected
    let response = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": "Integration Test Genre" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // Update
    let response = client
        .put(format!("{}/genres/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Integration Test Genre (renamed)" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    // Delete
    let response = client
        .delete(format!("{}/genres/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_book_crud_requires_rights() {
    let client = Client::new();
    let member_token = get_token(&client, "member", "member").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&member_token)
        .json(&json!({
            "title": "Forbidden Book",
            "author_id": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle_and_cascade() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Create an author
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "first_name": "Test",
            "last_name": "Author",
            "date_of_birth": "1920-01-01",
            "date_of_death": "1999-12-31"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.expect("Failed to parse response");
    let author_id = author["id"].as_i64().expect("No id in response");

    // Create a book for that author
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Cascade Test Book",
            "author_id": author_id,
            "summary": "A test book",
            "isbn": "9783161484100"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    // Plain delete is rejected while the author still has books
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // Forced delete removes the author and the books
    let response = client
        .delete(format!("{}/authors/{}?force=true", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_invalid_isbn_is_rejected() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Bad ISBN Book",
            "author_id": 1,
            "isbn": "not-an-isbn"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_renewal_accepts_today() {
    let client = Client::new();
    let token = get_token(&client, "librarian", "librarian").await;

    // Pick any copy on loan
    let loans: Value = client
        .get(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let Some(loan) = loans.as_array().and_then(|l| l.first()) else {
        // Nothing on loan in the seeded data, nothing to renew
        return;
    };
    let id = loan["id"].as_str().expect("No id in loan").to_string();

    // The proposal pre-fills three weeks out
    let proposal: Value = client
        .get(format!("{}/instances/{}/renewal", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(proposal["proposed_due_back"].is_string());

    // Today is within bounds
    let today = chrono::Utc::now().date_naive().to_string();
    let response = client
        .post(format!("{}/instances/{}/renewal", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "due_back": today }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    // A date in the past is not
    let response = client
        .post(format!("{}/instances/{}/renewal", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "due_back": "2000-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_renewal_rejected_for_copy_not_on_loan() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Set up an available copy
    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "first_name": "Shelf", "last_name": "Sitter" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let author_id = author["id"].as_i64().expect("No id in response");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "Never Borrowed", "author_id": author_id }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No id in response");

    let instance: Value = client
        .post(format!("{}/books/{}/instances", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({ "imprint": "First edition", "status": "a" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let instance_id = instance["id"].as_str().expect("No id in response");

    // A copy that is not on loan cannot be renewed
    let today = chrono::Utc::now().date_naive().to_string();
    let response = client
        .post(format!("{}/instances/{}/renewal", BASE_URL, instance_id))
        .bearer_auth(&token)
        .json(&json!({ "due_back": today }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // The copy still carries no due date
    let copy: Value = client
        .get(format!("{}/instances/{}", BASE_URL, instance_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(copy["status"], "a");
    assert!(copy["due_back"].is_null());

    // Cleanup
    client
        .delete(format!("{}/authors/{}?force=true", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore]
async fn test_admin_layout_requires_rights() {
    let client = Client::new();
    let member_token = get_token(&client, "member", "member").await;

    let response = client
        .get(format!("{}/admin/layout", BASE_URL))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let admin_token = get_admin_token(&client).await;
    let response = client
        .get(format!("{}/admin/layout", BASE_URL))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let layout: Value = response.json().await.expect("Failed to parse response");
    let entities: Vec<&str> = layout
        .as_array()
        .expect("Expected an array")
        .iter()
        .filter_map(|e| e["entity"].as_str())
        .collect();

    assert!(entities.contains(&"book"));
    assert!(entities.contains(&"book_instance"));
}
