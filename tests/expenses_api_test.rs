/*!
 * Expense API Integration Tests
 *
 * Drives the `/api/expenses` endpoints through the full router, covering the
 * CRUD operations, status codes and JSON error bodies. Most tests start from
 * an in-memory store holding the two sample expenses (IDs 1 and 2); the
 * SQLite-backed tests use a temporary database.
 */

mod common;

use axum::http::StatusCode;
use common::*;
use expense_tracker::config::StoreBackend;
use expense_tracker::models::{Expense, MessageResponse};
use serde_json::{Value, json};

#[tokio::test]
async fn list_expenses_returns_all_in_order() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.get("/api/expenses").await;

    response.assert_status_ok();
    let expenses: Vec<Expense> = response.json();
    assert_eq!(expenses, sample_expenses());
}

#[tokio::test]
async fn list_expenses_on_empty_store_is_empty_array() {
    let (server, _db, _temp_dir) = setup_test_server(StoreBackend::Memory).await;

    let response = server.get("/api/expenses").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn create_expense_returns_created_record() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server
        .post("/api/expenses")
        .json(&json!({"name": "Test", "amount": 123.45}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Test");
    assert_eq!(body["amount"], 123.45);
    assert!(body["date"].is_i64());
    assert!(body["category_id"].is_null());
}

#[tokio::test]
async fn create_expense_with_multibyte_name_within_limit() {
    let (server, _db, _temp_dir) = setup_test_server(StoreBackend::Sqlite).await;
    let name = "é".repeat(200);

    let response = server
        .post("/api/expenses")
        .json(&json!({"name": name, "amount": 1.0}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let expense: Expense = response.json();
    assert_eq!(expense.name, name);
}

#[tokio::test]
async fn create_expense_without_amount_is_bad_request() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server
        .post("/api/expenses")
        .json(&json!({"name": "No amount"}))
        .await;

    response.assert_status_bad_request();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "Missing 'name' or 'amount' in request");

    let expenses: Vec<Expense> = server.get("/api/expenses").await.json();
    assert_eq!(expenses.len(), 2, "a rejected create must not add a record");
}

#[tokio::test]
async fn create_expense_without_name_is_bad_request() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server
        .post("/api/expenses")
        .json(&json!({"amount": 10.0}))
        .await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn create_expense_with_non_json_body_is_bad_request_with_message() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.post("/api/expenses").text("name=Test").await;

    response.assert_status_bad_request();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "Missing JSON data");
}

#[tokio::test]
async fn create_expense_with_wrongly_typed_amount_is_bad_request() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server
        .post("/api/expenses")
        .json(&json!({"name": "Typed", "amount": "12"}))
        .await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn create_then_get_returns_same_record() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let created: Expense = server
        .post("/api/expenses")
        .json(&json!({"name": "Get Test", "amount": 10.0}))
        .await
        .json();

    let response = server.get(&format!("/api/expenses/{}", created.id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Expense>(), created);
}

#[tokio::test]
async fn get_missing_expense_is_not_found() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.get("/api/expenses/999999").await;

    response.assert_status_not_found();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "Expense not found");
}

#[tokio::test]
async fn update_expense_overwrites_both_fields() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server
        .put("/api/expenses/1")
        .json(&json!({"name": "Updated Name", "amount": 30.0}))
        .await;

    response.assert_status_ok();
    let expense: Expense = response.json();
    assert_eq!(expense.id, 1);
    assert_eq!(expense.name, "Updated Name");
    assert_eq!(expense.amount, 30.0);
}

#[tokio::test]
async fn update_name_only_keeps_amount() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    server
        .put("/api/expenses/2")
        .json(&json!({"name": "Power"}))
        .await
        .assert_status_ok();

    let expense: Expense = server.get("/api/expenses/2").await.json();
    assert_eq!(expense.name, "Power");
    assert_eq!(expense.amount, 75.25);
}

#[tokio::test]
async fn update_amount_only_keeps_name() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    server
        .put("/api/expenses/1")
        .json(&json!({"amount": 99.5}))
        .await
        .assert_status_ok();

    let expense: Expense = server.get("/api/expenses/1").await.json();
    assert_eq!(expense.name, "Groceries");
    assert_eq!(expense.amount, 99.5);
}

#[tokio::test]
async fn update_missing_expense_is_not_found() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server
        .put("/api/expenses/999999")
        .json(&json!({"name": "No Expense", "amount": 0}))
        .await;

    response.assert_status_not_found();
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn update_missing_expense_with_bad_body_reports_not_found_first() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.put("/api/expenses/999999").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn update_with_empty_object_is_bad_request() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.put("/api/expenses/1").json(&json!({})).await;

    response.assert_status_bad_request();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "Missing JSON data");
}

#[tokio::test]
async fn update_without_body_is_bad_request() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.put("/api/expenses/1").await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let created: Expense = server
        .post("/api/expenses")
        .json(&json!({"name": "Delete Test", "amount": 40.0}))
        .await
        .json();

    let response = server.delete(&format!("/api/expenses/{}", created.id)).await;
    response.assert_status_ok();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "Expense deleted");

    server
        .get(&format!("/api/expenses/{}", created.id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn delete_missing_expense_is_not_found_with_message() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.delete("/api/expenses/999999").await;

    response.assert_status_not_found();
    assert!(response.json::<Value>()["message"].is_string());
}

/// Deleting the highest ID used to hand that ID to the next expense. IDs now
/// come from a counter that only moves forward.
#[tokio::test]
async fn deleting_highest_id_does_not_reuse_it() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    server.delete("/api/expenses/2").await.assert_status_ok();

    let created: Expense = server
        .post("/api/expenses")
        .json(&json!({"name": "After delete", "amount": 1.0}))
        .await
        .json();

    assert_eq!(created.id, 3);
}

#[tokio::test]
async fn created_ids_strictly_increase() {
    let (server, _db, _temp_dir) = setup_test_server(StoreBackend::Sqlite).await;

    let mut previous = 0;
    for i in 0..5 {
        let created: Expense = server
            .post("/api/expenses")
            .json(&json!({"name": format!("Expense {}", i), "amount": i as f64}))
            .await
            .json();

        assert!(created.id > previous, "{} is not above {}", created.id, previous);
        previous = created.id;

        if i % 2 == 1 {
            server
                .delete(&format!("/api/expenses/{}", created.id))
                .await
                .assert_status_ok();
        }
    }
}

#[tokio::test]
async fn sqlite_backend_round_trip() {
    let (server, _db, _temp_dir) = setup_test_server(StoreBackend::Sqlite).await;

    let created: Expense = server
        .post("/api/expenses")
        .json(&json!({"name": "Rent", "amount": 1200.0}))
        .await
        .json();
    assert_eq!(created.id, 1);

    server
        .put("/api/expenses/1")
        .json(&json!({"amount": 1250.0}))
        .await
        .assert_status_ok();

    let fetched: Expense = server.get("/api/expenses/1").await.json();
    assert_eq!(fetched.name, "Rent");
    assert_eq!(fetched.amount, 1250.0);
    assert_eq!(fetched.date, created.date);

    server.delete("/api/expenses/1").await.assert_status_ok();
    server.get("/api/expenses/1").await.assert_status_not_found();
}

#[tokio::test]
async fn create_expense_with_unknown_category_is_bad_request() {
    let (server, _db, _temp_dir) = setup_test_server(StoreBackend::Sqlite).await;

    let response = server
        .post("/api/expenses")
        .json(&json!({"name": "Orphan", "amount": 5.0, "category_id": 42}))
        .await;

    response.assert_status_bad_request();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "Category does not exist");
}

#[tokio::test]
async fn home_page_summarises_expenses() {
    let (server, _db, _temp_dir) = setup_server_with_store(seeded_memory_store()).await;

    let response = server.get("/").await;

    response.assert_status_ok();
    let text = response.text();
    assert!(text.contains("2 expenses"), "unexpected page: {}", text);
    assert!(text.contains("125.25"), "unexpected page: {}", text);
}
