mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_full_delivery_flow() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;

    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let rider_id = app.create_rider(&staff, "+254700000001").await;

    let (status, order) = app.create_order(&staff, quote_id, Some(rider_id)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", order);
    assert_eq!(order["order_status"], "PLACED");
    assert_eq!(order["order_status_label"], "Order Placed");
    assert_eq!(order["next_statuses"][0], "WAREHOUSE");
    assert_eq!(order["quote"]["id"], quote_id);
    assert_eq!(order["rider"]["id"], rider_id);
    assert_eq!(order["payment_complete_status"], false);
    let order_id = order["id"].as_i64().unwrap();
    let tracking = order["tracking_number"].as_str().unwrap().to_string();

    let (status, seen) = app.get(&format!("/order/{}", order_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen["tracking_number"], tracking.as_str());

    let (status, tracked) = app.get(&format!("/orders/track/{}", tracking), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracked["id"], order_id);

    let (status, delivered) = app
        .put(
            &format!("/order/{}/status", order_id),
            &staff,
            json!({ "order_status": "DELIVERED" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(delivered["order_status"], "DELIVERED");
    assert_eq!(delivered["order_status_label"], "Delivered");
    assert!(delivered["next_statuses"].as_array().unwrap().is_empty());

    let (status, invoice) = app
        .post(
            "/invoices",
            &staff,
            json!({ "order_id": order_id, "total_amount": 5000, "amount_paid": 5000, "amount_due": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", invoice);
    assert_eq!(invoice["order"]["id"], order_id);
    assert_eq!(invoice["quote"]["id"], quote_id);
    let invoice_id = invoice["id"].as_i64().unwrap();

    let (status, order) = app.get(&format!("/order/{}", order_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["payment_complete_status"], true);

    let (status, invoice) = app.get(&format!("/invoice/{}", invoice_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["amount_due"], 0);

    let (status, invoices) = app.get("/invoices", &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoices.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_weak_passwords() {
    let app = TestApp::spawn().await;

    let (status, body) = app.register("alice", "alice-password").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User successfully registered, Login!");
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password").is_none());

    let (status, body) = app.register("alice", "another-password").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username is already taken!");

    let (status, body) = app.register("bob", "short").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let app = TestApp::spawn().await;
    app.register("alice", "alice-password").await;

    let (status, body) = app.login("alice", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Username or Password is invalid!");

    let (status, body) = app.login("nobody", "whatever-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Username or Password is invalid!");
}

#[tokio::test]
async fn test_token_refresh() {
    let app = TestApp::spawn().await;
    app.register("alice", "alice-password").await;
    let (_, login) = app.login("alice", "alice-password").await;
    let access = login["authentication"]["access_token"].as_str().unwrap();
    let refresh = login["authentication"]["refresh_token"].as_str().unwrap();

    let (status, body) = app
        .call(Method::POST, "/token/refresh", None, Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["access"].as_str().unwrap();

    let (status, me) = app.get("/me", new_access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, _) = app
        .call(Method::POST, "/token/refresh", None, Some(json!({ "refresh": access })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authentication_and_capabilities() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;

    let (status, body) = app.call(Method::GET, "/quotes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/quotes", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/staff/quotes", &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.get("/riders", &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let quote_id = app.submit_quote(&alice, "Lamp").await;
    let (status, _) = app.create_order(&alice, quote_id, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_clients_only_see_their_own_resources() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let bob = app.client_token("bob").await;
    let staff = app.staff_token().await;

    let alice_quote = app.submit_quote(&alice, "Sofa").await;
    app.submit_quote(&bob, "Bike").await;
    let (_, order) = app.create_order(&staff, alice_quote, None).await;
    let order_id = order["id"].as_i64().unwrap();
    let tracking = order["tracking_number"].as_str().unwrap().to_string();

    let (status, _) = app.get(&format!("/quote/{}", alice_quote), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .put(&format!("/quote/{}", alice_quote), &bob, json!({ "item_name": "Stolen" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&format!("/quote/{}", alice_quote), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/order/{}", order_id), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/orders/track/{}", tracking), &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, quotes) = app.get("/quotes", &bob).await;
    let quotes = quotes.as_array().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0]["item_name"], "Bike");

    let (_, orders) = app.get("/orders", &bob).await;
    assert!(orders.as_array().unwrap().is_empty());

    let (_, orders) = app.get("/orders", &alice).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let (status, all) = app.get("/staff/quotes", &staff).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["item_name"], "Bike");

    let (status, _) = app.get(&format!("/quote/{}", alice_quote), &staff).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_one_order_per_quote_and_one_invoice_per_order() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;

    let (status, order) = app.create_order(&staff, quote_id, None).await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_i64().unwrap();

    let (status, body) = app.create_order(&staff, quote_id, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let invoice = json!({ "order_id": order_id, "total_amount": 100, "amount_paid": 40, "amount_due": 60 });
    let (status, _) = app.post("/invoices", &staff, invoice.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/invoices", &staff, invoice).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_status_only_moves_forward() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let (_, order) = app.create_order(&staff, quote_id, None).await;
    let uri = format!("/order/{}/status", order["id"].as_i64().unwrap());

    let (status, body) = app.put(&uri, &staff, json!({ "order_status": "TRANSIT" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_status"], "TRANSIT");

    let (status, body) = app.put(&uri, &staff, json!({ "order_status": "TRANSIT" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_status"], "TRANSIT");

    let (status, body) = app.put(&uri, &staff, json!({ "order_status": "WAREHOUSE" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
    assert_eq!(body["details"]["from"], "TRANSIT");
    assert_eq!(body["details"]["to"], "WAREHOUSE");

    let (status, body) = app.put(&uri, &staff, json!({ "order_status": "LOST" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, alice_view) = app
        .get(&format!("/order/{}", order["id"].as_i64().unwrap()), &alice)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alice_view["order_status"], "TRANSIT");
}

#[tokio::test]
async fn test_rider_is_handed_over_after_delivery() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let rider_id = app.create_rider(&staff, "+254700000002").await;

    let first_quote = app.submit_quote(&alice, "Sofa").await;
    let second_quote = app.submit_quote(&alice, "Table").await;

    let (_, first) = app.create_order(&staff, first_quote, Some(rider_id)).await;
    let first_id = first["id"].as_i64().unwrap();

    let (status, body) = app.create_order(&staff, second_quote, Some(rider_id)).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    app.put(
        &format!("/order/{}/status", first_id),
        &staff,
        json!({ "order_status": "DELIVERED" }),
    )
    .await;

    let (status, second) = app.create_order(&staff, second_quote, None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = app
        .put(
            &format!("/order/{}/rider", second["id"].as_i64().unwrap()),
            &staff,
            json!({ "rider_id": rider_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", second);
    assert_eq!(second["rider"]["id"], rider_id);

    let (_, first) = app.get(&format!("/order/{}", first_id), &staff).await;
    assert!(first["rider"].is_null());
}

#[tokio::test]
async fn test_invoice_amounts_must_reconcile() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let (_, order) = app.create_order(&staff, quote_id, None).await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/invoices",
            &staff,
            json!({ "order_id": order_id, "total_amount": 100, "amount_paid": 30, "amount_due": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post(
            "/invoices",
            &staff,
            json!({ "order_id": order_id, "total_amount": 100, "amount_paid": 30, "amount_due": 70 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let invoice_id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/invoice/{}", invoice_id),
            &staff,
            json!({ "amount_paid": 100, "amount_due": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["order"]["payment_complete_status"], true);

    let (status, _) = app
        .put(&format!("/invoice/{}", invoice_id), &staff, json!({ "amount_paid": 150 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_a_quote_removes_its_order_and_invoice() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let (_, order) = app.create_order(&staff, quote_id, None).await;
    let order_id = order["id"].as_i64().unwrap();
    let (_, invoice) = app
        .post(
            "/invoices",
            &staff,
            json!({ "order_id": order_id, "total_amount": 10, "amount_paid": 0, "amount_due": 10 }),
        )
        .await;
    let invoice_id = invoice["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/quote/{}", quote_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.get(&format!("/order/{}", order_id), &staff).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/invoice/{}", invoice_id), &staff).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;

    let (status, body) = app.get("/quote/999", &alice).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = app.get("/quote/abc", &alice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = app.get("/orders/track/not-a-uuid", &alice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.create_order(&staff, 999, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            Method::POST,
            "/login",
            None,
            Some(json!("just a string")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_me_returns_the_caller() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;

    let (status, me) = app.get("/me", &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["is_staff"], false);
}

#[tokio::test]
async fn test_staff_prices_and_delivers_a_box() {
    let app = TestApp::spawn().await;
    let (status, _) = app.register("alice", "pw123456").await;
    assert_eq!(status, StatusCode::CREATED);
    let alice = app.access_token("alice", "pw123456").await;
    let staff = app.staff_token().await;

    let (status, quote) = app
        .post(
            "/quotes",
            &alice,
            json!({
                "item_name": "Box",
                "item_description": "Books",
                "location_from": "Nairobi",
                "location_to": "Mombasa"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quote["client_review_status"], false);

    let (_, quotes) = app.get("/staff/quotes", &staff).await;
    assert!(quotes
        .as_array()
        .unwrap()
        .iter()
        .any(|q| q["item_name"] == "Box" && q["id"] == quote["id"]));

    let (status, first) = app.create_order(&staff, quote["id"].as_i64().unwrap(), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["order_status"], "PLACED");

    let other_quote = app.submit_quote(&alice, "Crate").await;
    let (_, second) = app.create_order(&staff, other_quote, None).await;
    assert_ne!(first["tracking_number"], second["tracking_number"]);

    let uri = format!("/order/{}", first["id"].as_i64().unwrap());
    let (status, _) = app
        .put(&format!("{}/status", uri), &staff, json!({ "order_status": "DELIVERED" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, order) = app.get(&uri, &staff).await;
    assert_eq!(order["order_status"], "DELIVERED");
}

#[tokio::test]
async fn test_invoice_amounts_that_overflow_are_rejected() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let (_, order) = app.create_order(&staff, quote_id, None).await;

    let (status, body) = app
        .post(
            "/invoices",
            &staff,
            json!({
                "order_id": order["id"],
                "total_amount": i64::MAX,
                "amount_paid": i64::MAX,
                "amount_due": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_rider_or_order_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let rider_id = app.create_rider(&staff, "+254700000003").await;

    let (status, body) = app.create_order(&staff, quote_id, Some(999)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (_, order) = app.create_order(&staff, quote_id, None).await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, body) = app
        .put(&format!("/order/{}/rider", order_id), &staff, json!({ "rider_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = app
        .put("/order/999/rider", &staff, json!({ "rider_id": rider_id }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = app
        .put(&format!("/order/{}", order_id), &staff, json!({ "rider_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_links_report_the_taken_reference() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let (_, order) = app.create_order(&staff, quote_id, None).await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, body) = app.create_order(&staff, quote_id, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        format!("Order with quote_id '{}' already exists", quote_id)
    );

    let invoice = json!({ "order_id": order_id, "total_amount": 10, "amount_paid": 0, "amount_due": 10 });
    app.post("/invoices", &staff, invoice.clone()).await;
    let (status, body) = app.post("/invoices", &staff, invoice).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        format!("Invoice with order_id '{}' already exists", order_id)
    );
}

#[tokio::test]
async fn test_payment_flag_of_an_invoiced_order_follows_the_invoice() {
    let app = TestApp::spawn().await;
    let alice = app.client_token("alice").await;
    let staff = app.staff_token().await;
    let quote_id = app.submit_quote(&alice, "Sofa").await;
    let (_, order) = app.create_order(&staff, quote_id, None).await;
    let uri = format!("/order/{}", order["id"].as_i64().unwrap());

    let (status, body) = app
        .put(&uri, &staff, json!({ "payment_complete_status": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_complete_status"], true);

    app.post(
        "/invoices",
        &staff,
        json!({ "order_id": order["id"], "total_amount": 100, "amount_paid": 40, "amount_due": 60 }),
    )
    .await;

    let (status, body) = app
        .put(&uri, &staff, json!({ "payment_complete_status": true }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = app
        .put(&uri, &staff, json!({ "payment_complete_status": false, "payment_ref": "MPESA-002" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_complete_status"], false);
    assert_eq!(body["payment_ref"], "MPESA-002");
}

#[tokio::test]
async fn test_username_whitespace_is_ignored_on_login() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .call(
            Method::POST,
            "/register",
            None,
            Some(json!({ "username": "bob ", "password": "bob-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["username"], "bob");

    let (status, _) = app.login("bob ", "bob-password").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.login("bob", "bob-password").await;
    assert_eq!(status, StatusCode::OK);
}
