//! End-to-end tests for the cart and checkout.
//!
//! These tests require a migrated database and a running `bazaar-api`.

use bazaar_integration_tests::{
    access_token, admin_token, api_url, client, json_body, register, unique_email,
};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_to_order() {
    let client = client();
    let admin = admin_token(&client).await;

    let response = client
        .post(api_url("/categories"))
        .bearer_auth(&admin)
        .json(&json!({ "name": format!("cat{}", Uuid::new_v4().simple()) }))
        .send()
        .await
        .unwrap();
    let (_, category) = json_body(response).await;

    let response = client
        .post(api_url("/products"))
        .bearer_auth(&admin)
        .json(&json!({
            "category_id": category["data"]["id"],
            "name": "Checkout Mug",
            "price": "12.50",
            "stock": 3,
            "sku": format!("SKU-{}", Uuid::new_v4().simple()),
        }))
        .send()
        .await
        .unwrap();
    let (_, product) = json_body(response).await;
    let product_id = product["data"]["id"].clone();

    let shopper = access_token(&register(&client, &unique_email()).await);

    // Empty cart cannot be checked out
    let response = client
        .post(api_url("/orders"))
        .bearer_auth(&shopper)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(api_url("/cart/items"))
        .bearer_auth(&shopper)
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .unwrap();
    let (status, cart) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["data"]["total"], "25.00");

    // Adding two more would exceed the stock of 3
    let response = client
        .post(api_url("/cart/items"))
        .bearer_auth(&shopper)
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(api_url("/orders"))
        .bearer_auth(&shopper)
        .send()
        .await
        .unwrap();
    let (status, order) = json_body(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["data"]["status"], "pending");
    assert_eq!(order["data"]["total_amount"], "25.00");
    let order_id = order["data"]["id"].clone();

    let response = client
        .get(api_url("/cart"))
        .bearer_auth(&shopper)
        .send()
        .await
        .unwrap();
    let (_, cart) = json_body(response).await;
    assert_eq!(cart["data"]["items"], json!([]));

    let response = client
        .get(api_url(&format!("/products/{product_id}")))
        .send()
        .await
        .unwrap();
    let (_, product) = json_body(response).await;
    assert_eq!(product["data"]["stock"], 1);

    // Another customer cannot see the order
    let stranger = access_token(&register(&client, &unique_email()).await);
    let response = client
        .get(api_url(&format!("/orders/{order_id}")))
        .bearer_auth(&stranger)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .put(api_url(&format!("/orders/{order_id}/status")))
        .bearer_auth(&admin)
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    let (status, order) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["data"]["status"], "shipped");
}
