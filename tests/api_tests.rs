//! API integration tests
//!
//! These run against a live server with a migrated database (the seed
//! migration provides the admin account). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Unique suffix so repeated runs do not trip the uniqueness constraints
fn unique() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}", nanos)
}

/// Sign up a fresh user and return (token, name)
async fn signup_and_login(client: &Client, label: &str) -> (String, String) {
    let suffix = unique();
    let name = format!("{}-{}", label, suffix);
    let email = format!("{}.{}@example.org", label, suffix);
    let external_id = format!("id{}", &suffix[suffix.len() - 8..]);

    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&json!({
            "name": name,
            "email": email,
            "external_id": external_id,
            "member_type": "Student"
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "email": email, "external_id": external_id }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (token, name)
}

/// Authenticate as the seeded administrator
async fn admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": "admin@labtrack.local",
            "external_id": "000000"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Add a device as admin and return its id
async fn add_device(client: &Client, token: &str, device: &str, serial: &str) -> i64 {
    let response = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "subbt": "Add",
            "device": device,
            "type": "Multimeter",
            "serial": serial,
            "status": "Available"
        }))
        .send()
        .await
        .expect("Failed to send add request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]
        .as_array()
        .expect("No data in response")
        .iter()
        .find(|e| e["device"] == device)
        .and_then(|e| e["id"].as_i64())
        .expect("Added device not in list")
}

#[tokio::test]
#[ignore]
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
async fn test_signup_and_login() {
    let client = Client::new();
    let (token, name) = signup_and_login(&client, "member").await;

    let response = client
        .get(format!("{}/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], name.as_str());
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
#[ignore]
async fn test_login_requires_both_factors() {
    let client = Client::new();
    let suffix = unique();
    let email = format!("factor.{}@example.org", suffix);
    let external_id = format!("id{}", &suffix[suffix.len() - 8..]);

    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&json!({
            "name": format!("factor-{}", suffix),
            "email": email,
            "external_id": external_id,
            "member_type": "Teacher"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Wrong external id
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "email": email, "external_id": "wrong-id" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Unknown email
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "email": format!("nobody.{}@example.org", suffix),
            "external_id": external_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_signup_rejected() {
    let client = Client::new();
    let suffix = unique();
    let email = format!("dup.{}@example.org", suffix);

    let first = json!({
        "name": format!("dup-{}", suffix),
        "email": email,
        "external_id": format!("ida{}", &suffix[suffix.len() - 7..]),
        "member_type": "Student"
    });
    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&first)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Same email, different name and id
    let second = json!({
        "name": format!("dup2-{}", suffix),
        "email": email,
        "external_id": format!("idb{}", &suffix[suffix.len() - 7..]),
        "member_type": "Student"
    });
    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&second)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_signup_rejects_malformed_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/signup", BASE_URL))
        .json(&json!({
            "name": format!("badmail-{}", unique()),
            "email": "not-an-email",
            "external_id": "abcdef",
            "member_type": "Student"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_pick_conflict_and_return() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();

    let device = format!("DE-208E-{}", suffix);
    let serial = format!("N{}", suffix);
    let device_id = add_device(&client, &admin, &device, &serial).await;

    let (alice, alice_name) = signup_and_login(&client, "alice").await;
    let (bob, _) = signup_and_login(&client, "bob").await;

    // Alice picks the device
    let response = client
        .post(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", alice))
        .json(&json!({ "subbt": "Pick", "deviceid": device_id, "filter": "All" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let picked = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"].as_i64() == Some(device_id))
        .expect("Device missing from list");
    assert_eq!(picked["status"], alice_name.as_str());

    // Bob cannot pick a held item
    let response = client
        .post(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", bob))
        .json(&json!({ "subbt": "Pick", "deviceid": device_id, "filter": "All" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Alice's workbench contains exactly her held items
    let response = client
        .get(format!("{}/dashboard?filter=My Workbench", BASE_URL))
        .header("Authorization", format!("Bearer {}", alice))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let workbench = body["data"].as_array().unwrap();
    assert!(workbench.iter().any(|e| e["id"].as_i64() == Some(device_id)));
    assert!(workbench.iter().all(|e| e["status"] == alice_name.as_str()));

    // Alice returns the device
    let response = client
        .post(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", alice))
        .json(&json!({ "subbt": "Return", "deviceid": device_id, "filter": "All" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let returned = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"].as_i64() == Some(device_id))
        .expect("Device missing from list");
    assert_eq!(returned["status"], "Available");

    // Cleanup
    let _ = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "subbt": "Remove", "deviceid": device_id }))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_pick_unknown_device_is_not_found() {
    let client = Client::new();
    let (token, _) = signup_and_login(&client, "ghost").await;

    let response = client
        .post(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "subbt": "Pick", "deviceid": 999999999, "filter": "All" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_non_admin_cannot_manage_inventory() {
    let client = Client::new();
    let (token, _) = signup_and_login(&client, "plain").await;

    let response = client
        .get(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "subbt": "Add",
            "device": format!("sneaky-{}", unique()),
            "type": "Sensor",
            "serial": format!("S{}", unique())
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_admin_edit_rejects_unknown_holder() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();

    let device = format!("PS-3005-{}", suffix);
    let serial = format!("PS{}", suffix);
    let device_id = add_device(&client, &admin, &device, &serial).await;

    // "Charlie" is not a registered user, so the edit must fail
    let response = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "subbt": "Edit",
            "deviceid": device_id,
            "device": device,
            "type": "Multimeter",
            "serial": serial,
            "status": format!("Charlie-{}", suffix)
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Cleanup
    let _ = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "subbt": "Remove", "deviceid": device_id }))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_admin_add_duplicate_serial_rejected() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();

    let serial = format!("DUP{}", suffix);
    let device_id = add_device(&client, &admin, &format!("first-{}", suffix), &serial).await;

    let response = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "subbt": "Add",
            "device": format!("second-{}", suffix),
            "type": "Sensor",
            "serial": serial
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Cleanup
    let _ = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "subbt": "Remove", "deviceid": device_id }))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_admin_remove_then_view_does_not_fail() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();

    let device_id = add_device(
        &client,
        &admin,
        &format!("gone-{}", suffix),
        &format!("G{}", suffix),
    )
    .await;

    let response = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "subbt": "Remove", "deviceid": device_id, "filter": "All" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Removing again reports NotFound rather than crashing
    let response = client
        .post(format!("{}/dashboard/ad_manage", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "subbt": "Remove", "deviceid": device_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    // The filtered view stays healthy after the removal
    let response = client
        .get(format!("{}/dashboard?filter=All Devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}
