use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use crate::common::utils::{create_player, login, register_user, TestApp, UserRegLoginResponse};

/// Helper function to create an admin user and get auth token
pub async fn create_admin_user_and_login(test_app: &TestApp) -> UserRegLoginResponse {
    let client = Client::new();
    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("coach{}@example.com", suffix);
    let password = "password123";

    // Coaches link to a roster entry of their own so they never use up a real player's accounts
    let player_id = create_player(&test_app.db_pool, "Coach", &suffix, 99).await;
    let register_response = register_user(&client, &test_app.address, &email, password, player_id).await;
    assert_eq!(201, register_response.status().as_u16());

    // Promote user to admin role using direct database access
    let user_id: Uuid = sqlx::query_scalar("UPDATE users SET role = 'admin' WHERE email = $1 RETURNING id")
        .bind(&email)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to promote user to admin");

    let token = login(&client, &test_app.address, &email, password).await;

    UserRegLoginResponse { user_id, email, token }
}

/// Record a match through the admin API and return its id.
pub async fn create_match(test_app: &TestApp, token: &str, events: serde_json::Value) -> Uuid {
    let client = Client::new();
    let response = client
        .post(&format!("{}/admin/matches", test_app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&match_request(events))
        .send()
        .await
        .expect("Failed to create match");
    assert_eq!(201, response.status().as_u16(), "Match creation should succeed");

    let body: serde_json::Value = response.json().await.expect("Failed to parse match response");
    body["data"]["match_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("No match id in response")
}

pub fn match_request(events: serde_json::Value) -> serde_json::Value {
    json!({
        "home_team": "Wolves U12",
        "away_team": "Rovers U12",
        "home_score": 2,
        "away_score": 1,
        "match_type": "league",
        "events": events
    })
}
