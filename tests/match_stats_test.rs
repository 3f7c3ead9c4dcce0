use futures_util::future::join_all;
use reqwest::{Client, Method};
use serde_json::json;
use uuid::Uuid;

mod common;
use common::admin_helpers::{create_admin_user_and_login, create_match, match_request};
use common::utils::{create_player, create_test_user_and_login, make_authenticated_request, player_counters, spawn_app};

#[tokio::test]
async fn match_lifecycle_reconciles_player_stats() {
    // Arrange
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;
    let alex = create_player(&test_app.db_pool, "Alex", "Love", 9).await;
    let lewis = create_player(&test_app.db_pool, "Lewis", "Wood", 4).await;
    let mikey = create_player(&test_app.db_pool, "Mikey", "Wilson", 7).await;

    // Create
    let match_id = create_match(
        &test_app,
        &admin.token,
        json!({
            "first_half_scorers": [{ "name": "Alex Love", "goals": 1 }],
            "yellow_cards": [{ "name": "Lewis Wood" }],
            "opposition_motm": "Alex Love"
        }),
    )
    .await;

    let alex_stats = player_counters(&test_app.db_pool, alex).await;
    assert_eq!(alex_stats.goals, 1);
    assert_eq!(alex_stats.motm_wins, 1);
    assert_eq!(player_counters(&test_app.db_pool, lewis).await.yellow_cards, 1);

    // Edit
    let response = make_authenticated_request(
        &client,
        Method::PUT,
        &format!("{}/admin/matches/{}", test_app.address, match_id),
        &admin.token,
        Some(match_request(json!({
            "first_half_scorers": [{ "name": "Alex Love", "goals": 1, "assist": "Mikey Wilson" }],
            "yellow_cards": []
        }))),
    )
    .await;
    assert_eq!(200, response.status().as_u16());

    let alex_stats = player_counters(&test_app.db_pool, alex).await;
    assert_eq!(alex_stats.goals, 1);
    assert_eq!(alex_stats.motm_wins, 0);
    assert_eq!(player_counters(&test_app.db_pool, mikey).await.assists, 1);
    assert_eq!(player_counters(&test_app.db_pool, lewis).await.yellow_cards, 0);

    // Delete
    let response = make_authenticated_request(
        &client,
        Method::DELETE,
        &format!("{}/admin/matches/{}", test_app.address, match_id),
        &admin.token,
        None,
    )
    .await;
    assert_eq!(200, response.status().as_u16());

    for player_id in [alex, lewis, mikey] {
        let stats = player_counters(&test_app.db_pool, player_id).await;
        assert_eq!((stats.goals, stats.assists, stats.yellow_cards, stats.motm_wins), (0, 0, 0, 0));
    }

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to count matches");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn unknown_names_are_returned_as_unresolved() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;
    let alex = create_player(&test_app.db_pool, "Alex", "Love", 9).await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/admin/matches", test_app.address),
        &admin.token,
        Some(match_request(json!({
            "first_half_scorers": [
                { "name": "alex  love" },
                { "name": "Somebody Else", "goals": 2 }
            ],
            "red_cards": [{ "name": "Somebody Else" }]
        }))),
    )
    .await;
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["unresolved"], json!(["Somebody Else"]));

    assert_eq!(player_counters(&test_app.db_pool, alex).await.goals, 1);

    // Stored events carry the resolved player id
    let match_id = body["data"]["match_id"].as_str().expect("No match id");
    let stored: serde_json::Value = sqlx::query_scalar("SELECT events FROM matches WHERE id = $1")
        .bind(Uuid::parse_str(match_id).expect("Invalid match id"))
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to load stored events");
    assert_eq!(stored["first_half_scorers"][0]["scorer"]["player_id"], json!(alex));
    assert_eq!(stored["first_half_scorers"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn renamed_player_keeps_stats_consistent_on_delete() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;
    let lewis = create_player(&test_app.db_pool, "Lewis", "Wood", 4).await;

    let match_id = create_match(
        &test_app,
        &admin.token,
        json!({ "second_half_scorers": [{ "name": "Lewis Wood", "goals": 2 }] }),
    )
    .await;
    assert_eq!(player_counters(&test_app.db_pool, lewis).await.goals, 2);

    sqlx::query("UPDATE players SET last_name = 'Woods' WHERE id = $1")
        .bind(lewis)
        .execute(&test_app.db_pool)
        .await
        .expect("Failed to rename player");

    let response = make_authenticated_request(
        &client,
        Method::DELETE,
        &format!("{}/admin/matches/{}", test_app.address, match_id),
        &admin.token,
        None,
    )
    .await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(player_counters(&test_app.db_pool, lewis).await.goals, 0);
}

#[tokio::test]
async fn editing_a_missing_match_returns_404() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;

    let response = make_authenticated_request(
        &client,
        Method::PUT,
        &format!("{}/admin/matches/{}", test_app.address, Uuid::new_v4()),
        &admin.token,
        Some(match_request(json!({}))),
    )
    .await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn out_of_range_goal_counts_are_rejected() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;
    let alex = create_player(&test_app.db_pool, "Alex", "Love", 9).await;

    let rejected = [
        json!({ "first_half_scorers": [{ "name": "Alex Love", "goals": 0 }] }),
        json!({ "first_half_scorers": [{ "name": "Alex Love", "goals": 100 }] }),
        json!({
            "first_half_scorers": [{ "name": "Alex Love", "goals": 4000000000u64 }],
            "second_half_scorers": [{ "name": "Alex Love", "goals": 4000000000u64 }]
        }),
    ];

    for events in rejected {
        let response = make_authenticated_request(
            &client,
            Method::POST,
            &format!("{}/admin/matches", test_app.address),
            &admin.token,
            Some(match_request(events.clone())),
        )
        .await;
        assert_eq!(400, response.status().as_u16(), "Expected 400 for {}", events);
    }

    assert_eq!(player_counters(&test_app.db_pool, alex).await.goals, 0);
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to count matches");
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn match_management_requires_admin() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let alex = create_player(&test_app.db_pool, "Alex", "Love", 9).await;
    let parent = create_test_user_and_login(&test_app.address, alex).await;

    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/admin/matches", test_app.address),
        &parent.token,
        Some(match_request(json!({ "first_half_scorers": [{ "name": "Alex Love" }] }))),
    )
    .await;
    assert_eq!(403, response.status().as_u16());
    assert_eq!(player_counters(&test_app.db_pool, alex).await.goals, 0);

    // Regular users can still read results
    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/matches", test_app.address),
        &parent.token,
        None,
    )
    .await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn stat_leaders_rank_players_by_each_counter() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    create_player(&test_app.db_pool, "Alex", "Love", 9).await;
    create_player(&test_app.db_pool, "Mikey", "Wilson", 7).await;

    create_match(
        &test_app,
        &admin.token,
        json!({
            "first_half_scorers": [{ "name": "Mikey Wilson", "goals": 3, "assist": "Alex Love" }],
            "opposition_motm": "Mikey Wilson"
        }),
    )
    .await;

    let client = Client::new();
    let response = make_authenticated_request(
        &client,
        Method::GET,
        &format!("{}/players/stats", test_app.address),
        &admin.token,
        None,
    )
    .await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["goals"][0]["last_name"], "Wilson");
    assert_eq!(body["data"]["goals"][0]["goals"], 3);
    assert_eq!(body["data"]["assists"][0]["last_name"], "Love");
    assert_eq!(body["data"]["motm_wins"][0]["last_name"], "Wilson");
}

#[tokio::test]
async fn failed_edit_rolls_back_counters_with_the_match_row() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;
    let alex = create_player(&test_app.db_pool, "Alex", "Love", 9).await;
    let mikey = create_player(&test_app.db_pool, "Mikey", "Wilson", 7).await;

    let match_id = create_match(
        &test_app,
        &admin.token,
        json!({ "first_half_scorers": [{ "name": "Alex Love", "goals": 2 }] }),
    )
    .await;

    // The counters are reconciled first; the row update then fails on the column width
    let mut oversized = match_request(json!({
        "first_half_scorers": [{ "name": "Mikey Wilson", "goals": 3 }]
    }));
    oversized["home_team"] = json!("W".repeat(101));

    let response = make_authenticated_request(
        &client,
        Method::PUT,
        &format!("{}/admin/matches/{}", test_app.address, match_id),
        &admin.token,
        Some(oversized),
    )
    .await;
    assert_eq!(500, response.status().as_u16());

    assert_eq!(player_counters(&test_app.db_pool, alex).await.goals, 2);
    assert_eq!(player_counters(&test_app.db_pool, mikey).await.goals, 0);

    let (events, needs_repair): (serde_json::Value, bool) =
        sqlx::query_as("SELECT events, needs_stat_repair FROM matches WHERE id = $1")
            .bind(match_id)
            .fetch_one(&test_app.db_pool)
            .await
            .expect("Failed to load match");
    assert_eq!(events["first_half_scorers"][0]["scorer"]["player_id"], json!(alex));
    assert!(needs_repair);

    // A valid edit lands and clears the flag
    let response = make_authenticated_request(
        &client,
        Method::PUT,
        &format!("{}/admin/matches/{}", test_app.address, match_id),
        &admin.token,
        Some(match_request(json!({
            "first_half_scorers": [{ "name": "Mikey Wilson", "goals": 3 }]
        }))),
    )
    .await;
    assert_eq!(200, response.status().as_u16());
    assert_eq!(player_counters(&test_app.db_pool, alex).await.goals, 0);
    assert_eq!(player_counters(&test_app.db_pool, mikey).await.goals, 3);

    let needs_repair: bool = sqlx::query_scalar("SELECT needs_stat_repair FROM matches WHERE id = $1")
        .bind(match_id)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to load match");
    assert!(!needs_repair);
}

#[tokio::test]
async fn concurrent_match_creation_counts_every_goal() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let admin = create_admin_user_and_login(&test_app).await;
    let alex = create_player(&test_app.db_pool, "Alex", "Love", 9).await;
    let matches = 24;
    let url = format!("{}/admin/matches", test_app.address);

    // More requests in flight than the pool has connections
    let requests = (0..matches).map(|_| {
        make_authenticated_request(
            &client,
            Method::POST,
            &url,
            &admin.token,
            Some(match_request(json!({ "first_half_scorers": [{ "name": "Alex Love" }] }))),
        )
    });

    for response in join_all(requests).await {
        assert_eq!(201, response.status().as_u16());
    }

    assert_eq!(player_counters(&test_app.db_pool, alex).await.goals, matches);
}
