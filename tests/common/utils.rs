use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{PgPool, PgConnection, Connection, Executor, Row};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::Client;

use matchday_backend::run;
use matchday_backend::config::settings::{get_config, DatabaseSettings, get_jwt_settings};
use matchday_backend::stats::PlayerCounters;
use matchday_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool
}

pub struct UserRegLoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    // A fresh database per test, even when DATABASE_URL points elsewhere
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database)
        .await;
    let jwt_settings = get_jwt_settings(&configuration);
    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Put a player on the roster without going through the admin API.
pub async fn create_player(pool: &PgPool, first_name: &str, last_name: &str, shirt_number: i32) -> Uuid {
    let player_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO players (id, first_name, last_name, shirt_number, position) VALUES ($1, $2, $3, $4, 'MID')",
    )
    .bind(player_id)
    .bind(first_name)
    .bind(last_name)
    .bind(shirt_number)
    .execute(pool)
    .await
    .expect("Failed to insert player");

    player_id
}

pub async fn player_counters(pool: &PgPool, player_id: Uuid) -> PlayerCounters {
    let row = sqlx::query(
        "SELECT goals, assists, yellow_cards, red_cards, motm_wins, parent_motm_wins FROM players WHERE id = $1",
    )
    .bind(player_id)
    .fetch_one(pool)
    .await
    .expect("Failed to load player counters");

    PlayerCounters {
        goals: row.get("goals"),
        assists: row.get("assists"),
        yellow_cards: row.get("yellow_cards"),
        red_cards: row.get("red_cards"),
        motm_wins: row.get("motm_wins"),
        parent_motm_wins: row.get("parent_motm_wins"),
    }
}

pub async fn register_user(
    client: &Client,
    app_address: &str,
    email: &str,
    password: &str,
    linked_player_id: Uuid,
) -> reqwest::Response {
    let user_request = json!({
        "email": email,
        "password": password,
        "first_name": "Test",
        "last_name": "Parent",
        "linked_player_id": linked_player_id,
        "is_player": false,
        "is_parent": true,
        "mobile_number": "07700 900123"
    });

    client
        .post(&format!("{}/register_user", app_address))
        .json(&user_request)
        .send()
        .await
        .expect("Failed to register user.")
}

pub async fn login(client: &Client, app_address: &str, email: &str, password: &str) -> String {
    let login_response = client
        .post(&format!("{}/login", app_address))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute login request.");
    assert_eq!(200, login_response.status().as_u16(), "Login should succeed");

    let login_response: serde_json::Value = login_response.json().await.expect("Failed to parse login response");
    login_response["token"].as_str().expect("No token in response").to_string()
}

/// Register a parent account linked to `linked_player_id` and log it in.
pub async fn create_test_user_and_login(app_address: &str, linked_player_id: Uuid) -> UserRegLoginResponse {
    let client = Client::new();
    let email = format!("parent{}@example.com", Uuid::new_v4());
    let password = "password123";

    let register_response = register_user(&client, app_address, &email, password, linked_player_id).await;
    assert_eq!(201, register_response.status().as_u16(), "Registration should succeed");
    let body: serde_json::Value = register_response.json().await.expect("Failed to parse registration response");
    let user_id = body["data"]["user_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("No user id in registration response");

    let token = login(&client, app_address, &email, password).await;

    UserRegLoginResponse { user_id, email, token }
}

pub async fn make_authenticated_request(
    client: &Client,
    method: reqwest::Method,
    url: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> reqwest::Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));

    if let Some(json_body) = body {
        request = request.json(&json_body);
    }

    request.send().await.expect("Failed to execute request")
}
