use std::sync::Arc;

use account_service::domain::product::models::Product;
use account_service::domain::product::ports::ProductRepository;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::repositories::database::connect_sqlite;
use account_service::repositories::SqliteProductRepository;
use account_service::repositories::SqliteUserRepository;
use auth::Clock;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory database
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub products: Arc<SqliteProductRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // One connection: every connection to sqlite::memory: is its own database
        let pool = connect_sqlite("sqlite::memory:", 1)
            .await
            .expect("Failed to open in-memory database");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let token_issuer = Arc::new(TokenIssuer::with_clock(TEST_SECRET, clock.clone()));
        // Cheap cost keeps the suite fast; the format is unchanged
        let password_hasher =
            Arc::new(PasswordHasher::with_cost(1024, 1, 1).expect("Failed to build hasher"));

        let products = Arc::new(SqliteProductRepository::new(pool.clone()));
        let state = AppState::new(
            Arc::new(SqliteUserRepository::new(pool)),
            Arc::clone(&products),
            password_hasher,
            token_issuer,
            Duration::minutes(15),
        );

        let router = create_router(state, std::time::Duration::from_secs(60));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
            products,
        }
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn sign_up(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/sign-up")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/sign-in")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the issued token
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        self.sign_up(username, password).await;
        let body: serde_json::Value = self
            .sign_in(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in response")
            .to_string()
    }

    pub async fn seed_product(&self, name: &str, price: f64) -> Product {
        self.products
            .create(Product::new(name, format!("{} from the test catalog", name), price))
            .await
            .expect("Failed to seed product")
    }
}
