use std::net::SocketAddr;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use tarefas_api::config::Config;

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

async fn into_parts(resp: reqwest::Response) -> (Value, StatusCode) {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(json!(null));
    (body, status)
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Token {token}"))
    }

    /// Self-signup, no token needed.
    pub async fn signup(&self, username: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/usuarios/"))
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": password,
                "first_name": username,
                "last_name": "Tester",
            }))
            .send()
            .await
            .expect("signup request failed");
        into_parts(resp).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/login/"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed");
        into_parts(resp).await
    }

    /// Sign up and log in `username`, returning (user id, token).
    pub async fn user_with_token(&self, username: &str) -> (String, String) {
        let (user, status) = self.signup(username, "password123").await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {user}");
        let (body, status) = self.login(username, "password123").await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (
            user["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Create a project owned by the caller, return the project JSON.
    pub async fn create_project(&self, token: &str, name: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/projetos/",
                token,
                &json!({ "name": name, "description": format!("{name} description") }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {body}");
        body
    }

    /// Create a task in a project, return the task JSON.
    pub async fn create_task(&self, token: &str, project_id: &str, title: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/tarefas/",
                token,
                &json!({ "title": title, "project": project_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {body}");
        body
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .authed(self.client.get(self.url(path)), token)
            .send()
            .await
            .expect("get request failed");
        into_parts(resp).await
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .authed(self.client.post(self.url(path)), token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        into_parts(resp).await
    }

    /// POST without a body, as the parameterless actions expect.
    pub async fn post_empty(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .authed(self.client.post(self.url(path)), token)
            .send()
            .await
            .expect("post request failed");
        into_parts(resp).await
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .authed(self.client.put(self.url(path)), token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        into_parts(resp).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .authed(self.client.delete(self.url(path)), token)
            .send()
            .await
            .expect("delete request failed");
        into_parts(resp).await
    }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("tarefas_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = tarefas_api::db::connect(&test_url, 5)
        .await
        .expect("Failed to prepare test database");

    let config = Config {
        database_url: test_url,
        db_max_connections: 5,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        cors_origins: vec![],
        log_level: "warn".to_string(),
    };

    let app = tarefas_api::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
