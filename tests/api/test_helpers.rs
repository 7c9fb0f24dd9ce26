//! Shared test helpers for the API suite.
//!
//! Tests run against a real PostgreSQL database. When none is reachable,
//! `create_test_pool` returns `None` and each test returns early, so the
//! suite still passes on machines without a database.

use actix_web::{App, dev::ServiceResponse, http::Method, test, web};
use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::OnceCell;
use uuid::Uuid;

use safetysync_lib::api;
use safetysync_lib::auth::TokenVerifier;
use safetysync_lib::config::{
    AuthConfig, Config, DatabaseConfig, Environment, IdentityConfig, defaults,
};
use safetysync_lib::db::DbPool;
use safetysync_lib::models::Role;
use safetysync_lib::services::IdentityClient;

/// HS256 secret the test app verifies tokens against.
pub const TEST_JWT_SECRET: &str = "jwt-secret-for-api-tests";

/// Issuer baked into test tokens.
pub const TEST_ISSUER: &str = "http://localhost:54321/auth/v1";

static MIGRATIONS: OnceCell<bool> = OnceCell::const_new();

/// Build a config pointing at the test database.
///
/// `DATABASE_URL` overrides the development default connection string.
fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        host: defaults::DEV_HOST.to_string(),
        port: defaults::DEV_PORT,
        database: DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string()),
            max_connections: 2,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: SecretString::from(TEST_JWT_SECRET.to_string()),
            jwt_issuer: TEST_ISSUER.to_string(),
        },
        identity: IdentityConfig {
            url: defaults::DEV_IDENTITY_URL.to_string(),
            api_key: SecretString::from("test-api-key".to_string()),
        },
    }
}

/// Connect to the test database, or `None` when it is unreachable.
/// Migrations run exactly once per test binary.
pub async fn create_test_pool() -> Option<DbPool> {
    let pool = match DbPool::new(&test_config()).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("skipping test: database unavailable ({err})");
            return None;
        }
    };

    let migrated = MIGRATIONS
        .get_or_init(|| async {
            match pool.run_migrations().await {
                Ok(()) => true,
                Err(err) => {
                    eprintln!("skipping test: migrations failed ({err})");
                    false
                }
            }
        })
        .await;

    migrated.then_some(pool)
}

/// Generate a unique marker for test isolation.
pub fn unique_name(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        Uuid::new_v4().to_string().split('-').next().unwrap()
    )
}

/// Mint a bearer token for `user_id` that the test app's verifier accepts.
pub fn token_for(user_id: Uuid) -> String {
    let claims = serde_json::json!({
        "sub": user_id.to_string(),
        "iss": TEST_ISSUER,
        "exp": chrono::Utc::now().timestamp() + 3600,
        "email": "worker@example.com",
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// Insert a profile for a fresh user id and give it `role`.
pub async fn seed_user(pool: &DbPool, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    pool.upsert_profile(id, Some(unique_name("user")), None)
        .await
        .expect("Failed to seed profile");

    if role != Role::User {
        pool.update_profile_role(id, role)
            .await
            .expect("Failed to set role");
    }

    id
}

/// Create the API app under test.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let config = test_config();
    let verifier = TokenVerifier::new(&config.auth);
    let identity = IdentityClient::new(&config.identity);

    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(identity))
            .service(
                web::scope("/api")
                    .configure(api::configure_incident_routes)
                    .configure(api::configure_action_routes)
                    .configure(api::configure_profile_routes)
                    .configure(api::configure_user_routes)
                    .configure(api::configure_stats_routes)
                    .configure(api::configure_auth_routes),
            )
            .configure(api::configure_health_routes)
            .default_service(web::route().to(api::not_found)),
    )
    .await
}

/// Minimal valid incident payload. `marker` lands in the department field
/// so tests can recognise their own rows.
pub fn incident_body(marker: &str) -> Value {
    serde_json::json!({
        "category": "safety",
        "severity": "medium",
        "location": "Dock 4",
        "department": marker,
        "description": "Slip hazard near the loading ramp",
    })
}

/// Send a request with no body and decode the JSON response.
pub async fn send_empty<S>(app: &S, method: Method, path: &str, token: Option<&str>) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::default().method(method).uri(path);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Send a GET and decode the JSON response.
pub async fn get_json<S>(app: &S, path: &str, token: Option<&str>) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send_empty(app, Method::GET, path, token).await
}

/// Send a JSON body with the given method and decode the response.
pub async fn send_json<S>(
    app: &S,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::default().method(method).uri(path);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }

    let resp = test::call_service(app, req.set_json(body).to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Report an incident and return its id. Fails the test on a non-200.
pub async fn report_incident<S>(app: &S, token: &str, body: Value) -> Uuid
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, resp) = send_json(app, Method::POST, "/api/incidents", Some(token), body).await;
    assert_eq!(status, 200, "Failed to report incident: {resp}");
    assert_eq!(resp["success"], true);

    resp["incident"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("Incident response missing id")
}
