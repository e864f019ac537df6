use sk_events_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_attendance_repo::SqliteAttendanceRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_registration_repo::SqliteRegistrationRepo,
    },
    domain::models::auth::{Claims, STAFF_ROLE},
    domain::ports::NotificationDispatcher,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Records every notice instead of delivering it, so tests can assert on
/// dispatch without a broadcast service.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn notify_registration_status(&self, user_id: &str, event_title: &str, status: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((
            user_id.to_string(),
            event_title.to_string(),
            status.to_string(),
        ));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub notifier: Arc<RecordingNotifier>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        // SQLite allows a single writer; one pooled connection keeps
        // competing statements queued instead of surfacing SQLITE_BUSY.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            notify_service_url: "http://localhost".to_string(),
            notify_service_token: "token".to_string(),
        };

        let notifier = Arc::new(RecordingNotifier { sent: Mutex::new(Vec::new()) });

        let state = Arc::new(AppState {
            config,
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            registration_repo: Arc::new(SqliteRegistrationRepo::new(pool.clone())),
            attendance_repo: Arc::new(SqliteAttendanceRepo::new(pool.clone())),
            notifier: notifier.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            notifier,
        }
    }

    pub fn staff_token(&self) -> String {
        mint_token("staff-1", "Kagawad Reyes", &[STAFF_ROLE])
    }

    pub fn resident_token(&self, user_id: &str) -> String {
        mint_token(user_id, "Resident", &[])
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("access_token={}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Creates and publishes an event dated a week from now.
    pub async fn seed_published_event(&self, max_participants: Option<i32>) -> String {
        let staff = self.staff_token();
        let date = (Utc::now() + Duration::days(7)).date_naive();
        let res = self.send("POST", "/api/v1/events", Some(&staff), Some(json!({
            "title": "Basketball League Opening",
            "description": "Inter-purok games at the covered court",
            "date": date.to_string(),
            "start_time": "09:00:00",
            "end_time": "17:00:00",
            "location": "Barangay covered court",
            "category": "sports",
            "max_participants": max_participants,
        }))).await;
        assert!(res.status().is_success(), "seed event creation failed: {}", res.status());
        let event = parse_body(res).await;
        let event_id = event["id"].as_str().unwrap().to_string();

        let res = self.send("POST", &format!("/api/v1/events/{}/publish", event_id), Some(&staff), None).await;
        assert!(res.status().is_success(), "seed event publish failed: {}", res.status());

        event_id
    }

    /// Registers the resident and returns the registration id.
    pub async fn seed_registration(&self, event_id: &str, user_id: &str) -> String {
        let token = self.resident_token(user_id);
        let res = self.send("POST", &format!("/api/v1/events/{}/register", event_id), Some(&token), Some(json!({
            "contact_number": "09171234567"
        }))).await;
        assert!(res.status().is_success(), "seed registration failed: {}", res.status());
        parse_body(res).await["id"].as_str().unwrap().to_string()
    }

    /// Registers the resident and has staff approve it.
    pub async fn seed_approved_registration(&self, event_id: &str, user_id: &str) -> String {
        let registration_id = self.seed_registration(event_id, user_id).await;
        let staff = self.staff_token();
        let res = self.send("POST", &format!("/api/v1/registrations/{}/approve", registration_id), Some(&staff), None).await;
        assert!(res.status().is_success(), "seed approval failed: {}", res.status());
        registration_id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub fn mint_token(sub: &str, name: &str, roles: &[&str]) -> String {
    let key = EncodingKey::from_ed_pem(include_str!("keys/test_private.pem").as_bytes())
        .expect("Invalid test private key");

    let now = Utc::now();
    let claims = Claims {
        iss: "test-issuer".to_string(),
        sub: sub.to_string(),
        aud: "barangay-portal".to_string(),
        exp: (now + Duration::minutes(15)).timestamp() as usize,
        iat: now.timestamp() as usize,
        name: name.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    };

    encode(&Header::new(Algorithm::EdDSA), &claims, &key).expect("Failed to mint test token")
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn future_date(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}
