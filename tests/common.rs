// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides scripted generative backends, a fake identity provider and resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `nutristrong_server`
//!
//! Every external collaborator is replaced by an in-process fake so tests
//! never reach the network.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use nutristrong_server::{
    auth::{AuthSession, Identity, IdentityProvider},
    config::{
        DatabaseUrl, Environment, IdentityBackend, IdentityConfig, LlmConfig, ServerConfig,
        StorageBackend, StorageConfig,
    },
    database::Database,
    errors::{AppError, AppResult, ErrorCode},
    llm::{ChatRequest, ChatResponse, LlmProvider},
    models::{Gender, GoalType, Profile},
    plans::PlanGenerator,
    resources::ServerResources,
    server::build_app,
    storage::ObjectStore,
};
use serde_json::{json, Value};

static INIT_LOGGER: Once = Once::new();

/// Bearer token accepted for [`alice`]
pub const ALICE_TOKEN: &str = "token-alice";
/// Bearer token accepted for [`bob`]
pub const BOB_TOKEN: &str = "token-bob";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn alice() -> Identity {
    Identity::new("user-alice", Some("alice@example.com".to_owned()))
}

pub fn bob() -> Identity {
    Identity::new("user-bob", Some("bob@example.com".to_owned()))
}

/// A fully specified profile with non-default values in every field
pub fn sample_profile() -> Profile {
    Profile {
        age: 34,
        gender: Gender::Female,
        height_cm: 167.5,
        weight_kg: 61.2,
        goal: GoalType::GainMuscle,
        activity_level: "Very Active".to_owned(),
        dietary_restrictions: "vegetarian, low sodium".to_owned(),
        allergies: "peanuts".to_owned(),
    }
}

fn meal(name: &str, calories: u32) -> Value {
    json!({
        "name": name,
        "calories": calories,
        "macros": { "protein": 30, "carbs": 40, "fats": 12 },
        "ingredients": [format!("{name} base"), "olive oil"]
    })
}

/// A generated document in the backend's snake_case schema
pub fn sample_plan_document(meal_days: usize, workout_days: usize) -> Value {
    const DAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    let weekly_meals: Vec<Value> = DAYS
        .iter()
        .cycle()
        .take(meal_days)
        .enumerate()
        .map(|(i, day)| {
            json!({
                "day_name": day,
                "breakfast": meal(&format!("Oats {i}"), 450),
                "lunch": meal(&format!("Tofu bowl {i}"), 700),
                "dinner": meal(&format!("Lentil curry {i}"), 800),
                "snack": meal(&format!("Greek yogurt {i}"), 250)
            })
        })
        .collect();

    let weekly_workouts: Vec<Value> = DAYS
        .iter()
        .cycle()
        .take(workout_days)
        .map(|day| {
            json!({
                "day_name": day,
                "focus": "Push (Chest/Shoulders/Triceps)",
                "duration_minutes": 75,
                "exercises": [
                    { "name": "Dumbbell Incline Press", "sets": 3, "reps": "3x8", "description": "Slow eccentric" },
                    { "name": "Pec Deck Fly", "sets": 3, "reps": "8-12", "description": "Full stretch" }
                ]
            })
        })
        .collect();

    json!({
        "summary": "Lean bulk with a 300 kcal surplus and high protein.",
        "daily_calories": 2600,
        "macros": { "protein": 140, "carbs": 310, "fats": 80 },
        "weekly_workouts": weekly_workouts,
        "weekly_meals": weekly_meals,
        "shopping_list": ["Oats", "Tofu", "Lentils", "Greek yogurt"]
    })
}

/// What a [`ScriptedLlm`] does when called
#[derive(Debug, Clone)]
pub enum Script {
    /// Return this text
    Reply(String),
    /// Fail with this error code
    Fail(ErrorCode),
    /// Never answer
    Hang,
}

/// Generative backend fake that follows a fixed script and records requests
pub struct ScriptedLlm {
    script: Script,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Self::new(Script::Reply(text.into()))
    }

    pub fn replying_with_plan() -> Arc<Self> {
        Self::replying(sample_plan_document(7, 7).to_string())
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Reply(text) => Ok(ChatResponse {
                content: text.clone(),
                model: self.default_model().to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Script::Fail(code) => Err(AppError::new(*code, "scripted failure")),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::internal("unreachable"))
            }
        }
    }
}

/// Identity provider fake backed by a fixed token table
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    /// Accepts [`ALICE_TOKEN`] and [`BOB_TOKEN`]
    pub fn new() -> Arc<Self> {
        let tokens = HashMap::from([
            (ALICE_TOKEN.to_owned(), alice()),
            (BOB_TOKEN.to_owned(), bob()),
        ]);
        Arc::new(Self { tokens })
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn verify(&self, token: &str) -> AppResult<Identity> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::auth_invalid("unknown token"))
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> AppResult<AuthSession> {
        Err(AppError::invalid_input("sign-up is not available"))
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> AppResult<AuthSession> {
        Err(AppError::auth_invalid("Invalid login credentials"))
    }
}

/// Object store fake that keeps uploads in memory
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<String> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), (bytes, content_type.to_owned()));
        Ok(format!("memory://photos/{key}"))
    }
}

/// In-memory database with every table created
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::in_memory().await.unwrap()
}

/// Generator wired to `llm` with a short timeout
pub fn test_generator(llm: Arc<dyn LlmProvider>) -> PlanGenerator {
    PlanGenerator::new(llm).with_timeout(Duration::from_millis(200))
}

/// Test fixtures shared by service and HTTP tests
pub struct TestContext {
    pub resources: Arc<ServerResources>,
    pub llm: Arc<ScriptedLlm>,
    pub photos: Arc<MemoryObjectStore>,
}

impl TestContext {
    pub async fn new(llm: Arc<ScriptedLlm>) -> Self {
        let database = create_test_database().await;
        let photos = MemoryObjectStore::new();
        let resources = ServerResources::new(
            database,
            test_generator(llm.clone()),
            StaticIdentityProvider::new(),
            photos.clone(),
        );
        Self {
            resources: Arc::new(resources),
            llm,
            photos,
        }
    }

    pub async fn with_plan_reply() -> Self {
        Self::new(ScriptedLlm::replying_with_plan()).await
    }

    /// Full application router, transport layers included
    pub fn app(&self) -> Router {
        build_app(&self.resources, &test_config())
    }
}

/// Configuration matching the fakes above; nothing here is read from the environment
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        environment: Environment::Testing,
        database_url: DatabaseUrl::Memory,
        llm: LlmConfig {
            api_key: None,
            model: "scripted-model".to_owned(),
            timeout: Duration::from_millis(200),
        },
        identity: IdentityConfig {
            backend: IdentityBackend::Local,
            jwt_secret: Some("test-secret".to_owned()),
            jwt_expiry_hours: 1,
        },
        supabase: None,
        storage: StorageConfig {
            backend: StorageBackend::Local,
            bucket: "progress-photos".to_owned(),
            local_dir: PathBuf::from("target/test-photos"),
            public_base_url: "http://localhost/photos".to_owned(),
            max_photo_bytes: 1024 * 1024,
        },
        cors_origins: vec!["*".to_owned()],
    }
}
