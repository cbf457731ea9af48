//! Persistence for the planner state
//!
//! The whole `AppSnapshot` is stored as one JSON document in a single-row
//! SQLite table. Callers go through the `StateStore` port so tests and other
//! hosts can swap the backing store.

use std::future::Future;

use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::llm::NudgeClient;
use crate::models::AppSnapshot;

pub type DbPool = SqlitePool;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Snapshot serialization failed: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Pool Setup
/// ---------------------------------------------------------------------------

/// Open (creating if needed) the configured database file and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool, StoreError> {
  tracing::info!("Initializing database at: {}", config.db_path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&config.database_url())
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// State Store Port
/// ---------------------------------------------------------------------------

pub trait StateStore: Send + Sync {
  /// Stored snapshot with the catalog merged and stale sessions closed
  fn load(&self) -> impl Future<Output = Result<AppSnapshot, StoreError>> + Send;

  fn save(&self, snapshot: &AppSnapshot) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SqliteStateStore {
  pool: DbPool,
}

impl SqliteStateStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }

  /// Load as of the given local day. A missing row yields the default snapshot.
  pub async fn load_for_day(&self, today: NaiveDate) -> Result<AppSnapshot, StoreError> {
    let data: Option<String> = sqlx::query_scalar("SELECT data FROM app_state WHERE id = 1")
      .fetch_optional(&self.pool)
      .await?;

    let mut snapshot = match data {
      Some(json) => serde_json::from_str::<AppSnapshot>(&json)?,
      None => {
        tracing::debug!("No stored state, starting from defaults");
        AppSnapshot::default()
      }
    };

    snapshot.merge_catalog();
    snapshot.auto_complete_stale(today);

    tracing::debug!(
      workouts = snapshot.workouts.len(),
      exercises = snapshot.available_exercises.len(),
      "Loaded app state"
    );

    Ok(snapshot)
  }
}

impl StateStore for SqliteStateStore {
  async fn load(&self) -> Result<AppSnapshot, StoreError> {
    self.load_for_day(Local::now().date_naive()).await
  }

  async fn save(&self, snapshot: &AppSnapshot) -> Result<(), StoreError> {
    let data = serde_json::to_string(snapshot)?;

    sqlx::query(
      r#"
      INSERT INTO app_state (id, data, updated_at)
      VALUES (1, ?1, ?2)
      ON CONFLICT(id) DO UPDATE SET
        data = excluded.data,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(data)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.pool)
    .await?;

    tracing::debug!(workouts = snapshot.workouts.len(), "Saved app state");

    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Application State
/// ---------------------------------------------------------------------------

/// Live snapshot plus the store it writes through to
pub struct AppState<S: StateStore = SqliteStateStore> {
  pub store: S,
  pub snapshot: Mutex<AppSnapshot>,
  pub nudge: NudgeClient,
}

impl<S: StateStore> AppState<S> {
  /// Load the snapshot and persist any sessions closed during load
  pub async fn open(store: S, nudge: NudgeClient) -> Result<Self, StoreError> {
    let snapshot = store.load().await?;
    store.save(&snapshot).await?;

    Ok(Self {
      store,
      snapshot: Mutex::new(snapshot),
      nudge,
    })
  }

  /// Run a mutation against the live snapshot and save it when the closure
  /// succeeds. A failed save restores the snapshot as it was before the call.
  pub async fn mutate<T, E, F>(&self, f: F) -> Result<Result<T, E>, StoreError>
  where
    F: FnOnce(&mut AppSnapshot) -> Result<T, E>,
  {
    let mut snapshot = self.snapshot.lock().await;
    let before = snapshot.clone();
    let result = f(&mut *snapshot);
    if result.is_ok() {
      if let Err(e) = self.store.save(&*snapshot).await {
        tracing::error!("Rolling back unsaved change: {}", e);
        *snapshot = before;
        return Err(e);
      }
    }
    Ok(result)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::NudgeConfig;
  use crate::models::{ExerciseDefinition, TrainingProgramUpdate};
  use crate::test_utils::{mock_completed_workout, mock_open_workout, setup_test_db, teardown_test_db};

  #[tokio::test]
  async fn test_missing_row_loads_defaults() {
    let pool = setup_test_db().await;
    let store = SqliteStateStore::new(pool.clone());

    let snapshot = store.load().await.unwrap();
    assert!(snapshot.workouts.is_empty());
    assert_eq!(snapshot.available_exercises.len(), crate::catalog::ExerciseCatalog::built_in().len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_save_then_load_keeps_user_state() {
    let pool = setup_test_db().await;
    let store = SqliteStateStore::new(pool.clone());

    let mut snapshot = AppSnapshot::default();
    snapshot.update_program(TrainingProgramUpdate {
      days_per_week: Some(3),
      ..Default::default()
    });
    snapshot.available_exercises.add(ExerciseDefinition {
      name: "Sled Push".to_string(),
      ..Default::default()
    });
    snapshot.workouts.push(mock_completed_workout("w1", "Upper A", 2));

    store.save(&snapshot).await.unwrap();
    store.save(&snapshot).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_state")
      .fetch_one(&pool)
      .await
      .unwrap();
    assert_eq!(count, 1);

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.training_program.days_per_week, 3);
    assert!(loaded.available_exercises.contains("sled push"));
    assert_eq!(loaded.workouts.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_load_merges_catalog_without_duplicates() {
    let pool = setup_test_db().await;
    let store = SqliteStateStore::new(pool.clone());

    sqlx::query("INSERT INTO app_state (id, data, updated_at) VALUES (1, ?1, '2026-01-01T00:00:00Z')")
      .bind(r#"{"availableExercises":[{"name":"bench press"},{"name":"Sled Push"}]}"#)
      .execute(&pool)
      .await
      .unwrap();

    let loaded = store.load().await.unwrap();
    let built_in = crate::catalog::ExerciseCatalog::built_in().len();
    assert_eq!(loaded.available_exercises.len(), built_in + 1);
    assert_eq!(loaded.available_exercises.find("Bench Press").unwrap().name, "Bench Press");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_load_closes_stale_sessions() {
    let pool = setup_test_db().await;
    let store = SqliteStateStore::new(pool.clone());

    let mut snapshot = AppSnapshot::default();
    snapshot.workouts.push(mock_open_workout("old", "Lower A", 3));
    store.save(&snapshot).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert!(loaded.workouts[0].completed);
    assert!(loaded.active_workout().is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_mutate_saves_only_on_success() {
    let pool = setup_test_db().await;
    let state = AppState::open(SqliteStateStore::new(pool.clone()), NudgeClient::disabled())
      .await
      .unwrap();

    let failed: Result<(), &str> = state.mutate(|_| Err("nope")).await.unwrap();
    assert!(failed.is_err());

    let saved: Result<usize, ()> = state
      .mutate(|snapshot| {
        snapshot.workouts.push(mock_completed_workout("w1", "Upper A", 1));
        Ok(snapshot.workouts.len())
      })
      .await
      .unwrap();
    assert_eq!(saved, Ok(1));

    let reloaded = state.store.load().await.unwrap();
    assert_eq!(reloaded.workouts.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_failed_save_restores_snapshot() {
    let pool = setup_test_db().await;
    let state = AppState::open(SqliteStateStore::new(pool.clone()), NudgeClient::disabled())
      .await
      .unwrap();
    let before = state.snapshot.lock().await.clone();

    pool.close().await;
    let result = state
      .mutate(|snapshot| {
        snapshot.workouts.push(mock_open_workout("w1", "Upper A", 0));
        Ok::<_, ()>(())
      })
      .await;

    assert!(matches!(result, Err(StoreError::Database(_))));
    assert_eq!(*state.snapshot.lock().await, before);
  }

  #[tokio::test]
  async fn test_initialize_db_uses_configured_path() {
    let db_path = std::env::temp_dir().join(format!("align-coach-{}.db", Utc::now().timestamp_micros()));
    let config = AppConfig {
      db_path: db_path.clone(),
      log_level: "info".to_string(),
      nudge: NudgeConfig {
        api_key: None,
        api_url: url::Url::parse("http://localhost/v1/messages").unwrap(),
        model: "test-model".to_string(),
        timeout: std::time::Duration::from_secs(1),
      },
    };

    let pool = initialize_db(&config).await.unwrap();
    let store = SqliteStateStore::new(pool.clone());
    store.save(&AppSnapshot::default()).await.unwrap();
    assert!(db_path.exists());

    pool.close().await;
    let _ = std::fs::remove_file(&db_path);
  }
}
