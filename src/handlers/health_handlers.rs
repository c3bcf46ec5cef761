//! Health & readiness handlers.
//!
//! - GET /healthz  -> liveness ("ok")
//! - GET /readyz   -> readiness: database reachable and images directory writable

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::SqlitePool;
use std::{collections::BTreeMap, path::Path};
use tokio::fs;
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    checks: BTreeMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}

impl CheckStatus {
    fn from_result(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: None,
            },
            Err(error) => Self {
                ok: false,
                error: Some(error),
            },
        }
    }
}

/// `GET /healthz`. Never performs I/O.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// `GET /readyz`
///
/// 200 when every check passes, 503 otherwise; the body lists each check.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = BTreeMap::new();
    checks.insert(
        "database",
        CheckStatus::from_result(check_database(&state.db).await),
    );
    checks.insert(
        "files_dir",
        CheckStatus::from_result(check_files_dir(state.uploads.files_dir()).await),
    );

    let ready = checks.values().all(|check| check.ok);
    let (status, label) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "error")
    };

    (
        status,
        Json(ReadyResponse {
            status: label,
            checks,
        }),
    )
}

async fn check_database(db: &SqlitePool) -> Result<(), String> {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(db).await {
        Ok(1) => Ok(()),
        Ok(v) => Err(format!("unexpected result: {}", v)),
        Err(e) => Err(format!("error: {}", e)),
    }
}

/// Write, read back and remove a probe file. The probe name starts with a
/// dot so it can never collide with a stored upload.
async fn check_files_dir(dir: &Path) -> Result<(), String> {
    let probe = dir.join(format!(".readyz-{}", Uuid::new_v4()));
    let outcome = match fs::write(&probe, b"readyz").await {
        Ok(()) => match fs::read(&probe).await {
            Ok(bytes) if bytes == b"readyz" => Ok(()),
            Ok(_) => Err("file content mismatch".to_string()),
            Err(e) => Err(format!("could not read probe file: {}", e)),
        },
        Err(e) => return Err(format!("could not write probe file: {}", e)),
    };

    if let Err(e) = fs::remove_file(&probe).await {
        tracing::debug!("could not remove probe file {}: {}", probe.display(), e);
    }
    outcome
}
