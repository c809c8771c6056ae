//! /todos と /health のハンドラ
//!
//! 各ハンドラは最初にセッションを開始し、成功した場合のみ commit する。
//! 検証エラーを含むそれ以外の経路ではセッションがドロップされロールバックされる。

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{NewTodo, Todo, TodoId, TodoPatch};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::AppState;

/// GET /todos
#[tracing::instrument(skip_all)]
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let mut session = state.store.begin().await?;
    let todos = session.list().await?;
    session.commit().await?;
    Ok(Json(todos))
}

/// GET /todos/{id}
#[tracing::instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id: TodoId = id.parse()?;
    let mut session = state.store.begin().await?;
    let todo = session.find(id).await?.ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(Json(todo))
}

/// POST /todos
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let mut session = state.store.begin_write().await?;
    let new = NewTodo::from_payload(parse_json(&body))?;
    let todo = session.insert(new).await?;
    session.commit().await?;

    tracing::info!(id = %todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /todos/{id}
///
/// 存在確認をペイロード検証より先に行う。
#[tracing::instrument(skip(state, body))]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id: TodoId = id.parse()?;
    let mut session = state.store.begin_write().await?;
    let mut todo = session.find(id).await?.ok_or(ApiError::NotFound)?;

    let patch = TodoPatch::from_payload(parse_json(&body))?;
    if !patch.is_empty() {
        todo.apply(patch);
        if !session.update(&todo).await? {
            return Err(ApiError::NotFound);
        }
    }
    session.commit().await?;

    tracing::info!(id = %todo.id, "Todo updated");
    Ok(Json(todo))
}

/// DELETE /todos/{id}
#[tracing::instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: TodoId = id.parse()?;
    let mut session = state.store.begin_write().await?;
    if !session.delete(id).await? {
        return Err(ApiError::NotFound);
    }
    session.commit().await?;

    tracing::info!(%id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
    database: &'static str,
    environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /health
///
/// ストレージへの疎通まで確認する。
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthBody {
                status: "healthy",
                database: "connected",
                environment: state.environment.clone(),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthBody {
                    status: "unhealthy",
                    database: "disconnected",
                    environment: state.environment.clone(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// 空ボディや不正な JSON は「データなし」として扱う
fn parse_json(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}
