//! Todo HTTP API（axum）
//!
//! ストレージハンドルは `AppState` として外部から注入する。
//! テストではインメモリ SQLite を渡す。

use axum::{routing::get, Router};
use infrastructure::TodoStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
    /// `/health` で返す実行環境名
    pub environment: String,
}

/// ルータを構築して返します。
pub fn app(store: TodoStore, environment: impl Into<String>) -> Router {
    app_with_state(AppState {
        store,
        environment: environment.into(),
    })
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
