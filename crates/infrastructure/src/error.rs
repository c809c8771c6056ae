use thiserror::Error;

/// ストレージエンジン由来のエラー（接続失敗・制約違反など）
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
