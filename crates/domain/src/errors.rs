use thiserror::Error;

/// リクエストペイロードの検証エラー
///
/// メッセージはそのまま API の `{"error": ...}` として返却される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("No data provided")]
    NoData,

    #[error("Task field is required")]
    TaskRequired,

    #[error("Task must be a non-empty string")]
    InvalidTask,

    #[error("Task must be a string")]
    TaskNotString,

    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),
}
