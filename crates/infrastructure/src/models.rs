use domain::{Todo, TodoId};
use sqlx::FromRow;

/// `todo` テーブルの 1 行
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub task: String,
    pub completed: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: TodoId::new(row.id),
            task: row.task,
            completed: row.completed,
        }
    }
}
