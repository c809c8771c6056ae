//! SQLite ストレージ
//!
//! `TodoStore` はプロセスで 1 つだけ生成し、HTTP 層の状態として注入する。
//! リクエストごとに `TodoStore::begin`（読み取り）または `TodoStore::begin_write`
//! （書き込み）でセッション（トランザクション）を取得し、
//! 成功時は `TodoSession::commit`、それ以外の経路ではドロップでロールバックされる。

use std::str::FromStr;
use std::time::Duration;

use domain::{NewTodo, Todo, TodoId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::StorageError;
use crate::models::TodoRow;

const CREATE_TODO_TABLE: &str = "CREATE TABLE IF NOT EXISTS todo (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0
)";

/// ストレージエンジンへのハンドル
#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// 接続文字列から接続し、テーブルが無ければ作成する。
    /// ファイルが存在しない場合は新規作成する。
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        tracing::info!(database_url, "Connected to database");
        Self::with_pool(pool).await
    }

    /// テスト用のインメモリストア
    ///
    /// 接続が全て閉じるとインメモリ DB は消えるため、接続を 1 本に固定して破棄させない。
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::query(CREATE_TODO_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// 読み取り専用のセッションを開始する
    pub async fn begin(&self) -> Result<TodoSession, StorageError> {
        let tx = self.pool.begin().await?;
        Ok(TodoSession { tx })
    }

    /// 書き込みを伴うセッションを開始する
    ///
    /// `BEGIN IMMEDIATE` で開始時に書き込みロックを取る。
    /// 後続の書き込みセッションは busy timeout の範囲で待機する。
    pub async fn begin_write(&self) -> Result<TodoSession, StorageError> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(TodoSession { tx })
    }

    /// 疎通確認（ヘルスチェック用）
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// 1 リクエストに対応するトランザクション
///
/// `commit` せずにドロップされた場合はロールバックされる。
pub struct TodoSession {
    tx: Transaction<'static, Sqlite>,
}

impl TodoSession {
    /// 全件を id 昇順で返す
    pub async fn list(&mut self) -> Result<Vec<Todo>, StorageError> {
        let rows: Vec<TodoRow> =
            sqlx::query_as("SELECT id, task, completed FROM todo ORDER BY id")
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    pub async fn find(&mut self, id: TodoId) -> Result<Option<Todo>, StorageError> {
        let row: Option<TodoRow> =
            sqlx::query_as("SELECT id, task, completed FROM todo WHERE id = ?")
                .bind(id.as_i64())
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(row.map(Todo::from))
    }

    /// 新規作成。id はストレージエンジンが採番する。
    pub async fn insert(&mut self, new: NewTodo) -> Result<Todo, StorageError> {
        let result = sqlx::query("INSERT INTO todo (task, completed) VALUES (?, ?)")
            .bind(new.task.as_str())
            .bind(new.completed)
            .execute(&mut *self.tx)
            .await?;

        Ok(Todo {
            id: TodoId::new(result.last_insert_rowid()),
            task: new.task,
            completed: new.completed,
        })
    }

    /// 既存行を上書きする。対象行が無ければ `false`。
    pub async fn update(&mut self, todo: &Todo) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE todo SET task = ?, completed = ? WHERE id = ?")
            .bind(todo.task.as_str())
            .bind(todo.completed)
            .bind(todo.id.as_i64())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// 物理削除。対象行が無ければ `false`。
    pub async fn delete(&mut self, id: TodoId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        tracing::debug!("Session committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await?;
        tracing::debug!("Session rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(task: &str) -> NewTodo {
        NewTodo {
            task: task.to_string(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = TodoStore::in_memory().await.unwrap();
        let mut session = store.begin_write().await.unwrap();

        let a = session.insert(new_todo("A")).await.unwrap();
        let b = session.insert(new_todo("B")).await.unwrap();
        assert!(b.id > a.id);

        let listed = session.list().await.unwrap();
        assert_eq!(listed, vec![a, b]);
        session.commit().await.unwrap();
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = TodoStore::in_memory().await.unwrap();
        let mut session = store.begin_write().await.unwrap();

        let ghost = Todo {
            id: TodoId::new(999_999),
            task: "ghost".into(),
            completed: false,
        };
        assert!(!session.update(&ghost).await.unwrap());
        assert!(!session.delete(ghost.id).await.unwrap());
        assert_eq!(session.find(ghost.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_store() {
        let store = TodoStore::in_memory().await.unwrap();
        store.ping().await.unwrap();
    }
}
