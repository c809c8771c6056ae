use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::DomainError;
use crate::payload::TodoPatch;

/// ストレージエンジンが採番する Todo の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidTodoId(s.to_string()))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 永続化済みの Todo
///
/// JSON 表現は `{"id": integer, "task": string, "completed": boolean}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub task: String,
    pub completed: bool,
}

impl Todo {
    /// 部分更新を適用する。ペイロードに無いフィールドはそのまま残る。
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(task) = patch.task {
            self.task = task;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}
