//! リクエストペイロードの解釈
//!
//! ペイロードは型付きの構造体ではなく `serde_json::Value` のまま受け取り、
//! フィールドの有無と型を順番に検証する。エラーメッセージの優先順位が
//! API 契約の一部になっているため、serde の derive には任せない。

use serde_json::{Map, Value};

use crate::errors::DomainError;

const TASK: &str = "task";
const COMPLETED: &str = "completed";

/// POST /todos で受け取る作成内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// 受け取ったままのタスク（空白判定にのみ trim を使う）
    pub task: String,
    pub completed: bool,
}

impl NewTodo {
    /// 作成ペイロードを検証する。
    ///
    /// 1. 空でない JSON オブジェクトであること
    /// 2. `task` キーを含むこと
    /// 3. `task` が空白以外を含む文字列であること
    pub fn from_payload(payload: Option<Value>) -> Result<Self, DomainError> {
        let fields = non_empty_object(payload).ok_or(DomainError::NoData)?;

        let task = fields.get(TASK).ok_or(DomainError::TaskRequired)?;
        let task = match task {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            _ => return Err(DomainError::InvalidTask),
        };

        let completed = fields.get(COMPLETED).map(truthy).unwrap_or(false);

        Ok(Self { task, completed })
    }
}

/// PUT /todos/{id} で受け取る部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// 更新ペイロードを解釈する。
    ///
    /// 作成時と違い `task` の空文字チェックは行わない。
    pub fn from_payload(payload: Option<Value>) -> Result<Self, DomainError> {
        let fields = match payload {
            Some(Value::Object(fields)) => fields,
            _ => return Err(DomainError::NoData),
        };

        let task = match fields.get(TASK) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(DomainError::TaskNotString),
        };

        let completed = fields.get(COMPLETED).map(truthy);

        Ok(Self { task, completed })
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.completed.is_none()
    }
}

fn non_empty_object(payload: Option<Value>) -> Option<Map<String, Value>> {
    match payload {
        Some(Value::Object(fields)) if !fields.is_empty() => Some(fields),
        _ => None,
    }
}

/// JSON 値を真偽値に変換する。
///
/// `null` / `false` / `0` / `""` / `[]` / `{}` のみ false。
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
