//! Structs
//!
//! Composite records in contract state: a todo list whose entries are
//! `{ text, completed }` pairs, appended and toggled by index.

use chainlab_sim::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Registry name of this specimen
pub const NAME: &str = "todo_list";

/// One todo entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub text: String,
    pub completed: bool,
}

pub fn specimen() -> Specimen {
    Specimen::builder(NAME)
        .description("composite records stored in state")
        .state(json!({"todos": []}))
        .view("todo_count", vec![], todo_count)
        .view("todo_at", vec![Param::uint("index")], todo_at)
        .mutate("create", vec![Param::str("text")], create)
        .mutate("toggle", vec![Param::uint("index")], toggle)
        .build()
}

fn load(env: &CallEnv<'_>) -> SimResult<Vec<Todo>> {
    env.get_or("todos", Vec::new())
}

fn todo_count(env: &mut CallEnv<'_>, _args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    Ok(json!(load(env)?.len()))
}

fn todo_at(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let index = args::uint(args, 0)? as usize;
    let todos = load(env)?;
    let todo = todos
        .get(index)
        .ok_or_else(|| SimError::revert("no such todo"))?;
    Ok(serde_json::to_value(todo)?)
}

fn create(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let text = args::string(args, 0)?;
    let mut todos = load(env)?;
    todos.push(Todo {
        text,
        completed: false,
    });
    env.set("todos", &todos)?;
    Ok(json!(todos.len() - 1))
}

fn toggle(env: &mut CallEnv<'_>, args: &[serde_json::Value]) -> SimResult<serde_json::Value> {
    let index = args::uint(args, 0)? as usize;
    let mut todos = load(env)?;
    let todo = todos
        .get_mut(index)
        .ok_or_else(|| SimError::revert("no such todo"))?;
    todo.completed = !todo.completed;
    let completed = todo.completed;
    env.set("todos", &todos)?;
    Ok(json!(completed))
}
