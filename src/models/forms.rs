use serde::{Deserialize, Serialize};
use super::todo::Todo;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTodoForm {
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTodoForm {
    pub todo_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoForm {
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodosResponse {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
