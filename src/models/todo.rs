use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(task: String, completed: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task,
            completed,
        }
    }
}
