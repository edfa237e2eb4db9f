use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Todo, User};
use super::store::UserStore;

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    by_username: HashMap<String, String>,
    order: Vec<String>,
}

/// Process-local store for development and tests. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn user_mut<'a>(inner: &'a mut Inner, user_id: &str) -> StoreResult<&'a mut User> {
    inner
        .users
        .get_mut(user_id)
        .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.by_username.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername(user.username.clone()));
        }
        inner.by_username.insert(user.username.clone(), user.id.clone());
        inner.order.push(user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .by_username
            .get(username)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.lock().await.users.get(user_id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.users.get(id))
            .cloned()
            .collect())
    }

    async fn push_todo(&self, user_id: &str, todo: &Todo) -> StoreResult<Vec<Todo>> {
        let mut inner = self.inner.lock().await;
        let user = user_mut(&mut inner, user_id)?;
        user.todos.push(todo.clone());
        Ok(user.todos.clone())
    }

    async fn pull_todo(&self, user_id: &str, todo_id: &str) -> StoreResult<Vec<Todo>> {
        let mut inner = self.inner.lock().await;
        let user = user_mut(&mut inner, user_id)?;
        user.todos.retain(|t| t.id != todo_id);
        Ok(user.todos.clone())
    }

    async fn set_todo_completed(
        &self,
        user_id: &str,
        index: usize,
        completed: bool,
    ) -> StoreResult<Option<Vec<Todo>>> {
        let mut inner = self.inner.lock().await;
        let user = user_mut(&mut inner, user_id)?;
        match user.todos.get_mut(index) {
            Some(todo) => {
                todo.completed = completed;
                Ok(Some(user.todos.clone()))
            }
            None => Ok(None),
        }
    }
}
