use std::sync::Arc;
use tokio::sync::OnceCell;
use crate::errors::{AppError, AppResult};
use crate::models::{PublicUser, Todo, User};
use super::password::PasswordService;
use super::store::UserStore;

/// Account and todo operations on top of a [`UserStore`].
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn UserStore>,
    passwords: PasswordService,
    // Checked on logins for unknown usernames; created on first use
    dummy_hash: Arc<OnceCell<String>>,
}

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

impl CredentialStore {
    pub fn new(store: Arc<dyn UserStore>, passwords: PasswordService) -> Self {
        Self {
            store,
            passwords,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates an account and returns its id.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<String> {
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;

        let password_hash = self.passwords.hash(password.to_string()).await?;
        let user = User::new(username.to_string(), password_hash);
        self.store.insert_user(&user).await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(user.id)
    }

    /// Checks a username/password pair and returns the user id on success.
    pub async fn verify_login(&self, username: &str, password: &str) -> AppResult<String> {
        let Some(user) = self.store.find_by_username(username).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| self.passwords.hash("unknown-user".to_string()))
                .await?;
            self.passwords.verify(password.to_string(), dummy.clone()).await?;
            return Err(AppError::UnknownUser(username.to_string()));
        };

        if self.passwords.verify(password.to_string(), user.password_hash).await? {
            Ok(user.id)
        } else {
            Err(AppError::BadPassword(username.to_string()))
        }
    }

    pub async fn add_task(
        &self,
        user_id: &str,
        description: &str,
        completed: bool,
    ) -> AppResult<Vec<Todo>> {
        require_non_empty("task", description)?;
        let todo = Todo::new(description.to_string(), completed);
        tracing::debug!("Adding todo {} for user {}", todo.id, user_id);
        Ok(self.store.push_todo(user_id, &todo).await?)
    }

    /// Removing an id that is not in the list is not an error.
    pub async fn remove_task(&self, user_id: &str, todo_id: &str) -> AppResult<Vec<Todo>> {
        tracing::debug!("Removing todo {} for user {}", todo_id, user_id);
        Ok(self.store.pull_todo(user_id, todo_id).await?)
    }

    /// Updates by position, not by id. An index read by the client before a
    /// concurrent removal may now name a different todo.
    pub async fn update_task_completion(
        &self,
        user_id: &str,
        index: usize,
        completed: bool,
    ) -> AppResult<Vec<Todo>> {
        self.store
            .set_todo_completed(user_id, index, completed)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("todo at index {}", index)))
    }

    pub async fn list_tasks(&self, user_id: &str) -> AppResult<Vec<Todo>> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(|user| user.todos)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))
    }

    pub async fn list_all_users(&self) -> AppResult<Vec<PublicUser>> {
        Ok(self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(PublicUser::from)
            .collect())
    }
}
