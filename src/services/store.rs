use async_trait::async_trait;
use crate::errors::StoreResult;
use crate::models::{Todo, User};

/// Persistence for user documents and their embedded todo lists.
///
/// Every method is atomic with respect to a single user. Mutations return
/// the full todo list as it stands after the change.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user, failing with `DuplicateUsername` if the name is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, user_id: &str) -> StoreResult<Option<User>>;

    /// All users in registration order.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Appends a todo. `UserNotFound` if the user does not exist.
    async fn push_todo(&self, user_id: &str, todo: &Todo) -> StoreResult<Vec<Todo>>;

    /// Removes the todo with `todo_id`; leaves the list untouched when absent.
    async fn pull_todo(&self, user_id: &str, todo_id: &str) -> StoreResult<Vec<Todo>>;

    /// Sets `completed` on the todo at `index`. Returns `Ok(None)` when the
    /// index is past the end of the list.
    async fn set_todo_completed(
        &self,
        user_id: &str,
        index: usize,
        completed: bool,
    ) -> StoreResult<Option<Vec<Todo>>>;
}
