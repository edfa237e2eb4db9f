mod auth;
mod todo;
mod users;

pub use auth::{handle_register, handle_login};
pub use todo::{add_todo, remove_todo, update_todo, list_tasks};
pub use users::{list_users, delete_all, health};
