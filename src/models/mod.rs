mod user;
mod forms;
mod todo;

pub use user::{User, PublicUser};
pub use forms::{
    CredentialsForm, AddTodoForm, RemoveTodoForm, UpdateTodoForm,
    TokenResponse, TodosResponse, MessageResponse,
};
pub use todo::Todo;
