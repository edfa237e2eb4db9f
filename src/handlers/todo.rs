use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use axum_extra::extract::WithRejection;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{AddTodoForm, RemoveTodoForm, Todo, TodosResponse, UpdateTodoForm};

pub async fn add_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(form), _): WithRejection<Json<AddTodoForm>, AppError>,
) -> AppResult<Json<TodosResponse>> {
    let todos = state
        .credentials
        .add_task(&user.user_id, &form.task, form.completed)
        .await?;
    Ok(Json(TodosResponse { todos }))
}

pub async fn remove_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(form), _): WithRejection<Json<RemoveTodoForm>, AppError>,
) -> AppResult<Json<TodosResponse>> {
    let todos = state
        .credentials
        .remove_task(&user.user_id, &form.todo_id)
        .await?;
    Ok(Json(TodosResponse { todos }))
}

/// `index` is the todo's position in the list, counted from zero.
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(index), _): WithRejection<Path<usize>, AppError>,
    WithRejection(Json(form), _): WithRejection<Json<UpdateTodoForm>, AppError>,
) -> AppResult<Json<TodosResponse>> {
    tracing::debug!("Setting todo {} of user {} to {}", index, user.user_id, form.completed);
    let todos = state
        .credentials
        .update_task_completion(&user.user_id, index, form.completed)
        .await?;
    Ok(Json(TodosResponse { todos }))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = state.credentials.list_tasks(&user.user_id).await?;
    Ok(Json(todos))
}
