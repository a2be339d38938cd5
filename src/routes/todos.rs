use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    db::entities::todo,
    error::AppError,
    routes::response::{ApiResult, JsonResponse, MessageBody},
    services::{ServiceContext, TodoService},
    state::AppState,
};

const DELETED_MESSAGE: &str = "Todo deleted successfully";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    pub title: String,
    pub description: String,
    pub date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub todo: TodoResponse,
}

#[derive(Debug, Serialize)]
pub struct TodoListBody {
    pub todos: Vec<TodoResponse>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(State(state): State<Arc<AppState>>) -> ApiResult<TodoListBody> {
    let todos = todo_service_from_state(state.as_ref()).list_all().await?;
    JsonResponse::ok(TodoListBody {
        todos: todos.into_iter().map(TodoResponse::from).collect(),
    })
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TodoBody> {
    let body = json_body(payload)?;
    let todo = todo_service_from_state(state.as_ref()).create(body).await?;
    JsonResponse::with_status(StatusCode::CREATED, TodoBody { todo: todo.into() })
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TodoBody> {
    let todo = todo_service_from_state(state.as_ref()).get_by_id(&id).await?;
    JsonResponse::ok(TodoBody { todo: todo.into() })
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TodoBody> {
    let body = json_body(payload)?;
    let todo = todo_service_from_state(state.as_ref())
        .update_by_id(&id, body)
        .await?;
    JsonResponse::ok(TodoBody { todo: todo.into() })
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<MessageBody> {
    todo_service_from_state(state.as_ref())
        .delete_by_id(&id)
        .await?;
    JsonResponse::ok(MessageBody::new(DELETED_MESSAGE))
}

/// A request without a JSON content type carries no fields, so it reads as
/// `{}`. A JSON body that fails to parse is reported like any other failed
/// write: a 500 carrying the parser's message.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Map::new())),
        Err(rejection) => Err(AppError::internal(rejection.body_text())),
    }
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            title: model.title,
            description: model.description,
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn todo_service_from_state(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}
