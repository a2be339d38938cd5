use sea_orm::DbErr;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::dao::{DaoLayerError, TodoDao},
    db::entities::todo,
    validation::{TodoFields, ValidationError, validate_for_write},
};

/// Failure kinds of the todo operations. Handlers must map every kind.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Todo not found")]
    NotFound,
    #[error("invalid todo id \"{0}\"")]
    InvalidIdentifier(String),
    #[error("{0}")]
    Storage(#[source] DbErr),
}

impl From<DaoLayerError> for TodoError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => TodoError::NotFound,
            DaoLayerError::Db(err) => TodoError::Storage(err),
        }
    }
}

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn list_all(&self) -> Result<Vec<todo::Model>, TodoError> {
        Ok(self.todo_dao.list_todos().await?)
    }

    pub async fn create(&self, body: Value) -> Result<todo::Model, TodoError> {
        let fields = TodoFields::from_json(body)?;
        let new_todo = validate_for_write(fields)?;
        Ok(self.todo_dao.create_todo(new_todo).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<todo::Model, TodoError> {
        let id = parse_id(id)?;
        Ok(self.todo_dao.find_todo(&id).await?)
    }

    /// Applies a partial update. The body is cast and checked before the
    /// record is looked up, so a rejected update never reaches storage.
    pub async fn update_by_id(&self, id: &str, body: Value) -> Result<todo::Model, TodoError> {
        let id = parse_id(id)?;
        let changes = TodoFields::from_json(body)?;
        Ok(self.todo_dao.update_todo(&id, changes).await?)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), TodoError> {
        let id = parse_id(id)?;
        self.todo_dao.delete_todo(&id).await?;
        Ok(())
    }
}

fn parse_id(id: &str) -> Result<Uuid, TodoError> {
    Uuid::parse_str(id.trim()).map_err(|_| TodoError::InvalidIdentifier(id.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use serde_json::json;
    use uuid::Uuid;

    use super::{TodoError, TodoService};
    use crate::db::dao::{DaoBase, TodoDao};
    use crate::db::entities::todo;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn todo_model(id: Uuid) -> todo::Model {
        todo::Model {
            id,
            created_at: ts(),
            updated_at: ts(),
            content: "buy milk".to_string(),
            title: "errand".to_string(),
            description: "from store".to_string(),
            date: ts(),
        }
    }

    fn service(db: MockDatabase) -> TodoService {
        TodoService::new(TodoDao::new(&db.into_connection()))
    }

    fn empty_db() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    #[tokio::test]
    async fn create_rejects_incomplete_body_before_storage() {
        // the mock has no queued results, so any storage call would error
        let err = service(empty_db())
            .create(json!({ "content": "buy milk" }))
            .await
            .expect_err("create should fail");

        match err {
            TodoError::Validation(err) => {
                assert_eq!(
                    err.fields().collect::<Vec<_>>(),
                    vec!["title", "description", "date"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_returns_stored_record() {
        let id = Uuid::new_v4();
        let db = empty_db().append_query_results([[todo_model(id)]]);

        let created = service(db)
            .create(json!({
                "content": "buy milk",
                "title": "errand",
                "description": "from store",
                "date": "2024-01-01"
            }))
            .await
            .expect("create should succeed");

        assert_eq!(created.id, id);
        assert_eq!(created.content, "buy milk");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_without_storage() {
        let service = service(empty_db());

        let err = service
            .get_by_id("not-a-uuid")
            .await
            .expect_err("lookup should fail");
        assert!(matches!(err, TodoError::InvalidIdentifier(ref id) if id == "not-a-uuid"));

        let err = service
            .delete_by_id("42")
            .await
            .expect_err("delete should fail");
        assert!(matches!(err, TodoError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let db = empty_db().append_query_results([Vec::<todo::Model>::new()]);

        let err = service(db)
            .get_by_id(&Uuid::new_v4().to_string())
            .await
            .expect_err("lookup should fail");
        assert!(matches!(err, TodoError::NotFound));
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[tokio::test]
    async fn update_with_invalid_field_skips_storage() {
        let err = service(empty_db())
            .update_by_id(&Uuid::new_v4().to_string(), json!({ "date": "someday" }))
            .await
            .expect_err("update should fail");
        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_of_missing_record_is_not_found() {
        let db = empty_db().append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }]);

        let err = service(db)
            .delete_by_id(&Uuid::new_v4().to_string())
            .await
            .expect_err("delete should fail");
        assert!(matches!(err, TodoError::NotFound));
    }

    #[tokio::test]
    async fn storage_failures_keep_driver_message() {
        let db = empty_db().append_query_errors([DbErr::Custom("connection reset".to_string())]);

        let err = service(db).list_all().await.expect_err("list should fail");
        assert!(matches!(err, TodoError::Storage(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
