use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Todo, todo};
use crate::validation::{NewTodo, TodoFields};

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TodoDao {
    pub async fn list_todos(&self) -> DaoResult<Vec<todo::Model>> {
        self.find_all().await
    }

    pub async fn create_todo(&self, todo: NewTodo) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            content: Set(todo.content),
            title: Set(todo.title),
            description: Set(todo.description),
            date: Set(todo.date),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_todo(&self, id: &Uuid) -> DaoResult<todo::Model> {
        self.find_by_id(*id).await
    }

    /// Overwrites only the fields present in `changes`.
    pub async fn update_todo(&self, id: &Uuid, changes: TodoFields) -> DaoResult<todo::Model> {
        self.update(*id, move |active| {
            let TodoFields {
                content,
                title,
                description,
                date,
            } = changes;
            if let Some(content) = content {
                active.content = Set(content);
            }
            if let Some(title) = title {
                active.title = Set(title);
            }
            if let Some(description) = description {
                active.description = Set(description);
            }
            if let Some(date) = date {
                active.date = Set(date);
            }
        })
        .await
    }

    pub async fn delete_todo(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }
}
