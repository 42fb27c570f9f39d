use sqlx::PgPool;

use crate::database::manager::StoreError;
use crate::database::models::Todo;
use crate::database::repository::Repository;

/// Fields accepted when creating a todo. All three are required and already
/// validated by the time they reach the store.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Typed CRUD over the todos table
pub struct TodoStore {
    repo: Repository<Todo>,
    pool: PgPool,
}

impl TodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { repo: Repository::new("todos", pool.clone()), pool }
    }

    pub async fn list_latest(&self) -> Result<Vec<Todo>, StoreError> {
        self.repo.list_latest().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        self.repo.find_by_id(id).await
    }

    pub async fn create(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, description, completed) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    /// Last-write-wins in-place update; there is no version check
    pub async fn update(&self, current: &Todo, changes: TodoChanges) -> Result<Todo, StoreError> {
        let title = changes.title.unwrap_or_else(|| current.title.clone());
        let description = changes.description.unwrap_or_else(|| current.description.clone());
        let completed = changes.completed.unwrap_or(current.completed);

        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET title = $1, description = $2, completed = $3, updated_at = now() \
             WHERE id = $4 RETURNING *",
        )
        .bind(&title)
        .bind(&description)
        .bind(completed)
        .bind(current.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    pub async fn delete(&self, todo: &Todo) -> Result<(), StoreError> {
        let deleted = self.repo.delete_by_id(todo.id).await?;
        if deleted == 0 {
            // Row vanished between lookup and delete
            return Err(StoreError::QueryError(format!("todo {} no longer exists", todo.id)));
        }
        Ok(())
    }
}
