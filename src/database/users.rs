use sqlx::PgPool;

use crate::database::manager::StoreError;
use crate::database::models::User;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already bcrypt-hashed by the caller
    pub password: String,
}

/// User creation. Users are only ever written at registration; removal is an
/// administrative action outside this API.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
