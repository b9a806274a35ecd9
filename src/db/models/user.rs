//! User models and auth DTOs.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Public representation of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub logged_in_as: String,
}

impl User {
    pub async fn create(
        conn: &mut SqliteConnection,
        email: &str,
        password_hash: &str,
        is_active: bool,
    ) -> Result<User, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO users (email, password_hash, is_active) VALUES (?, ?, ?)")
                .bind(email)
                .bind(password_hash)
                .bind(is_active)
                .execute(&mut *conn)
                .await?;

        Self::get_by_id(conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, password_hash, is_active FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn get_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, password_hash, is_active FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(conn)
            .await
    }

    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, password_hash, is_active FROM users ORDER BY id")
            .fetch_all(conn)
            .await
    }

    /// Change a user's email. Returns `None` when no such user exists.
    pub async fn update_email(
        conn: &mut SqliteConnection,
        id: i64,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let user = User::create(&mut conn, "luke@tatooine.org", "hash", true)
            .await
            .unwrap();
        assert_eq!(user.email, "luke@tatooine.org");
        assert!(user.is_active);

        let by_email = User::get_by_email(&mut conn, "luke@tatooine.org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(User::get_by_id(&mut conn, user.id + 1).await.unwrap().is_none());
        assert!(User::get_by_email(&mut conn, "leia@alderaan.org")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_email_missing_user() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let updated = User::update_email(&mut conn, 99, "han@corellia.org")
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[test]
    fn test_response_drops_password_hash() {
        let user = User {
            id: 1,
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_active: false,
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "email": "a@b.com", "is_active": false}));
    }
}
