//! Character catalog model.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: Option<String>,
    pub birth_year: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<i64>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
}

/// Every attribute is optional; an empty object creates a blank character.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCharacterRequest {
    pub name: Option<String>,
    pub birth_year: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<i64>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
}

const COLUMNS: &str = "id, name, birth_year, gender, height, skin_color, eye_color";

impl Character {
    pub async fn create(
        conn: &mut SqliteConnection,
        req: &CreateCharacterRequest,
    ) -> Result<Character, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO characters (name, birth_year, gender, height, skin_color, eye_color)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(req.birth_year)
        .bind(&req.gender)
        .bind(req.height)
        .bind(&req.skin_color)
        .bind(&req.eye_color)
        .execute(&mut *conn)
        .await?;

        Self::get_by_id(conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Character>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM characters WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Character>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM characters ORDER BY id", COLUMNS))
            .fetch_all(conn)
            .await
    }

    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM characters WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM characters")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
