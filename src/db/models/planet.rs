//! Planet catalog model.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: Option<String>,
    pub climate: Option<String>,
    pub population: Option<i64>,
    pub orbital_period: Option<i64>,
    pub rotation_period: Option<i64>,
    pub diameter: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePlanetRequest {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub population: Option<i64>,
    pub orbital_period: Option<i64>,
    pub rotation_period: Option<i64>,
    pub diameter: Option<i64>,
}

const COLUMNS: &str = "id, name, climate, population, orbital_period, rotation_period, diameter";

impl Planet {
    pub async fn create(
        conn: &mut SqliteConnection,
        req: &CreatePlanetRequest,
    ) -> Result<Planet, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO planets (name, climate, population, orbital_period, rotation_period, diameter)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&req.climate)
        .bind(req.population)
        .bind(req.orbital_period)
        .bind(req.rotation_period)
        .bind(req.diameter)
        .execute(&mut *conn)
        .await?;

        Self::get_by_id(conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_by_id(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Planet>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM planets WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Planet>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM planets ORDER BY id", COLUMNS))
            .fetch_all(conn)
            .await
    }

    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM planets WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM planets")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
