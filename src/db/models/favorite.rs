//! Favorites: join records linking a user to a character and/or a planet.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub characters_id: Option<i64>,
    pub planets_id: Option<i64>,
}

/// Public representation of a favorite.
///
/// `characters` and `planets` carry the referenced entity's name, resolved at
/// read time. A null reference and a reference to a row that no longer exists
/// both come out as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FavoriteResponse {
    pub id: i64,
    pub characters: Option<String>,
    pub planets: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFavoriteRequest {
    pub characters_id: Option<i64>,
    pub planets_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteFavoriteRequest {
    pub characters_id: Option<i64>,
    pub planets_id: Option<i64>,
}

/// The catalog entry a favorite is matched on when deleting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Character(i64),
    Planet(i64),
}

impl FavoriteTarget {
    fn column(&self) -> &'static str {
        match self {
            FavoriteTarget::Character(_) => "characters_id",
            FavoriteTarget::Planet(_) => "planets_id",
        }
    }

    fn id(&self) -> i64 {
        match self {
            FavoriteTarget::Character(id) | FavoriteTarget::Planet(id) => *id,
        }
    }
}

impl DeleteFavoriteRequest {
    /// Exactly one of `characters_id` / `planets_id` must be set.
    pub fn target(&self) -> Result<FavoriteTarget, &'static str> {
        match (self.characters_id, self.planets_id) {
            (Some(id), None) => Ok(FavoriteTarget::Character(id)),
            (None, Some(id)) => Ok(FavoriteTarget::Planet(id)),
            (Some(_), Some(_)) => Err("Specify only one of characters_id or planets_id"),
            (None, None) => Err("One of characters_id or planets_id is required"),
        }
    }
}

const VIEW_SELECT: &str = r#"
    SELECT f.id AS id, c.name AS characters, p.name AS planets, f.user_id AS user_id
    FROM favorites f
    LEFT JOIN characters c ON c.id = f.characters_id
    LEFT JOIN planets p ON p.id = f.planets_id
"#;

impl Favorite {
    pub async fn create(
        conn: &mut SqliteConnection,
        user_id: i64,
        characters_id: Option<i64>,
        planets_id: Option<i64>,
    ) -> Result<FavoriteResponse, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, characters_id, planets_id) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(characters_id)
        .bind(planets_id)
        .execute(&mut *conn)
        .await?;

        Self::get_response(conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get_response(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<FavoriteResponse>, sqlx::Error> {
        sqlx::query_as(&format!("{} WHERE f.id = ?", VIEW_SELECT))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Vec<FavoriteResponse>, sqlx::Error> {
        sqlx::query_as(&format!("{} WHERE f.user_id = ? ORDER BY f.id", VIEW_SELECT))
            .bind(user_id)
            .fetch_all(conn)
            .await
    }

    /// Find the oldest favorite of `user_id` pointing at `target`.
    pub async fn find_for_user(
        conn: &mut SqliteConnection,
        user_id: i64,
        target: FavoriteTarget,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        let sql = format!(
            "SELECT id, user_id, characters_id, planets_id FROM favorites \
             WHERE user_id = ? AND {} = ? ORDER BY id LIMIT 1",
            target.column()
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .bind(target.id())
            .fetch_optional(conn)
            .await
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, Character, CreateCharacterRequest, User};

    #[test]
    fn test_delete_target_requires_exactly_one() {
        let character = DeleteFavoriteRequest {
            characters_id: Some(5),
            planets_id: None,
        };
        assert_eq!(character.target(), Ok(FavoriteTarget::Character(5)));

        let planet = DeleteFavoriteRequest {
            characters_id: None,
            planets_id: Some(7),
        };
        assert_eq!(planet.target(), Ok(FavoriteTarget::Planet(7)));

        assert!(DeleteFavoriteRequest::default().target().is_err());
        assert!(DeleteFavoriteRequest {
            characters_id: Some(1),
            planets_id: Some(2),
        }
        .target()
        .is_err());
    }

    #[tokio::test]
    async fn test_response_resolves_names() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let user = User::create(&mut conn, "rey@jakku.net", "hash", true).await.unwrap();
        let bb8 = Character::create(
            &mut conn,
            &CreateCharacterRequest {
                name: Some("BB-8".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let favorite = Favorite::create(&mut conn, user.id, Some(bb8.id), None)
            .await
            .unwrap();
        assert_eq!(favorite.characters.as_deref(), Some("BB-8"));
        assert!(favorite.planets.is_none());
        assert_eq!(favorite.user_id, user.id);

        // Dangling reference serializes as null instead of failing
        let dangling = Favorite::create(&mut conn, user.id, None, Some(404)).await.unwrap();
        assert!(dangling.planets.is_none());

        let all = Favorite::list_for_user(&mut conn, user.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, favorite.id);
    }

    #[tokio::test]
    async fn test_find_for_user_matches_owner_and_column() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let a = User::create(&mut conn, "a@b.com", "hash", true).await.unwrap();
        let b = User::create(&mut conn, "c@d.com", "hash", true).await.unwrap();
        Favorite::create(&mut conn, b.id, None, Some(7)).await.unwrap();
        Favorite::create(&mut conn, a.id, Some(7), None).await.unwrap();

        let none = Favorite::find_for_user(&mut conn, a.id, FavoriteTarget::Planet(7))
            .await
            .unwrap();
        assert!(none.is_none());

        let found = Favorite::find_for_user(&mut conn, a.id, FavoriteTarget::Character(7))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, a.id);
        assert_eq!(found.characters_id, Some(7));

        assert!(Favorite::delete(&mut conn, found.id).await.unwrap());
        assert!(!Favorite::delete(&mut conn, found.id).await.unwrap());
    }
}
