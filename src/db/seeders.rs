//! Database seeders for built-in catalog data
//!
//! Populates the characters and planets tables with a small starter catalog
//! so a fresh install has something to favorite.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use super::{Character, CreateCharacterRequest, CreatePlanetRequest, Planet};

/// Seed the starter catalog. Each table is only seeded when it is empty, so
/// this is safe to run on every startup.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    if Character::count(&mut tx).await? == 0 {
        info!("Seeding built-in characters...");
        // Format: (name, birth_year, gender, height, skin_color, eye_color)
        let characters: Vec<(&str, i64, &str, i64, &str, &str)> = vec![
            ("Luke Skywalker", 19, "male", 172, "fair", "blue"),
            ("Leia Organa", 19, "female", 150, "light", "brown"),
            ("Han Solo", 29, "male", 180, "fair", "brown"),
            ("Obi-Wan Kenobi", 57, "male", 182, "fair", "blue-gray"),
            ("Yoda", 896, "male", 66, "green", "brown"),
        ];
        for (name, birth_year, gender, height, skin_color, eye_color) in characters {
            let req = CreateCharacterRequest {
                name: Some(name.to_string()),
                birth_year: Some(birth_year),
                gender: Some(gender.to_string()),
                height: Some(height),
                skin_color: Some(skin_color.to_string()),
                eye_color: Some(eye_color.to_string()),
            };
            Character::create(&mut tx, &req).await?;
        }
    }

    if Planet::count(&mut tx).await? == 0 {
        info!("Seeding built-in planets...");
        // Format: (name, climate, population, orbital_period, rotation_period, diameter)
        let planets: Vec<(&str, &str, i64, i64, i64, i64)> = vec![
            ("Tatooine", "arid", 200_000, 304, 23, 10_465),
            ("Alderaan", "temperate", 2_000_000_000, 364, 24, 12_500),
            ("Hoth", "frozen", 0, 549, 23, 7_200),
            ("Dagobah", "murky", 0, 341, 23, 8_900),
            ("Naboo", "temperate", 4_500_000_000, 312, 26, 12_120),
        ];
        for (name, climate, population, orbital_period, rotation_period, diameter) in planets {
            let req = CreatePlanetRequest {
                name: Some(name.to_string()),
                climate: Some(climate.to_string()),
                population: Some(population),
                orbital_period: Some(orbital_period),
                rotation_period: Some(rotation_period),
                diameter: Some(diameter),
            };
            Planet::create(&mut tx, &req).await?;
        }
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = memory_pool().await;
        seed_catalog(&pool).await.unwrap();
        seed_catalog(&pool).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(Character::count(&mut conn).await.unwrap(), 5);
        assert_eq!(Planet::count(&mut conn).await.unwrap(), 5);

        let first = Character::get_by_id(&mut conn, 1).await.unwrap().unwrap();
        assert_eq!(first.name.as_deref(), Some("Luke Skywalker"));
    }
}
