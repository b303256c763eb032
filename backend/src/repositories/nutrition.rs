//! Food catalogue repository for database operations

use fitforge_shared::models::Food;
use sqlx::PgConnection;

/// Food record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: i64,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_g_per_100g: f64,
    pub carbs_g_per_100g: f64,
    pub fat_g_per_100g: f64,
}

impl From<FoodRecord> for Food {
    fn from(r: FoodRecord) -> Self {
        Food {
            id: r.id,
            name: r.name,
            calories_per_100g: r.calories_per_100g,
            protein_g_per_100g: r.protein_g_per_100g,
            carbs_g_per_100g: r.carbs_g_per_100g,
            fat_g_per_100g: r.fat_g_per_100g,
        }
    }
}

/// Input for seeding a food
#[derive(Debug, Clone)]
pub struct CreateFood<'a> {
    pub name: &'a str,
    pub calories_per_100g: f64,
    pub protein_g_per_100g: f64,
    pub carbs_g_per_100g: f64,
    pub fat_g_per_100g: f64,
}

/// Food repository
pub struct FoodRepository;

impl FoodRepository {
    /// Insert a food unless one with the same name exists
    pub async fn insert_if_missing(conn: &mut PgConnection, food: CreateFood<'_>) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO foods (name, calories_per_100g, protein_g_per_100g, carbs_g_per_100g, fat_g_per_100g)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(food.name)
        .bind(food.calories_per_100g)
        .bind(food.protein_g_per_100g)
        .bind(food.carbs_g_per_100g)
        .bind(food.fat_g_per_100g)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// First food (in catalogue order) whose name contains the fragment, ignoring case
    pub async fn find_by_name_fragment(conn: &mut PgConnection, fragment: &str) -> sqlx::Result<Option<FoodRecord>> {
        sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, calories_per_100g, protein_g_per_100g, carbs_g_per_100g, fat_g_per_100g
            FROM foods
            WHERE POSITION(LOWER($1) IN LOWER(name)) > 0
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(fragment)
        .fetch_optional(conn)
        .await
    }
}
