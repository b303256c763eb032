//! Reference catalogue and seeding
//!
//! The exercise library and food table the coach draws on. Seeding is
//! idempotent: rows whose name already exists are skipped.

use crate::repositories::nutrition::CreateFood;
use crate::repositories::{ExerciseRepository, FoodRepository, UserRepository};
use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

/// Library exercise
#[derive(Debug, Clone, Copy)]
pub struct SeedExercise {
    pub name: &'static str,
    pub target_muscle: &'static str,
    pub equipment: &'static str,
}

/// Food with macros per 100 g
#[derive(Debug, Clone, Copy)]
pub struct SeedFood {
    pub name: &'static str,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Account the demo conversations log against
pub const DEMO_USER_EMAIL: &str = "demo@fitforge.local";

const fn exercise(name: &'static str, target_muscle: &'static str, equipment: &'static str) -> SeedExercise {
    SeedExercise {
        name,
        target_muscle,
        equipment,
    }
}

const fn food(name: &'static str, calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> SeedFood {
    SeedFood {
        name,
        calories,
        protein_g,
        carbs_g,
        fat_g,
    }
}

pub const EXERCISES: &[SeedExercise] = &[
    // Chest
    exercise("Barbell Bench Press", "Chest", "Barbell, Bench"),
    exercise("Dumbbell Bench Press", "Chest", "Dumbbells, Bench"),
    exercise("Incline Dumbbell Press", "Chest", "Dumbbells, Bench"),
    exercise("Push-up", "Chest", "Bodyweight"),
    exercise("Cable Crossover", "Chest", "Cable Machine"),
    // Back
    exercise("Pull-up", "Back", "Pull-up Bar"),
    exercise("Chin-up", "Back", "Pull-up Bar"),
    exercise("Barbell Row", "Back", "Barbell"),
    exercise("Dumbbell Row", "Back", "Dumbbell, Bench"),
    exercise("Lat Pulldown", "Back", "Cable Machine"),
    exercise("Deadlift", "Back", "Barbell"),
    // Legs
    exercise("Barbell Squat", "Legs", "Barbell, Squat Rack"),
    exercise("Dumbbell Lunge", "Legs", "Dumbbells"),
    exercise("Leg Press", "Legs", "Leg Press Machine"),
    exercise("Romanian Deadlift", "Legs", "Barbell"),
    exercise("Goblet Squat", "Legs", "Dumbbell"),
    exercise("Calf Raise", "Legs", "Bodyweight"),
    // Shoulders
    exercise("Overhead Press", "Shoulders", "Barbell"),
    exercise("Dumbbell Shoulder Press", "Shoulders", "Dumbbells"),
    exercise("Dumbbell Lateral Raise", "Shoulders", "Dumbbells"),
    exercise("Face Pull", "Shoulders", "Cable Machine"),
    // Biceps
    exercise("Barbell Curl", "Biceps", "Barbell"),
    exercise("Dumbbell Hammer Curl", "Biceps", "Dumbbells"),
    exercise("Preacher Curl", "Biceps", "Dumbbell, Bench"),
    // Triceps
    exercise("Tricep Pushdown", "Triceps", "Cable Machine"),
    exercise("Skull Crusher", "Triceps", "Barbell, Bench"),
    exercise("Diamond Push-up", "Triceps", "Bodyweight"),
    // Core
    exercise("Plank", "Core", "Bodyweight"),
    exercise("Hanging Leg Raise", "Core", "Pull-up Bar"),
    exercise("Cable Crunch", "Core", "Cable Machine"),
    // Cardio
    exercise("Treadmill Running", "Cardio", "Treadmill"),
    exercise("Cycling", "Cardio", "Stationary Bike"),
    exercise("Rowing", "Cardio", "Rowing Machine"),
];

pub const FOODS: &[SeedFood] = &[
    // Proteins
    food("Chicken Breast (Cooked)", 165.0, 31.0, 0.0, 3.6),
    food("Salmon (Cooked)", 206.0, 22.0, 0.0, 13.0),
    food("Ground Beef 90/10 (Cooked)", 217.0, 26.0, 0.0, 12.0),
    food("Tuna (Canned in water)", 116.0, 26.0, 0.0, 1.0),
    food("Egg (Large)", 155.0, 13.0, 1.1, 11.0),
    food("Greek Yogurt (Plain, Non-fat)", 59.0, 10.0, 3.6, 0.4),
    food("Tofu (Firm)", 76.0, 8.0, 1.9, 4.8),
    food("Lentils (Cooked)", 116.0, 9.0, 20.0, 0.4),
    // Carbohydrates
    food("White Rice (Cooked)", 130.0, 2.7, 28.0, 0.3),
    food("Brown Rice (Cooked)", 123.0, 2.6, 26.0, 0.9),
    food("Quinoa (Cooked)", 120.0, 4.4, 21.0, 1.9),
    food("Oats (Dry)", 389.0, 16.9, 66.3, 6.9),
    food("Sweet Potato (Cooked)", 86.0, 1.6, 20.0, 0.1),
    food("Potato (Cooked)", 87.0, 1.9, 20.0, 0.1),
    food("Whole Wheat Bread", 247.0, 13.0, 41.0, 3.4),
    // Fats
    food("Olive Oil", 884.0, 0.0, 0.0, 100.0),
    food("Avocado", 160.0, 2.0, 9.0, 15.0),
    food("Almonds", 579.0, 21.0, 22.0, 49.0),
    food("Peanut Butter", 588.0, 25.0, 20.0, 50.0),
    // Fruits and vegetables
    food("Broccoli (Raw)", 34.0, 2.8, 7.0, 0.4),
    food("Spinach (Raw)", 23.0, 2.9, 3.6, 0.4),
    food("Apple", 52.0, 0.3, 14.0, 0.2),
    food("Banana", 89.0, 1.1, 23.0, 0.3),
];

/// Rows written by a seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub exercises: u64,
    pub foods: u64,
    pub users: u64,
}

/// Seed the exercise library, food table and demo user.
///
/// With `reset`, all catalogue, user and log tables are truncated first.
pub async fn seed_catalogue(pool: &PgPool, reset: bool) -> Result<SeedReport> {
    let mut tx = pool.begin().await?;

    if reset {
        info!("Resetting catalogue, users and logs");
        sqlx::query(
            r#"
            TRUNCATE workout_logs, weight_logs, user_profiles, users, exercises, foods
            RESTART IDENTITY CASCADE
            "#,
        )
        .execute(&mut *tx)
        .await?;
    }

    let mut report = SeedReport::default();

    for e in EXERCISES {
        if ExerciseRepository::insert_if_missing(&mut *tx, e.name, e.target_muscle, e.equipment).await? {
            report.exercises += 1;
        }
    }

    for f in FOODS {
        let created = FoodRepository::insert_if_missing(
            &mut *tx,
            CreateFood {
                name: f.name,
                calories_per_100g: f.calories,
                protein_g_per_100g: f.protein_g,
                carbs_g_per_100g: f.carbs_g,
                fat_g_per_100g: f.fat_g,
            },
        )
        .await?;
        if created {
            report.foods += 1;
        }
    }

    if UserRepository::insert_if_missing(&mut *tx, DEMO_USER_EMAIL).await? {
        report.users += 1;
    }

    tx.commit().await?;

    info!(
        exercises = report.exercises,
        foods = report.foods,
        users = report.users,
        "Seeding complete"
    );

    Ok(report)
}
