//! User and profile service
//!
//! Accounts carry no credentials; a profile holds the body metrics the
//! daily targets are derived from.

use crate::error::ApiError;
use crate::repositories::FitnessStore;
use fitforge_shared::health_metrics::{
    calculate_bmi_result, calculate_macro_targets, ActivityLevel, BiologicalSex, Goal, HealthProfile,
};
use fitforge_shared::models::UserProfile;
use fitforge_shared::types::{CreateUserRequest, ProfileResponse, UpdateProfileRequest, UserResponse};
use fitforge_shared::validation::{
    labeled, validate_age, validate_email, validate_gender, validate_height_cm, validate_weight,
};
use tracing::info;
use validator::Validate;

/// Service for user and profile operations
pub struct ProfileService;

impl ProfileService {
    /// Register a user by email
    pub async fn create_user(store: &dyn FitnessStore, req: CreateUserRequest) -> Result<UserResponse, ApiError> {
        req.validate()?;
        let email = req.email.trim().to_string();
        labeled("email", validate_email(&email))?;

        let user = store.create_user(&email).await?;
        info!(user_id = user.id, "User created");

        Ok(UserResponse {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        })
    }

    /// Profile with derived BMI and daily targets
    pub async fn get_profile(store: &dyn FitnessStore, user_id: i64) -> Result<ProfileResponse, ApiError> {
        Self::require_user(store, user_id).await?;

        let profile = store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile for user {} not found", user_id)))?;

        Ok(Self::to_response(profile))
    }

    /// Create or replace a profile
    pub async fn update_profile(
        store: &dyn FitnessStore,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        labeled("age", validate_age(req.age))?;
        labeled("weight_kg", validate_weight(req.weight_kg))?;
        labeled("height_cm", validate_height_cm(req.height_cm))?;
        labeled("gender", validate_gender(&req.gender))?;
        let activity_level: ActivityLevel = req.activity_level.parse()?;
        let goal: Goal = req.goal.parse()?;

        Self::require_user(store, user_id).await?;

        let saved = store
            .upsert_profile(&UserProfile {
                user_id,
                age: req.age,
                weight_kg: req.weight_kg,
                height_cm: req.height_cm,
                gender: req.gender.trim().to_string(),
                activity_level,
                goal,
            })
            .await?;
        info!(user_id, "Profile saved");

        Ok(Self::to_response(saved))
    }

    async fn require_user(store: &dyn FitnessStore, user_id: i64) -> Result<(), ApiError> {
        match store.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(format!("User {} not found", user_id))),
        }
    }

    fn to_response(profile: UserProfile) -> ProfileResponse {
        let health = HealthProfile {
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            age_years: profile.age,
            sex: BiologicalSex::from_gender(&profile.gender),
            activity_level: profile.activity_level,
            goal: profile.goal,
        };

        ProfileResponse {
            bmi: calculate_bmi_result(profile.weight_kg, profile.height_cm),
            daily_targets: calculate_macro_targets(&health),
            user_id: profile.user_id,
            age: profile.age,
            weight_kg: profile.weight_kg,
            height_cm: profile.height_cm,
            gender: profile.gender,
            activity_level: profile.activity_level,
            goal: profile.goal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn profile_request() -> UpdateProfileRequest {
        UpdateProfileRequest {
            age: 30,
            weight_kg: 80.0,
            height_cm: 180.0,
            gender: "male".to_string(),
            activity_level: "moderately_active".to_string(),
            goal: "lose_fat".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_and_profile() {
        let store = MemoryStore::new();
        let email: String = SafeEmail().fake();
        let user = ProfileService::create_user(&store, CreateUserRequest { email: email.clone() })
            .await
            .unwrap();
        assert_eq!(user.email, email);

        let profile = ProfileService::update_profile(&store, user.id, profile_request())
            .await
            .unwrap();
        assert_eq!(profile.daily_targets.calories, 2259);
        assert_eq!(profile.bmi.value, 24.7);

        let fetched = ProfileService::get_profile(&store, user.id).await.unwrap();
        assert_eq!(fetched.goal, Goal::LoseFat);
    }

    #[tokio::test]
    async fn test_rejects_invalid_email() {
        let store = MemoryStore::new();
        let result = ProfileService::create_user(
            &store,
            CreateUserRequest {
                email: "not-an-email".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_rejects_unknown_activity_level() {
        let store = MemoryStore::with_catalogue();
        let req = UpdateProfileRequest {
            activity_level: "couch_potato".to_string(),
            ..profile_request()
        };
        let result = ProfileService::update_profile(&store, 1, req).await;
        match result {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("activity_level")),
            other => panic!("unexpected {:?}", other.map(|p| p.user_id)),
        }
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_weight() {
        let store = MemoryStore::with_catalogue();
        let req = UpdateProfileRequest {
            weight_kg: 5.0,
            ..profile_request()
        };
        let result = ProfileService::update_profile(&store, 1, req).await;
        match result {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("Current Weight")),
            other => panic!("unexpected {:?}", other.map(|p| p.user_id)),
        }
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let store = MemoryStore::with_catalogue();
        let result = ProfileService::get_profile(&store, 1).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_for_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let result = ProfileService::update_profile(&store, 42, profile_request()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
