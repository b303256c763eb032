//! Prompt text for the coach

use fitforge_shared::types::{ChatMode, PlanRequest};

/// Persona the agent runs with
pub const COACH_INSTRUCTIONS: &str = "\
You are FitForge, a comprehensive AI fitness and nutrition coach. You can create workout and \
meal plans, log workouts and daily weight, calculate health metrics like BMI, look up exercises \
and food nutrition, track strength progress, and suggest exercise substitutions.

Always use the provided tools for calculations, lookups and logging instead of estimating. \
Exercise names passed to tools must match the exercise library exactly. \
If a tool reports that something was not found, tell the user and suggest an alternative.";

const DIET_PROMPT: &str = "\
You are FitForge, an expert diet and nutrition AI coach. Focus on calorie targets, \
macronutrients, food choices and meal planning. Use the nutrition and health calculation \
tools to ground every number you give.";

const EXERCISE_PROMPT: &str = "\
You are FitForge, an expert exercise and fitness AI coach. Focus on training programs, \
exercise selection, technique cues, progression and logging workouts. Use the exercise \
lookup, logging, progress and substitution tools whenever they apply.";

const COMBINED_PROMPT: &str = "\
You are FitForge, an expert fitness and nutrition AI coach. Help with both training and \
diet: plan workouts and meals, log progress, and answer questions using the available tools.";

/// System prompt for a chat mode
pub fn chat_system_prompt(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Diet => DIET_PROMPT,
        ChatMode::Exercise => EXERCISE_PROMPT,
        ChatMode::Both => COMBINED_PROMPT,
    }
}

/// User turn for a chat message: the mode prompt, optional user context,
/// then the message itself
pub fn chat_prompt(mode: ChatMode, user_id: Option<i64>, message: &str) -> String {
    let mut prompt = chat_system_prompt(mode).to_string();
    if let Some(id) = user_id {
        prompt.push_str(&format!(" The user's id for logging and progress tools is {}.", id));
    }
    format!("{}\n\nUser: {}", prompt, message)
}

/// Coaching brief for a one-shot plan
pub fn plan_prompt(request: &PlanRequest) -> String {
    let equipment = if request.available_equipment.is_empty() {
        "Bodyweight only".to_string()
    } else {
        request.available_equipment.join(", ")
    };

    format!(
        "Please act as an expert fitness and nutrition coach.
A new client has provided the following profile and needs a comprehensive fitness and meal plan.

**Client Profile:**
- **Goal:** {goal}
- **Experience / Activity Level:** {activity}
- **Workouts Per Week:** {days}
- **Available Equipment:** {equipment}
- **Age:** {age}
- **Gender:** {gender}
- **Weight:** {weight} kg
- **Height:** {height} cm

Your Task:
1.  First, calculate the user's daily energy and macronutrient needs.
2.  Based on those needs, create a detailed, sample one-day meal plan.
3.  Create a detailed, {days}-day workout plan tailored to their goal and equipment.
4.  Combine everything into a single, encouraging, and easy-to-read report.",
        goal = request.goal,
        activity = request.activity_level,
        days = request.days_per_week,
        equipment = equipment,
        age = request.age,
        gender = request.gender,
        weight = request.weight_kg,
        height = request.height_cm,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitforge_shared::health_metrics::{ActivityLevel, Goal};

    fn request(equipment: Vec<&str>) -> PlanRequest {
        PlanRequest {
            age: 30,
            weight_kg: 80.0,
            height_cm: 180.0,
            gender: "male".to_string(),
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::BuildMuscle,
            available_equipment: equipment.into_iter().map(String::from).collect(),
            days_per_week: 4,
        }
    }

    #[test]
    fn test_plan_prompt_profile_block() {
        let prompt = plan_prompt(&request(vec!["Barbell", "Bench"]));
        assert!(prompt.contains("- **Goal:** build_muscle"));
        assert!(prompt.contains("- **Experience / Activity Level:** moderately_active"));
        assert!(prompt.contains("- **Available Equipment:** Barbell, Bench"));
        assert!(prompt.contains("- **Weight:** 80 kg"));
        assert!(prompt.contains("3.  Create a detailed, 4-day workout plan"));
    }

    #[test]
    fn test_plan_prompt_bodyweight_only() {
        let prompt = plan_prompt(&request(vec![]));
        assert!(prompt.contains("- **Available Equipment:** Bodyweight only"));
    }

    #[test]
    fn test_chat_prompt_by_mode() {
        let diet = chat_prompt(ChatMode::Diet, None, "What should I eat?");
        assert!(diet.starts_with("You are FitForge, an expert diet and nutrition AI coach."));
        assert!(diet.ends_with("\n\nUser: What should I eat?"));

        let exercise = chat_prompt(ChatMode::Exercise, Some(7), "Log my squats");
        assert!(exercise.contains("exercise and fitness"));
        assert!(exercise.contains("is 7."));
    }
}
