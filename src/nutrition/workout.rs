//! Workout nutrition plans

use serde::{Deserialize, Serialize};

/// Workout types; unknown values read the strength training plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    StrengthTraining,
    Cardio,
    Endurance,
}

impl WorkoutType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "cardio" => WorkoutType::Cardio,
            "endurance" => WorkoutType::Endurance,
            _ => WorkoutType::StrengthTraining,
        }
    }
}

/// What to eat around one phase of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPhase {
    pub timing: String,
    pub foods: Vec<String>,
    pub calories: i64,
    pub protein: String,
    pub carbs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub pre_workout: WorkoutPhase,
    pub during_workout: WorkoutPhase,
    pub post_workout: WorkoutPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlans {
    pub strength_training: WorkoutPlan,
    pub cardio: WorkoutPlan,
    pub endurance: WorkoutPlan,
}

impl WorkoutPlans {
    pub fn get(&self, workout_type: WorkoutType) -> &WorkoutPlan {
        match workout_type {
            WorkoutType::StrengthTraining => &self.strength_training,
            WorkoutType::Cardio => &self.cardio,
            WorkoutType::Endurance => &self.endurance,
        }
    }
}
