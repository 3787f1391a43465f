//! User profile types
//!
//! Profiles are built per request and never stored. Every enum here parses
//! leniently: unknown values resolve to a documented default instead of
//! failing.

use serde::{Deserialize, Serialize};

/// Gender as used by the BMR formula; anything but male uses the other constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Gender {
    Male,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("male") {
            Gender::Male
        } else {
            Gender::Other
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Activity level, mapped to a TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Parse from string, unknown levels are treated as moderate
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Dietary goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl Goal {
    /// Parse from string, unknown goals are treated as maintenance
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weight_loss" => Goal::WeightLoss,
            "muscle_gain" => Goal::MuscleGain,
            _ => Goal::Maintenance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight_loss",
            Goal::Maintenance => "maintenance",
            Goal::MuscleGain => "muscle_gain",
        }
    }
}

impl From<String> for Goal {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Biometrics and intent of the person asking for advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 25,
            weight: 70.0,
            height: 170.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(Gender::parse("Male"), Gender::Male);
        assert_eq!(Gender::parse("female"), Gender::Other);
        assert_eq!(ActivityLevel::parse("very_active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::parse("couch"), ActivityLevel::Moderate);
        assert_eq!(Goal::parse("MUSCLE_GAIN"), Goal::MuscleGain);
        assert_eq!(Goal::parse("bulk"), Goal::Maintenance);
    }

    #[test]
    fn test_profile_defaults_fill_missing_fields() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"weight": 82.5, "goal": "weight_loss", "activity_level": "??"}"#)
                .unwrap();
        assert_eq!(profile.age, 25);
        assert_eq!(profile.weight, 82.5);
        assert_eq!(profile.height, 170.0);
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert_eq!(profile.goal, Goal::WeightLoss);
    }

    #[test]
    fn test_goal_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Goal::WeightLoss).unwrap(), "\"weight_loss\"");
    }
}
