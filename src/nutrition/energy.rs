//! Energy calculator
//!
//! Mifflin-St Jeor BMR and activity-scaled TDEE. Inputs are not validated;
//! nonsensical biometrics give nonsensical but finite numbers.

use serde::Serialize;

use super::profile::{ActivityLevel, Gender, UserProfile};

/// BMR and TDEE in kcal/day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub bmr: f64,
    pub tdee: f64,
}

impl EnergyEstimate {
    pub fn for_profile(profile: &UserProfile) -> Self {
        let bmr = compute_bmr(profile.age, profile.weight, profile.height, profile.gender);
        Self {
            bmr,
            tdee: compute_tdee(bmr, profile.activity_level),
        }
    }
}

/// Basal metabolic rate (kcal/day)
pub fn compute_bmr(age: u32, weight_kg: f64, height_cm: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Other => base - 161.0,
    }
}

/// Total daily energy expenditure (kcal/day)
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_offset_is_constant() {
        for (age, weight, height) in [(18, 50.0, 155.0), (25, 70.0, 170.0), (64, 102.3, 188.5)] {
            let male = compute_bmr(age, weight, height, Gender::Male);
            let other = compute_bmr(age, weight, height, Gender::Other);
            assert!((male - other - 166.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bmr_reference_value() {
        // 700 + 1062.5 - 125 + 5
        assert_eq!(compute_bmr(25, 70.0, 170.0, Gender::Male), 1642.5);
    }

    #[test]
    fn test_unknown_activity_uses_moderate() {
        let unknown = compute_tdee(1600.0, ActivityLevel::parse("unknown_level"));
        let moderate = compute_tdee(1600.0, ActivityLevel::Moderate);
        assert_eq!(unknown, moderate);
        assert!((moderate - 2480.0).abs() < 1e-9);
    }

    #[test]
    fn test_activity_multipliers() {
        let cases = [
            (ActivityLevel::Sedentary, 1.2),
            (ActivityLevel::Light, 1.375),
            (ActivityLevel::Moderate, 1.55),
            (ActivityLevel::Active, 1.725),
            (ActivityLevel::VeryActive, 1.9),
        ];
        for (level, multiplier) in cases {
            let tdee = compute_tdee(1000.0, level);
            assert!((tdee - 1000.0 * multiplier).abs() < 1e-9, "{level:?}");
        }
    }

    #[test]
    fn test_estimate_for_default_profile() {
        let estimate = EnergyEstimate::for_profile(&UserProfile::default());
        assert_eq!(estimate.bmr, 1642.5);
        assert!((estimate.tdee - 1642.5 * 1.55).abs() < 1e-9);
    }
}
