//! Goal-adjusted macro planner
//!
//! Independent of the meal-plan generator's macro profiles; the two can
//! disagree for the same goal and are left that way.

use serde::Serialize;

use super::profile::Goal;

/// Daily targets derived from TDEE and a goal. No fat target is planned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTarget {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    /// Share of calories assigned to carbohydrate
    pub carb_fraction: f64,
}

pub fn target_calories(tdee: f64, goal: Goal) -> f64 {
    match goal {
        Goal::WeightLoss => tdee - 500.0,
        Goal::MuscleGain => tdee + 300.0,
        Goal::Maintenance => tdee,
    }
}

pub fn compute_macro_target(tdee: f64, goal: Goal, weight_kg: f64) -> MacroTarget {
    let calories = target_calories(tdee, goal);
    let protein_per_kg = if goal == Goal::MuscleGain { 1.6 } else { 1.2 };
    let carb_fraction = if goal == Goal::WeightLoss { 0.45 } else { 0.55 };

    MacroTarget {
        calories,
        protein_g: weight_kg * protein_per_kg,
        carbs_g: calories * carb_fraction / 4.0,
        carb_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_loss_target() {
        let target = compute_macro_target(2000.0, Goal::WeightLoss, 70.0);
        assert_eq!(target.calories, 1500.0);
        assert!((target.protein_g - 84.0).abs() < 1e-9);
        assert!((target.carbs_g - 168.75).abs() < 1e-9);
    }

    #[test]
    fn test_muscle_gain_target() {
        let target = compute_macro_target(2000.0, Goal::MuscleGain, 80.0);
        assert_eq!(target.calories, 2300.0);
        assert!((target.protein_g - 128.0).abs() < 1e-9);
        assert!((target.carbs_g - 316.25).abs() < 1e-9);
    }

    #[test]
    fn test_maintenance_keeps_tdee() {
        let target = compute_macro_target(2480.0, Goal::parse("recomp"), 70.0);
        assert_eq!(target.calories, 2480.0);
        assert_eq!(target.carb_fraction, 0.55);
    }
}
