//! Personalized advice from a user profile

use serde::Serialize;

use super::energy::EnergyEstimate;
use super::macros::compute_macro_target;
use super::profile::{Goal, UserProfile};

const ADVICE_SOURCE: &str = "Personalized calculation";

/// One piece of advice; same shape as a nutrition fact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceItem {
    pub title: String,
    pub content: String,
    pub category: String,
    pub source: String,
    pub timestamp: String,
}

impl AdviceItem {
    fn new(title: &str, content: String, category: &str, timestamp: &str) -> Self {
        Self {
            title: title.to_string(),
            content,
            category: category.to_string(),
            source: ADVICE_SOURCE.to_string(),
            timestamp: timestamp.to_string(),
        }
    }
}

/// Calorie, protein and carbohydrate advice, in that order
pub fn personalized_advice(profile: &UserProfile, timestamp: &str) -> Vec<AdviceItem> {
    let energy = EnergyEstimate::for_profile(profile);
    let target = compute_macro_target(energy.tdee, profile.goal, profile.weight);

    let calories = match profile.goal {
        Goal::WeightLoss => AdviceItem::new(
            "Calorie advice for weight loss",
            format!(
                "Your daily calorie target is about {:.0} kcal, a 500 kcal deficit below your expenditure.",
                target.calories
            ),
            "calories",
            timestamp,
        ),
        Goal::MuscleGain => AdviceItem::new(
            "Calorie advice for muscle gain",
            format!(
                "Your daily calorie target is about {:.0} kcal, a 300 kcal surplus above your expenditure.",
                target.calories
            ),
            "calories",
            timestamp,
        ),
        Goal::Maintenance => AdviceItem::new(
            "Calorie advice for maintenance",
            format!(
                "Your daily calorie target is about {:.0} kcal; keep your intake at this level.",
                target.calories
            ),
            "calories",
            timestamp,
        ),
    };

    let protein_share = if target.calories > 0.0 {
        format!(
            ", about {:.0}% of your total calories",
            target.protein_g * 4.0 / target.calories * 100.0
        )
    } else {
        String::new()
    };
    let protein = AdviceItem::new(
        "Protein intake advice",
        format!("Eat about {:.0} g of protein per day{}.", target.protein_g, protein_share),
        "protein",
        timestamp,
    );

    let carbohydrates = AdviceItem::new(
        "Carbohydrate intake advice",
        format!(
            "Eat about {:.0} g of carbohydrate per day, about {:.0}% of your total calories.",
            target.carbs_g,
            target.carb_fraction * 100.0
        ),
        "carbohydrates",
        timestamp,
    );

    vec![calories, protein, carbohydrates]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::profile::{ActivityLevel, Gender};

    #[test]
    fn test_default_profile_advice() {
        let advice = personalized_advice(&UserProfile::default(), "t");
        let categories: Vec<_> = advice.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(categories, vec!["calories", "protein", "carbohydrates"]);

        // 1642.5 * 1.55 = 2545.875
        assert!(advice[0].content.contains("2546 kcal"));
        // 84 g, 84 * 4 / 2545.875 = 13%
        assert!(advice[1].content.contains("84 g"));
        assert!(advice[1].content.contains("13%"));
        assert!(advice[2].content.contains("55%"));
        assert!(advice.iter().all(|a| a.source == ADVICE_SOURCE && a.timestamp == "t"));
    }

    #[test]
    fn test_weight_loss_advice() {
        let profile = UserProfile {
            gender: Gender::Other,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::WeightLoss,
            ..UserProfile::default()
        };
        let advice = personalized_advice(&profile, "t");
        assert!(advice[0].title.contains("weight loss"));
        assert!(advice[2].content.contains("45%"));
    }

    #[test]
    fn test_non_positive_target_omits_share() {
        let profile = UserProfile {
            weight: 0.0,
            height: 0.0,
            age: 90,
            goal: Goal::WeightLoss,
            ..UserProfile::default()
        };
        let advice = personalized_advice(&profile, "t");
        assert!(!advice[1].content.contains('%'));
    }
}
