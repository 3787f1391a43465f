//! Randomized meal-suggestion generator
//!
//! Splits a daily calorie budget across four slots, picks a menu item per
//! slot from a goal-specific pool and derives macro grams, with jitter on
//! both calories and grams. All distribution parameters come from the
//! catalog; the randomness comes from a [`RandomSource`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{PerGoal, PerSlot};
use super::profile::Goal;
use super::random::RandomSource;

/// Meal slots in plan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

/// Calorie shares of each macro nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProfile {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Distribution parameters for the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanConfig {
    pub macro_profiles: PerGoal<MacroProfile>,
    pub slot_fractions: PerSlot<f64>,
    pub calorie_jitter: (f64, f64),
    pub gram_jitter: (f64, f64),
    pub pools: PerSlot<PerGoal<Vec<String>>>,
}

/// Fixed fallback meal for a slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicMeal {
    pub name: String,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

/// Fallback plans: one for weight loss, one for every other goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicMealPlans {
    pub weight_loss: PerSlot<BasicMeal>,
    pub default: PerSlot<BasicMeal>,
}

/// One suggested meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub meal_slot: MealSlot,
    pub item_name: String,
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum MealPlanError {
    #[error("No menu items for {slot} ({goal})")]
    EmptyPool { slot: &'static str, goal: &'static str },
}

/// Generates meal plans from borrowed catalog parameters
pub struct MealPlanGenerator<'a> {
    config: &'a MealPlanConfig,
}

impl<'a> MealPlanGenerator<'a> {
    pub fn new(config: &'a MealPlanConfig) -> Self {
        Self { config }
    }

    /// Exactly four suggestions, breakfast to snack.
    ///
    /// Not idempotent: two calls with the same input draw fresh jitter and items.
    pub fn generate(
        &self,
        daily_calories: i64,
        goal: Goal,
        random: &mut dyn RandomSource,
    ) -> Result<Vec<MealSuggestion>, MealPlanError> {
        let profile = self.config.macro_profiles.get(goal);
        let (cal_low, cal_high) = self.config.calorie_jitter;
        let (gram_low, gram_high) = self.config.gram_jitter;

        MealSlot::ALL
            .iter()
            .map(|&slot| {
                let pool = self.config.pools.get(slot).get(goal);
                if pool.is_empty() {
                    return Err(MealPlanError::EmptyPool {
                        slot: slot.as_str(),
                        goal: goal.as_str(),
                    });
                }

                let base = daily_calories as f64 * self.config.slot_fractions.get(slot);
                let calories = base * random.uniform(cal_low, cal_high);
                let item_name = pool[random.choose_index(pool.len())].clone();

                let mut grams = |fraction: f64, kcal_per_gram: f64| -> i64 {
                    let value = calories * fraction / kcal_per_gram * random.uniform(gram_low, gram_high);
                    value.max(0.0).round() as i64
                };
                let protein_g = grams(profile.protein, 4.0);
                let carbs_g = grams(profile.carbs, 4.0);
                let fat_g = grams(profile.fat, 9.0);

                Ok(MealSuggestion {
                    meal_slot: slot,
                    item_name,
                    calories: calories.round() as i64,
                    protein_g,
                    carbs_g,
                    fat_g,
                })
            })
            .collect()
    }
}

/// Deterministic plan used when the generator cannot run
pub fn basic_meal_plan(
    plans: &BasicMealPlans,
    slot_fractions: &PerSlot<f64>,
    daily_calories: i64,
    goal: Goal,
) -> Vec<MealSuggestion> {
    let meals = match goal {
        Goal::WeightLoss => &plans.weight_loss,
        _ => &plans.default,
    };

    MealSlot::ALL
        .iter()
        .map(|&slot| {
            let meal = meals.get(slot);
            MealSuggestion {
                meal_slot: slot,
                item_name: meal.name.clone(),
                calories: (daily_calories as f64 * slot_fractions.get(slot)) as i64,
                protein_g: meal.protein_g,
                carbs_g: meal.carbs_g,
                fat_g: meal.fat_g,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::catalog::Catalog;
    use crate::nutrition::random::{RngSource, SequenceRandom};

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_slot_fractions_sum_to_one() {
        let catalog = catalog();
        let sum: f64 = MealSlot::ALL
            .iter()
            .map(|s| catalog.meal_plan.slot_fractions.get(*s))
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_four_slots_in_order() {
        let catalog = catalog();
        let generator = MealPlanGenerator::new(&catalog.meal_plan);
        let plan = generator
            .generate(2000, Goal::Maintenance, &mut RngSource::seeded(1))
            .unwrap();
        let slots: Vec<_> = plan.iter().map(|m| m.meal_slot).collect();
        assert_eq!(slots, MealSlot::ALL.to_vec());
    }

    #[test]
    fn test_values_stay_in_jitter_bounds() {
        let catalog = catalog();
        let generator = MealPlanGenerator::new(&catalog.meal_plan);
        let mut random = RngSource::seeded(99);

        for goal in [Goal::WeightLoss, Goal::Maintenance, Goal::MuscleGain] {
            for _ in 0..200 {
                let plan = generator.generate(2000, goal, &mut random).unwrap();
                for meal in &plan {
                    let base = 2000.0 * catalog.meal_plan.slot_fractions.get(meal.meal_slot);
                    let calories = meal.calories as f64;
                    assert!(calories >= (base * 0.94).floor() && calories <= (base * 1.06).ceil());
                    assert!(meal.protein_g >= 0 && meal.carbs_g >= 0 && meal.fat_g >= 0);
                    let pool = catalog.meal_plan.pools.get(meal.meal_slot).get(goal);
                    assert!(pool.contains(&meal.item_name));
                }
            }
        }
    }

    #[test]
    fn test_midpoint_draws_are_exact() {
        let catalog = catalog();
        let generator = MealPlanGenerator::new(&catalog.meal_plan);
        let plan = generator
            .generate(1600, Goal::Maintenance, &mut SequenceRandom::midpoint())
            .unwrap();

        // breakfast: 400 kcal, 25/50/25 split, jitter factors of 1.0
        let breakfast = &plan[0];
        assert_eq!(breakfast.calories, 400);
        assert_eq!(breakfast.protein_g, 25);
        assert_eq!(breakfast.carbs_g, 50);
        assert_eq!(breakfast.fat_g, 11);
        assert_eq!(
            breakfast.item_name,
            catalog.meal_plan.pools.breakfast.maintenance[3]
        );
        assert_eq!(plan[3].calories, 160);
    }

    #[test]
    fn test_extreme_draws() {
        let catalog = catalog();
        let generator = MealPlanGenerator::new(&catalog.meal_plan);
        let low = generator
            .generate(1000, Goal::WeightLoss, &mut SequenceRandom::new(vec![0.0]))
            .unwrap();
        assert_eq!(low[0].calories, 235);
        assert_eq!(low[0].item_name, catalog.meal_plan.pools.breakfast.weight_loss[0]);

        let high = generator
            .generate(1000, Goal::WeightLoss, &mut SequenceRandom::new(vec![1.0]))
            .unwrap();
        assert_eq!(high[0].calories, 265);
        assert_eq!(high[0].item_name, catalog.meal_plan.pools.breakfast.weight_loss[5]);
    }

    #[test]
    fn test_repeated_calls_vary() {
        let catalog = catalog();
        let generator = MealPlanGenerator::new(&catalog.meal_plan);
        let mut random = RngSource::from_entropy();

        let first = generator.generate(2000, Goal::Maintenance, &mut random).unwrap();
        let differs = (0..10).any(|_| {
            generator.generate(2000, Goal::Maintenance, &mut random).unwrap() != first
        });
        assert!(differs);

        let a = generator.generate(2000, Goal::MuscleGain, &mut RngSource::seeded(1)).unwrap();
        let b = generator.generate(2000, Goal::MuscleGain, &mut RngSource::seeded(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let mut catalog = catalog();
        catalog.meal_plan.pools.dinner.muscle_gain.clear();
        let generator = MealPlanGenerator::new(&catalog.meal_plan);
        let err = generator
            .generate(2500, Goal::MuscleGain, &mut SequenceRandom::midpoint())
            .unwrap_err();
        assert_eq!(
            err,
            MealPlanError::EmptyPool { slot: "dinner", goal: "muscle_gain" }
        );
    }

    #[test]
    fn test_basic_plan_variants() {
        let catalog = catalog();
        let plan = basic_meal_plan(
            &catalog.basic_meal_plans,
            &catalog.meal_plan.slot_fractions,
            1999,
            Goal::WeightLoss,
        );
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].item_name, catalog.basic_meal_plans.weight_loss.breakfast.name);
        // 1999 * 0.25 = 499.75, truncated
        assert_eq!(plan[0].calories, 499);

        let plan = basic_meal_plan(
            &catalog.basic_meal_plans,
            &catalog.meal_plan.slot_fractions,
            2000,
            Goal::MuscleGain,
        );
        assert_eq!(plan[1].item_name, catalog.basic_meal_plans.default.lunch.name);
        assert_eq!(plan[1].protein_g, catalog.basic_meal_plans.default.lunch.protein_g);
    }
}
