//! Data models
//!
//! Rust structs representing database entities.

mod food_item;
mod meal_record;

pub use food_item::{FoodItem, FoodItemCreate};
pub use meal_record::{MealRecord, MealRecordCreate, MealRecordDetail, MealRecordPage};
