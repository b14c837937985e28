//! Shared nutrient record
//!
//! The same eleven-field shape is used for a dog's daily target and for what
//! was actually eaten, so consumed totals are plain sums of meal entries.

use serde::{Deserialize, Serialize};

/// Nutrient amounts, either a daily target or a consumed total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub protein: f64,    // grams
    pub fat: f64,        // grams
    pub omega3: f64,     // grams
    pub carbs: f64,      // grams
    pub fiber: f64,      // grams
    pub calories: f64,   // kcal
    pub sodium: f64,     // milligrams
    pub calcium: f64,    // milligrams
    pub phosphorus: f64, // milligrams
    pub vitamin_d: f64,  // IU
    #[serde(default)]
    pub water: f64,      // milliliters
}

impl NutrientProfile {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Multiply every field by `multiplier`
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
            omega3: self.omega3 * multiplier,
            carbs: self.carbs * multiplier,
            fiber: self.fiber * multiplier,
            calories: self.calories * multiplier,
            sodium: self.sodium * multiplier,
            calcium: self.calcium * multiplier,
            phosphorus: self.phosphorus * multiplier,
            vitamin_d: self.vitamin_d * multiplier,
            water: self.water * multiplier,
        }
    }

    pub fn add(&self, other: &NutrientProfile) -> Self {
        Self {
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            omega3: self.omega3 + other.omega3,
            carbs: self.carbs + other.carbs,
            fiber: self.fiber + other.fiber,
            calories: self.calories + other.calories,
            sodium: self.sodium + other.sodium,
            calcium: self.calcium + other.calcium,
            phosphorus: self.phosphorus + other.phosphorus,
            vitamin_d: self.vitamin_d + other.vitamin_d,
            water: self.water + other.water,
        }
    }

    /// Field name, unit and value for each nutrient, in display order
    pub fn fields(&self) -> [(&'static str, &'static str, f64); 11] {
        [
            ("calories", "kcal", self.calories),
            ("protein", "g", self.protein),
            ("fat", "g", self.fat),
            ("omega3", "g", self.omega3),
            ("carbs", "g", self.carbs),
            ("fiber", "g", self.fiber),
            ("sodium", "mg", self.sodium),
            ("calcium", "mg", self.calcium),
            ("phosphorus", "mg", self.phosphorus),
            ("vitamin_d", "IU", self.vitamin_d),
            ("water", "ml", self.water),
        ]
    }

    /// True when no field is negative or non-finite
    pub fn is_valid(&self) -> bool {
        self.fields()
            .iter()
            .all(|(_, _, value)| value.is_finite() && *value >= 0.0)
    }
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, multiplier: f64) -> NutrientProfile {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::zero(), |acc, n| acc + n)
    }
}
