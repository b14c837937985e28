//! Daily energy requirement and nutrient targets
//!
//! RER = 70 × weight_kg^0.75, scaled by an activity factor into the daily
//! energy requirement. Nutrient targets are fixed amounts per 1000 kcal of
//! that requirement; water is driven by weight, weather and running habits.

use crate::models::NutrientProfile;

use super::categories::{ActivityCategory, WeatherCondition};
use super::error::{ensure_positive_weight, EnergyError, EnergyResult};
use super::rounding::{round_to, round_whole};

const RER_COEFFICIENT: f64 = 70.0;
const RER_EXPONENT: f64 = 0.75;

/// Factor used when no habit rule matches
pub const BASELINE_ACTIVITY_FACTOR: f64 = 1.6;

/// Habit overrides, highest priority first. Only the first match applies.
pub const ACTIVITY_FACTOR_RULES: [(ActivityCategory, f64); 3] = [
    (ActivityCategory::IntenseRun, 2.0),
    (ActivityCategory::LightWalk, 1.4),
    (ActivityCategory::Rest, 1.2),
];

const SENIOR_AGE_YEARS: i32 = 7;
const SENIOR_ADJUSTMENT: f64 = -0.2;
const YOUNG_AGE_YEARS: i32 = 2;
const YOUNG_ADJUSTMENT: f64 = 0.5;

const WATER_ML_PER_KG: f64 = 60.0;
const HOT_WATER_MULTIPLIER: f64 = 1.2;
const SUNNY_WATER_MULTIPLIER: f64 = 1.1;
const RUNNER_WATER_MULTIPLIER: f64 = 1.1;

/// Reference amounts per 1000 kcal with the decimals each field keeps
struct PerThousandKcal {
    amount: f64,
    decimals: u32,
}

const PROTEIN: PerThousandKcal = PerThousandKcal { amount: 45.0, decimals: 0 };
const FAT: PerThousandKcal = PerThousandKcal { amount: 15.0, decimals: 0 };
const OMEGA3: PerThousandKcal = PerThousandKcal { amount: 1.5, decimals: 2 };
const CARBS: PerThousandKcal = PerThousandKcal { amount: 100.0, decimals: 0 };
const FIBER: PerThousandKcal = PerThousandKcal { amount: 5.0, decimals: 1 };
const SODIUM: PerThousandKcal = PerThousandKcal { amount: 200.0, decimals: 0 };
const CALCIUM: PerThousandKcal = PerThousandKcal { amount: 1250.0, decimals: 0 };
const PHOSPHORUS: PerThousandKcal = PerThousandKcal { amount: 1000.0, decimals: 0 };
const VITAMIN_D: PerThousandKcal = PerThousandKcal { amount: 125.0, decimals: 0 };

impl PerThousandKcal {
    fn at(&self, scale: f64) -> f64 {
        round_to(self.amount * scale, self.decimals)
    }
}

/// Resting energy requirement in kcal/day
pub fn compute_resting_energy(weight_kg: f64) -> EnergyResult<f64> {
    ensure_positive_weight(weight_kg)?;
    Ok(RER_COEFFICIENT * weight_kg.powf(RER_EXPONENT))
}

/// Habit factor from the rule table, before any age adjustment
pub fn habit_factor(habits: &[ActivityCategory]) -> f64 {
    ACTIVITY_FACTOR_RULES
        .iter()
        .find(|(category, _)| habits.contains(category))
        .map(|(_, factor)| *factor)
        .unwrap_or(BASELINE_ACTIVITY_FACTOR)
}

/// Additive age adjustment: seniors need less, puppies more
pub fn age_adjustment(age_years: i32) -> f64 {
    if age_years > SENIOR_AGE_YEARS {
        SENIOR_ADJUSTMENT
    } else if age_years < YOUNG_AGE_YEARS {
        YOUNG_ADJUSTMENT
    } else {
        0.0
    }
}

/// Full activity factor applied to RER
pub fn activity_factor(age_years: i32, habits: &[ActivityCategory]) -> f64 {
    habit_factor(habits) + age_adjustment(age_years)
}

/// Daily water need in ml, unrounded
fn water_need(weight_kg: f64, weather: WeatherCondition, habits: &[ActivityCategory]) -> f64 {
    let mut water = weight_kg * WATER_ML_PER_KG;
    match weather {
        WeatherCondition::Hot => water *= HOT_WATER_MULTIPLIER,
        WeatherCondition::Sunny => water *= SUNNY_WATER_MULTIPLIER,
        WeatherCondition::Cloudy | WeatherCondition::Rainy | WeatherCondition::Cool => {}
    }
    if habits.contains(&ActivityCategory::IntenseRun) {
        water *= RUNNER_WATER_MULTIPLIER;
    }
    water
}

/// Daily target nutrient profile for a dog
pub fn compute_target_nutrients(
    weight_kg: f64,
    age_years: i32,
    weather: WeatherCondition,
    habits: &[ActivityCategory],
) -> EnergyResult<NutrientProfile> {
    if age_years < 0 {
        return Err(EnergyError::invalid_input(format!(
            "age must not be negative, got {} years",
            age_years
        )));
    }

    let rer = compute_resting_energy(weight_kg)?;
    let calories = round_whole(rer * activity_factor(age_years, habits));
    let water = round_whole(water_need(weight_kg, weather, habits));

    let scale = calories / 1000.0;

    Ok(NutrientProfile {
        protein: PROTEIN.at(scale),
        fat: FAT.at(scale),
        omega3: OMEGA3.at(scale),
        carbs: CARBS.at(scale),
        fiber: FIBER.at(scale),
        calories,
        sodium: SODIUM.at(scale),
        calcium: CALCIUM.at(scale),
        phosphorus: PHOSPHORUS.at(scale),
        vitamin_d: VITAMIN_D.at(scale),
        water,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ActivityCategory::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_resting_energy_formula() {
        for weight in [0.5, 4.2, 10.0, 23.7, 60.0] {
            let rer = compute_resting_energy(weight).unwrap();
            assert!(approx(rer, 70.0 * weight.powf(0.75)));
        }
        assert!((compute_resting_energy(10.0).unwrap() - 393.64).abs() < 0.01);
    }

    #[test]
    fn test_resting_energy_rejects_bad_weight() {
        assert!(compute_resting_energy(0.0).is_err());
        assert!(compute_resting_energy(-3.0).is_err());
        assert!(compute_resting_energy(f64::NAN).is_err());
        assert!(compute_resting_energy(f64::INFINITY).is_err());
    }

    #[test]
    fn test_scenario_moderate_walker_on_sunny_day() {
        let target = compute_target_nutrients(10.0, 3, WeatherCondition::Sunny, &[ModerateWalk]).unwrap();
        assert_eq!(target.calories, 630.0);
        assert_eq!(target.protein, 28.0);
        assert_eq!(target.sodium, 126.0);
        assert_eq!(target.water, 660.0);
        assert_eq!(target.carbs, 63.0);
        assert_eq!(target.phosphorus, 630.0);
    }

    #[test]
    fn test_all_fields_for_twenty_kg_adult() {
        let target = compute_target_nutrients(20.0, 4, WeatherCondition::Cloudy, &[Play]).unwrap();
        assert_eq!(target.calories, 1059.0);
        assert_eq!(target.protein, 48.0);
        assert_eq!(target.fat, 16.0);
        assert_eq!(target.omega3, 1.59);
        assert_eq!(target.carbs, 106.0);
        assert_eq!(target.fiber, 5.3);
        assert_eq!(target.sodium, 212.0);
        assert_eq!(target.calcium, 1324.0);
        assert_eq!(target.phosphorus, 1059.0);
        assert_eq!(target.vitamin_d, 132.0);
        assert_eq!(target.water, 1200.0);
    }

    #[test]
    fn test_habit_precedence() {
        assert_eq!(habit_factor(&[IntenseRun, Rest]), 2.0);
        assert_eq!(habit_factor(&[Rest, IntenseRun]), 2.0);
        assert_eq!(habit_factor(&[Rest, LightWalk]), 1.4);
        assert_eq!(habit_factor(&[Rest]), 1.2);
        assert_eq!(habit_factor(&[ModerateWalk, Play, Other]), 1.6);
        assert_eq!(habit_factor(&[]), 1.6);
    }

    #[test]
    fn test_intense_run_and_rest_resolve_to_runner_calories() {
        let both = compute_target_nutrients(10.0, 3, WeatherCondition::Cool, &[IntenseRun, Rest]).unwrap();
        let runner = compute_target_nutrients(10.0, 3, WeatherCondition::Cool, &[IntenseRun]).unwrap();
        assert_eq!(both, runner);
        assert_eq!(both.calories, 787.0);
    }

    #[test]
    fn test_age_boundaries() {
        assert_eq!(age_adjustment(7), 0.0);
        assert_eq!(age_adjustment(8), -0.2);
        assert_eq!(age_adjustment(1), 0.5);
        assert_eq!(age_adjustment(2), 0.0);
        assert_eq!(age_adjustment(0), 0.5);

        assert!(approx(activity_factor(8, &[IntenseRun]), 1.8));
        assert!(approx(activity_factor(1, &[Rest]), 1.7));
        assert!(approx(activity_factor(5, &[LightWalk]), 1.4));
    }

    #[test]
    fn test_age_adjusted_calories() {
        let senior = compute_target_nutrients(10.0, 8, WeatherCondition::Cool, &[IntenseRun]).unwrap();
        assert_eq!(senior.calories, 709.0);
        let puppy = compute_target_nutrients(10.0, 1, WeatherCondition::Cool, &[Rest]).unwrap();
        assert_eq!(puppy.calories, 669.0);
    }

    #[test]
    fn test_water_compounds_weather_and_running() {
        let target = compute_target_nutrients(10.0, 3, WeatherCondition::Hot, &[IntenseRun]).unwrap();
        assert_eq!(target.water, 792.0);

        let rainy = compute_target_nutrients(10.0, 3, WeatherCondition::Rainy, &[LightWalk]).unwrap();
        assert_eq!(rainy.water, 600.0);

        let hot = compute_target_nutrients(20.0, 3, WeatherCondition::Hot, &[Play]).unwrap();
        assert_eq!(hot.water, 1440.0);

        let sunny_runner = compute_target_nutrients(20.0, 3, WeatherCondition::Sunny, &[IntenseRun]).unwrap();
        assert_eq!(sunny_runner.water, 1452.0);
    }

    #[test]
    fn test_targets_are_idempotent() {
        let first = compute_target_nutrients(13.4, 9, WeatherCondition::Sunny, &[Play, Rest]).unwrap();
        let second = compute_target_nutrients(13.4, 9, WeatherCondition::Sunny, &[Play, Rest]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_targets_are_non_negative() {
        let weathers = [
            WeatherCondition::Sunny,
            WeatherCondition::Cloudy,
            WeatherCondition::Rainy,
            WeatherCondition::Cool,
            WeatherCondition::Hot,
        ];
        for weight in [0.3, 2.0, 9.9, 35.0, 80.0] {
            for age in [0, 1, 2, 7, 8, 15] {
                for weather in weathers {
                    for habit in ActivityCategory::ALL {
                        let target = compute_target_nutrients(weight, age, weather, &[habit]).unwrap();
                        assert!(target.is_valid(), "{:?}", target);
                    }
                }
            }
        }
    }

    #[test]
    fn test_calories_and_water_increase_with_weight() {
        let mut previous = compute_target_nutrients(2.0, 4, WeatherCondition::Cloudy, &[ModerateWalk]).unwrap();
        for weight in [4.0, 8.0, 16.0, 32.0, 64.0] {
            let next = compute_target_nutrients(weight, 4, WeatherCondition::Cloudy, &[ModerateWalk]).unwrap();
            assert!(next.calories > previous.calories);
            assert!(next.water > previous.water);
            previous = next;
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let zero = compute_target_nutrients(0.0, 3, WeatherCondition::Sunny, &[Play]);
        assert!(matches!(zero, Err(EnergyError::InvalidInput(_))));
        let negative_age = compute_target_nutrients(10.0, -1, WeatherCondition::Sunny, &[Play]);
        assert!(matches!(negative_age, Err(EnergyError::InvalidInput(_))));
    }
}
