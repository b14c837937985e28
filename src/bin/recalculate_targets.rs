//! Utility to recompute the stored profile's daily targets
//!
//! Usage: recalculate_targets [weather]   (weather defaults to sunny)
//!
//! Days already started keep their own snapshot and are not changed.

use pawpal::energy::WeatherCondition;
use pawpal::models::DogProfile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let weather: WeatherCondition = args.get(1).map(|s| s.as_str()).unwrap_or("sunny").parse()?;

    let db_path = pawpal::config::database_path();
    println!("Database: {}", db_path.display());

    let database = pawpal::db::Database::new(&db_path)?;
    database.with_conn(pawpal::db::migrations::run_migrations)?;

    let profile = match database.with_conn(DogProfile::get)? {
        Some(p) => p,
        None => {
            println!("No profile stored yet");
            return Ok(());
        }
    };

    let updated = profile.recalculate_targets(weather)?;
    database.with_conn(|conn| updated.save(conn))?;

    let old = &profile.target_nutrients;
    let new = &updated.target_nutrients;
    println!("Recalculated targets for {} ({} kg, {} years, {})", updated.name, updated.weight_kg, updated.age_years, weather);
    println!("  Calories: {:.0} -> {:.0} kcal", old.calories, new.calories);
    println!("  Protein:  {:.0} -> {:.0} g", old.protein, new.protein);
    println!("  Fat:      {:.0} -> {:.0} g", old.fat, new.fat);
    println!("  Water:    {:.0} -> {:.0} ml", old.water, new.water);

    Ok(())
}
