//! PawPal Status Tool
//!
//! Runtime status of the service and the usage guide handed to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for AI assistants
pub const PAWPAL_INSTRUCTIONS: &str = r#"
# PawPal Health Instructions

PawPal tracks one dog's daily nutrition and activity against targets computed
from the dog's weight, age, usual activities and the weather.

## Getting the Current Date

All day tools take an ISO date (`YYYY-MM-DD`). Use a calendar tool to get
today's date rather than guessing it.

---

## 1. Set Up the Profile (once)

**Tool:** `create_profile`

| Field | Notes |
|-------|-------|
| `name` | Required |
| `breed` | Optional, defaults to "Mixed" |
| `age_years` | Whole years, 0 or more |
| `weight_kg` | Greater than 0 |
| `habits` | Usual activities: `rest`, `light_walk`, `moderate_walk`, `intense_run`, `play`, `other` |
| `weather` | Typical weather: `sunny`, `cloudy`, `rainy`, `cool`, `hot` |

Targets are computed once and stored. Calling `create_profile` again
replaces the profile and its targets. Days already started keep the profile
they were started with.

### How targets are computed

- Resting energy (RER) = 70 × weight^0.75 kcal
- Activity factor: `intense_run` 2.0, else `light_walk` 1.4, else `rest` 1.2, else 1.6
- Age: older than 7 → −0.2, younger than 2 → +0.5
- Calories = RER × factor; other nutrients scale per 1000 kcal
- Water = 60 ml/kg, ×1.2 when hot, ×1.1 when sunny, ×1.1 again for runners

Use `calculate_targets` to preview targets without saving anything.

---

## 2. Start the Day

**Tool:** `start_day` with `date` and today's `weather`.

Returns the existing day if already started. Meals and activities can only be
logged on a started day.

---

## 3. Log Meals

**Tool:** `log_meal`

- `meal_type`: `breakfast`, `dinner` or `snack`
- Give `nutrients` when known (from a label)
- Otherwise give a `description` and/or `image_base64`; nutrients are then
  estimated automatically (water is never estimated and stays 0)
- At least one of description, image or nutrients is required

---

## 4. Log Activities

**Tool:** `log_activity` with `category` and `duration_minutes`.

Burned calories use the day's recorded weight:
kcal = MET × 3.5 × weight / 200 × minutes

| Category | MET |
|----------|-----|
| rest | 1 |
| light_walk | 3 |
| moderate_walk | 4 |
| play | 5 |
| intense_run | 8 |
| other | 3 |

`time_of_day` (`day`/`night`) is optional; without it the timestamp hour
decides (18:00 and later is night).

---

## 5. Review the Day

- `get_day`: meals, activities grouped day/night, consumed vs target for each
  nutrient (percent capped at 100; on track means 80-120% of target), net calories
- `get_daily_advice`: one bilingual sentence, generated once and stored
  (pass `refresh: true` to regenerate)
- `get_daily_quiz` then `answer_quiz`: correct answers earn 50 XP, wrong 10.
  Each day's quiz can be answered once.

---

## 6. History and Progress

- `list_days`: newest first, with consumed/burned/net calories, sodium, water, protein
- `get_long_term_advice`: trend advice over the last 7 days
- `get_progress`: XP, level (every 100 XP), streak badges at 3, 7 and 30 days logged

## Cleanup

- `delete_meal`, `delete_activity` by id
- `delete_day` removes the day with all its entries
"#;

/// Runtime status of the PawPal service
#[derive(Debug, Clone, Serialize)]
pub struct PawPalStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Which advisor answers food, advice and quiz requests
    pub advisor: &'static str,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    advisor: &'static str,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, advisor: &'static str) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            advisor,
        }
    }

    pub fn get_status(&self) -> PawPalStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PawPalStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            advisor: self.advisor,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
