//! Activity and weather categories
//!
//! Both are closed sets. String input that does not name a known variant is
//! rejected with `EnergyError::InvalidInput` rather than mapped to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EnergyError;

/// Kind of activity a dog does, used for habits and logged activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Rest,
    LightWalk,
    ModerateWalk,
    IntenseRun,
    Play,
    Other,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 6] = [
        ActivityCategory::Rest,
        ActivityCategory::LightWalk,
        ActivityCategory::ModerateWalk,
        ActivityCategory::IntenseRun,
        ActivityCategory::Play,
        ActivityCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Rest => "rest",
            ActivityCategory::LightWalk => "light_walk",
            ActivityCategory::ModerateWalk => "moderate_walk",
            ActivityCategory::IntenseRun => "intense_run",
            ActivityCategory::Play => "play",
            ActivityCategory::Other => "other",
        }
    }

    /// Bilingual label shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityCategory::Rest => "Rest 休息",
            ActivityCategory::LightWalk => "Light Walk 散步",
            ActivityCategory::ModerateWalk => "Moderate Walk 健走",
            ActivityCategory::IntenseRun => "Run 奔跑",
            ActivityCategory::Play => "Play 遊戲",
            ActivityCategory::Other => "Other 其他",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, and fold spaces and dashes into underscores
fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

impl FromStr for ActivityCategory {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "rest" => Ok(ActivityCategory::Rest),
            "light_walk" | "lightwalk" => Ok(ActivityCategory::LightWalk),
            "moderate_walk" | "moderatewalk" => Ok(ActivityCategory::ModerateWalk),
            "intense_run" | "intenserun" | "run" => Ok(ActivityCategory::IntenseRun),
            "play" => Ok(ActivityCategory::Play),
            "other" => Ok(ActivityCategory::Other),
            _ => Err(EnergyError::invalid_input(format!(
                "unknown activity category '{}'",
                s
            ))),
        }
    }
}

/// Weather on the day a profile or log is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Cool,
    Hot,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Cool => "cool",
            WeatherCondition::Hot => "hot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny 晴天",
            WeatherCondition::Cloudy => "Cloudy 多雲",
            WeatherCondition::Rainy => "Rainy 雨天",
            WeatherCondition::Cool => "Cool 涼爽",
            WeatherCondition::Hot => "Hot 炎熱",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "sunny" => Ok(WeatherCondition::Sunny),
            "cloudy" => Ok(WeatherCondition::Cloudy),
            "rainy" => Ok(WeatherCondition::Rainy),
            "cool" => Ok(WeatherCondition::Cool),
            "hot" => Ok(WeatherCondition::Hot),
            _ => Err(EnergyError::invalid_input(format!(
                "unknown weather condition '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_activity_labels() {
        assert_eq!("light_walk".parse::<ActivityCategory>(), Ok(ActivityCategory::LightWalk));
        assert_eq!("Light Walk".parse::<ActivityCategory>(), Ok(ActivityCategory::LightWalk));
        assert_eq!("INTENSE_RUN".parse::<ActivityCategory>(), Ok(ActivityCategory::IntenseRun));
        assert_eq!("moderate-walk".parse::<ActivityCategory>(), Ok(ActivityCategory::ModerateWalk));
        assert_eq!(" play ".parse::<ActivityCategory>(), Ok(ActivityCategory::Play));
    }

    #[test]
    fn test_unknown_activity_is_rejected() {
        let err = "swimming".parse::<ActivityCategory>().unwrap_err();
        assert!(matches!(err, EnergyError::InvalidInput(_)));
        assert!("".parse::<ActivityCategory>().is_err());
    }

    #[test]
    fn test_activity_round_trips_through_as_str() {
        for category in ActivityCategory::ALL {
            assert_eq!(category.as_str().parse::<ActivityCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_parse_weather() {
        assert_eq!("Hot".parse::<WeatherCondition>(), Ok(WeatherCondition::Hot));
        assert_eq!("sunny".parse::<WeatherCondition>(), Ok(WeatherCondition::Sunny));
        assert!("snowy".parse::<WeatherCondition>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ActivityCategory::IntenseRun).unwrap();
        assert_eq!(json, "\"intense_run\"");
        let weather: WeatherCondition = serde_json::from_str("\"cloudy\"").unwrap();
        assert_eq!(weather, WeatherCondition::Cloudy);
    }
}
