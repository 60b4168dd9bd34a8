use std::str::FromStr;

use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use strum::{Display, EnumString};
use time::{Date, Weekday};

use crate::domain::{
    calendar::{parse_visit_date, ParkCalendar},
    services::DEFAULT_MAX_ATTEMPTS,
};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub park: ParkSettings,
    #[serde(default)]
    pub booking: BookingSettings,
    #[serde(default)]
    pub seed: SeedSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default)]
    pub storage: StorageBackend,
    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Display, Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
pub enum StorageBackend {
    #[default]
    #[strum(ascii_case_insensitive, serialize = "postgres")]
    Postgres,
    #[strum(ascii_case_insensitive, serialize = "memory")]
    Memory,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ParkSettings {
    /// English weekday name, e.g. "monday".
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub closed_weekday: ClosedWeekday,
}

impl Default for ParkSettings {
    fn default() -> Self {
        Self {
            closed_weekday: ClosedWeekday::Monday,
        }
    }
}

impl ParkSettings {
    pub fn calendar(&self) -> ParkCalendar {
        ParkCalendar::new(self.closed_weekday.into())
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ClosedWeekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<ClosedWeekday> for Weekday {
    fn from(day: ClosedWeekday) -> Self {
        match day {
            ClosedWeekday::Monday => Weekday::Monday,
            ClosedWeekday::Tuesday => Weekday::Tuesday,
            ClosedWeekday::Wednesday => Weekday::Wednesday,
            ClosedWeekday::Thursday => Weekday::Thursday,
            ClosedWeekday::Friday => Weekday::Friday,
            ClosedWeekday::Saturday => Weekday::Saturday,
            ClosedWeekday::Sunday => Weekday::Sunday,
        }
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct BookingSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_attempts: u32,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SeedSettings {
    #[serde(default)]
    pub enabled: bool,
    /// First seeded date, `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last seeded date, `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
}

impl SeedSettings {
    /// The inclusive range to seed; a missing bound defaults to `today`.
    pub fn date_range(&self, today: Date) -> Result<(Date, Date), SettingsError> {
        let parse = |value: &Option<String>| match value {
            Some(raw) => {
                parse_visit_date(raw).ok_or_else(|| SettingsError::InvalidDate(raw.clone()))
            }
            None => Ok(today),
        };

        Ok((parse(&self.start_date)?, parse(&self.end_date)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid APP_ENVIRONMENT '{0}', expected 'local' or 'production'")]
    InvalidEnvironment(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

pub fn read_config() -> Result<Settings, SettingsError> {
    let base_path = std::env::current_dir()?;
    let config_directory = base_path.join("config");

    let raw_environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
    let environment = Environment::from_str(&raw_environment)
        .map_err(|_| SettingsError::InvalidEnvironment(raw_environment.clone()))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(config_directory.join(environment_filename)).required(false))
        .add_source(
            config::Environment::with_prefix("PARK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!(
            StorageBackend::from_str("Memory").unwrap(),
            StorageBackend::Memory
        );
        assert_eq!(
            StorageBackend::from_str("postgres").unwrap(),
            StorageBackend::Postgres
        );
        assert!(StorageBackend::from_str("sqlite").is_err());
    }

    #[test]
    fn closed_weekday_parses_case_insensitively() {
        assert_eq!(
            ClosedWeekday::from_str("Tuesday").unwrap(),
            ClosedWeekday::Tuesday
        );
        assert_eq!(
            ClosedWeekday::from_str("SUNDAY").unwrap(),
            ClosedWeekday::Sunday
        );
        assert!(ClosedWeekday::from_str("lunes").is_err());
    }

    #[test]
    fn park_settings_build_calendar() {
        let park = ParkSettings {
            closed_weekday: ClosedWeekday::Tuesday,
        };
        assert_eq!(park.calendar().closed_weekday(), Weekday::Tuesday);
        assert_eq!(
            ParkSettings::default().calendar().closed_weekday(),
            Weekday::Monday
        );
    }

    #[test]
    fn seed_range_defaults_to_today() {
        let today = date!(2025 - 10 - 15);
        let seed = SeedSettings {
            enabled: true,
            start_date: None,
            end_date: Some("2025-10-31".to_string()),
        };

        assert_eq!(
            seed.date_range(today).unwrap(),
            (today, date!(2025 - 10 - 31))
        );
    }

    #[test]
    fn seed_range_rejects_bad_dates() {
        let seed = SeedSettings {
            enabled: true,
            start_date: Some("15/10/2025".to_string()),
            end_date: None,
        };

        assert!(matches!(
            seed.date_range(date!(2025 - 10 - 15)),
            Err(SettingsError::InvalidDate(_))
        ));
    }
}
