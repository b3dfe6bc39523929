use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};
use crate::months::{DEFAULT_SPAN_YEARS, MAX_SPAN_YEARS};

const CONFIG_PATH_ENV_VAR: &str = "CALPAGE_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("calpage").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".calpage.toml"));
    }

    locations
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub min_date: Option<CalendarDate>,
    pub max_date: Option<CalendarDate>,
    pub default_span_years: u32,
    pub state_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            min_date: None,
            max_date: None,
            default_span_years: DEFAULT_SPAN_YEARS,
            state_file: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.default_span_years > MAX_SPAN_YEARS {
            return Err(Error::new(
                ErrorKind::ConfigError,
                &format!(
                    "default_span_years must be at most {}, got {}",
                    MAX_SPAN_YEARS, config.default_span_years
                ),
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::from(ErrorKind::ConfigError)
                .with_msg(&format!("could not read '{}': {}", path.display(), err))
        })?;

        Config::from_toml(&content)
    }
}

/// Loads `path` if given, otherwise the first existing file among the
/// default locations, otherwise the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("using config file {}", path.display());
        return Config::load(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("using config file {}", location.display());
            Config::load(&location)
        }
        None => {
            log::info!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::default().default_span_years, 200);
    }

    #[test]
    fn full_config() {
        let config = Config::from_toml(
            r#"
            min_date = "2020-01-01"
            max_date = "2020-12-31"
            default_span_years = 10
            state_file = "/tmp/calpage/state.toml"
            "#,
        )
        .unwrap();

        assert_eq!(config.min_date, Some(CalendarDate::new(2020, 1, 1)));
        assert_eq!(config.max_date, Some(CalendarDate::new(2020, 12, 31)));
        assert_eq!(config.default_span_years, 10);
        assert_eq!(
            config.state_file,
            Some(PathBuf::from("/tmp/calpage/state.toml"))
        );
    }

    #[test]
    fn bad_date_is_config_error() {
        let err = Config::from_toml("min_date = \"01/01/2020\"").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigError));
    }

    #[test]
    fn oversized_span_is_config_error() {
        let err = Config::from_toml("default_span_years = 3000000000").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigError));

        let config = Config::from_toml("default_span_years = 10000").unwrap();
        assert_eq!(config.default_span_years, MAX_SPAN_YEARS);
    }

    #[test]
    fn env_var_location_comes_first() {
        env::set_var(CONFIG_PATH_ENV_VAR, "/tmp/calpage-test.toml");
        let locations = find_configfile_locations();
        env::remove_var(CONFIG_PATH_ENV_VAR);

        assert_eq!(locations[0], PathBuf::from("/tmp/calpage-test.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(load_suitable_config(Some(Path::new("/nonexistent/calpage.toml"))).is_err());
    }
}
