// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{ApiSettings, AprSettings, CacheSettings, Settings};

/// Loads the application configuration.
///
/// `config.toml` provides the defaults; an `ARGUS`-prefixed environment
/// source is layered on top so endpoint URLs and other secrets never have to
/// live in the file (e.g. `ARGUS__API__SUBGRAPH_URL`).
pub fn load() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(
            config::Environment::with_prefix("ARGUS")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const SAMPLE: &str = r#"
        [api]
        subgraph_url = "https://example.org/subgraph"
        price_listener_url = "https://example.org/prices"

        [cache]
        data_dir = "data"
        ttl_minutes = 1

        [apr]
        max_window_days = 30
        max_smoothing_depth = 15
    "#;

    fn parse(toml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn sample_settings_parse_and_validate() {
        let settings = parse(SAMPLE);

        assert!(settings.validate().is_ok());
        assert_eq!(settings.apr.max_window_days, 30);
        assert_eq!(settings.cache.ttl_minutes, 1);
    }

    #[test]
    fn empty_endpoint_urls_fail_validation() {
        let settings = parse(&SAMPLE.replace("https://example.org/subgraph", ""));

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn zero_table_dimensions_fail_validation() {
        let settings = parse(&SAMPLE.replace("max_window_days = 30", "max_window_days = 0"));

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
