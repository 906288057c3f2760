use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load settings from a YAML base file layered with `APP_`-prefixed
/// environment variables (`APP_IDENTITY__URL` overrides `identity.url`).
///
/// A `.env` file in the working directory is loaded first when present.
pub fn load_layered<T: DeserializeOwned>(base_file: &Path) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let settings = Cfg::builder()
        .add_source(File::from(base_file).required(true))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        server: SampleServer,
    }

    #[derive(Debug, Deserialize)]
    struct SampleServer {
        port: u16,
    }

    #[test]
    fn missing_base_file_is_a_config_error() {
        let result = load_layered::<Sample>(Path::new("/nonexistent/leadgen/base.yaml"));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn reads_yaml_base_file() {
        let dir = std::env::temp_dir().join(format!("leadgen-core-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("base.yaml");
        std::fs::write(&file, "server:\n  port: 8123\n").unwrap();

        let sample: Sample = load_layered(&file).unwrap();
        assert_eq!(sample.server.port, 8123);

        std::fs::remove_dir_all(&dir).ok();
    }
}
