use super::AppConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on
/// error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    parse_config(&contents, path)
}

/// Parse a TOML configuration string, falling back to defaults on error.
pub fn parse_config(contents: &str, origin: &Path) -> AppConfig {
    match toml::from_str::<AppConfig>(contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %origin.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, ThemeMode};

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = parse_config("", Path::new("test.toml"));
        assert_eq!(cfg.engine_sources, vec!["builtin".to_string()]);
        assert_eq!(cfg.theme, ThemeMode::Day);
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let cfg = parse_config(
            "theme = \"night\"\nmagnifier_zoom = 3.0\nlog_level = \"debug\"\n",
            Path::new("test.toml"),
        );
        assert_eq!(cfg.theme, ThemeMode::Night);
        assert!((cfg.magnifier_zoom - 3.0).abs() < f32::EPSILON);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert!((cfg.nav_hide_delay_secs - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_document_falls_back_to_defaults() {
        let cfg = parse_config("theme = [not toml", Path::new("test.toml"));
        assert_eq!(cfg.theme, ThemeMode::Day);
    }
}
