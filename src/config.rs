use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Display preferences loaded from an optional TOML file. Usage data is
/// never persisted; this only covers how output is rendered.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) compact: bool,
    /// "asc" or "desc"
    #[serde(default)]
    pub(crate) order: Option<String>,
    /// "auto", "always", or "never"
    #[serde(default)]
    pub(crate) color: Option<String>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

impl Config {
    pub(crate) fn load() -> Self {
        for path in Self::config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }
        Self::default()
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // XDG config: ~/.config/cursorstats/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("cursorstats").join("config.toml"));
        }

        // Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("cursorstats").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // Home directory fallback: ~/.cursorstats.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cursorstats.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_are_probed() {
        assert!(!Config::config_paths().is_empty());
    }

    #[test]
    fn parses_partial_config() {
        let config: Config = toml::from_str("no_color = true\norder = \"asc\"").unwrap();
        assert!(config.no_color);
        assert_eq!(config.order.as_deref(), Some("asc"));
        assert!(config.timezone.is_none());
        assert!(!config.compact);
    }

    #[test]
    fn empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.no_color);
        assert!(config.locale.is_none());
    }
}
