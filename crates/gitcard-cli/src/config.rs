use axum::http::HeaderValue;
use gitcard::{CardConfig, DEFAULT_API_BASE, EmbeddedImage};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOGIN: &str = "octocat";
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=3600";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Process-level settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Account rendered on every request.
    pub login: String,
    pub token: Option<String>,
    pub api_base: String,
    pub mascot_path: Option<PathBuf>,
    pub cache_control: HeaderValue,
    pub card: CardConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host: IpAddr = non_empty("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HOST"))?;
        let port = match non_empty("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue("PORT"))?,
            None => DEFAULT_PORT,
        };
        let cache_control = HeaderValue::from_str(
            &non_empty("CACHE_CONTROL").unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string()),
        )
        .map_err(|_| ConfigError::InvalidValue("CACHE_CONTROL"))?;

        Ok(Self {
            addr: SocketAddr::new(host, port),
            login: non_empty("GITHUB_USERNAME").unwrap_or_else(|| DEFAULT_LOGIN.to_string()),
            token: non_empty("GITHUB_TOKEN"),
            api_base: non_empty("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            mascot_path: non_empty("MASCOT_PATH").map(PathBuf::from),
            cache_control,
            card: CardConfig::from_lookup(&lookup)?,
        })
    }

    /// Reads the mascot once; `None` when no path is configured.
    pub fn load_mascot(&self) -> Result<Option<EmbeddedImage>, ConfigError> {
        let Some(path) = self.mascot_path.as_deref() else {
            return Ok(None);
        };
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Mascot {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(EmbeddedImage::new(Some(image_mime(path)), bytes)))
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
    #[error(transparent)]
    Card(#[from] gitcard_core::Error),
    #[error("failed to read mascot image {path:?}: {source}")]
    Mascot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.login, DEFAULT_LOGIN);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.cache_control, DEFAULT_CACHE_CONTROL);
        assert!(config.token.is_none());
        assert!(config.load_mascot().unwrap().is_none());
    }

    #[test]
    fn overrides() {
        let config = resolve(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("GITHUB_USERNAME", "mona"),
            ("GITHUB_TOKEN", "secret"),
            ("CACHE_CONTROL", "no-cache"),
            ("SHOW_NESSIE_IMAGE", "false"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.login, "mona");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.cache_control, "no-cache");
        assert!(!config.card.show_mascot);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            resolve(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue("PORT"))
        ));
        assert!(matches!(
            resolve(&[("CACHE_CONTROL", "no-cache\u{0}x")]),
            Err(ConfigError::InvalidValue("CACHE_CONTROL"))
        ));
        assert!(matches!(
            resolve(&[("NAME_FILL_COLOR", "red;}")]),
            Err(ConfigError::Card(_))
        ));
    }

    #[test]
    fn mascot_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mascot.JPG");
        std::fs::write(&path, b"jpeg").unwrap();
        let config = resolve(&[("MASCOT_PATH", path.to_str().unwrap())]).unwrap();
        let mascot = config.load_mascot().unwrap().expect("mascot");
        assert_eq!(mascot.mime, "image/jpeg");
        assert_eq!(&mascot.bytes[..], b"jpeg");

        let missing = resolve(&[("MASCOT_PATH", "/nonexistent/mascot.png")]).unwrap();
        assert!(matches!(missing.load_mascot(), Err(ConfigError::Mascot { .. })));
    }
}
