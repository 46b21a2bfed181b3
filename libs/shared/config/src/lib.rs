use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_path: String,
    pub bind_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            storage_path: env::var("POCKYDOC_STORAGE_PATH")
                .unwrap_or_else(|_| {
                    warn!("POCKYDOC_STORAGE_PATH not set, using ./pockydoc-store.json");
                    "./pockydoc-store.json".to_string()
                }),
            bind_port: env::var("POCKYDOC_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| {
                    warn!("POCKYDOC_PORT not set or invalid, using 3000");
                    3000
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - storage path is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.storage_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_configured() {
        let config = AppConfig {
            storage_path: "./store.json".to_string(),
            bind_port: 3000,
        };
        assert!(config.is_configured());
    }

    #[test]
    fn test_empty_storage_path_is_not_configured() {
        let config = AppConfig {
            storage_path: String::new(),
            bind_port: 3000,
        };
        assert!(!config.is_configured());
    }
}
