//! Connection settings resolution
//!
//! A setting comes from the first source that has it: command-line flag,
//! then environment variable (both handled by clap), then the YAML config
//! file (`--config` or `$HOME/.solar.yaml`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use swis_client::SwisClient;
use tracing::debug;

use crate::cli::GlobalOptions;
use crate::error::CliError;

/// Default config file name, looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".solar.yaml";

/// Contents of the YAML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
}

impl FileSettings {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, CliError> {
        // An empty file is an empty document, not an error
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config file, or `$HOME/.solar.yaml` if it exists
    ///
    /// An explicit path must be readable; the default file is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "using config file");
            return Self::load(path);
        }

        match default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "using config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `$HOME/.solar.yaml`
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Fully resolved connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: String,
    pub username: String,
    pub password: String,
    pub insecure: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl Settings {
    /// Merge flags/environment over the config file
    pub fn resolve(global: &GlobalOptions, file: FileSettings) -> Result<Self, CliError> {
        let server = global.server.clone().or(file.server).ok_or(CliError::MissingSetting("server"))?;
        let username = global
            .username
            .clone()
            .or(file.username)
            .ok_or(CliError::MissingSetting("username"))?;
        let password = global
            .password
            .clone()
            .or(file.password)
            .ok_or(CliError::MissingSetting("password"))?;
        let insecure = global.insecure.or(file.insecure).unwrap_or(false);

        Ok(Self {
            server,
            username,
            password,
            insecure,
        })
    }

    /// Load the config file named by `global` and resolve against it
    pub fn load(global: &GlobalOptions) -> Result<Self, CliError> {
        let file = FileSettings::discover(global.config.as_deref())?;
        Self::resolve(global, file)
    }

    /// Build a client from these settings
    pub fn connect(&self) -> anyhow::Result<SwisClient> {
        let client = SwisClient::new_legacy(
            self.server.clone(),
            self.username.clone(),
            self.password.clone(),
            self.insecure,
        )?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> FileSettings {
        FileSettings {
            server: Some("file-server".to_string()),
            username: Some("file-user".to_string()),
            password: Some("file-pass".to_string()),
            insecure: Some(true),
        }
    }

    #[test]
    fn test_file_fills_missing_flags() {
        let settings = Settings::resolve(&GlobalOptions::default(), file()).unwrap();

        assert_eq!(settings.server, "file-server");
        assert_eq!(settings.username, "file-user");
        assert_eq!(settings.password, "file-pass");
        assert!(settings.insecure);
    }

    #[test]
    fn test_flags_override_file() {
        let global = GlobalOptions {
            server: Some("flag-server".to_string()),
            password: Some("flag-pass".to_string()),
            insecure: Some(false),
            ..GlobalOptions::default()
        };

        let settings = Settings::resolve(&global, file()).unwrap();

        assert_eq!(settings.server, "flag-server");
        assert_eq!(settings.username, "file-user");
        assert_eq!(settings.password, "flag-pass");
        assert!(!settings.insecure);
    }

    #[test]
    fn test_missing_setting() {
        let global = GlobalOptions {
            server: Some("orion".to_string()),
            username: Some("admin".to_string()),
            ..GlobalOptions::default()
        };

        let err = Settings::resolve(&global, FileSettings::default()).unwrap_err();

        assert!(matches!(err, CliError::MissingSetting("password")));
        assert!(err.to_string().contains("ORION_PASSWORD"));
    }

    #[test]
    fn test_insecure_defaults_to_false() {
        let global = GlobalOptions {
            server: Some("orion".to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..GlobalOptions::default()
        };

        let settings = Settings::resolve(&global, FileSettings::default()).unwrap();
        assert!(!settings.insecure);
    }

    #[test]
    fn test_parse_yaml() {
        let raw = "server: orion.example.com\nusername: admin\npassword: secret\ninsecure: true\n";
        let parsed = FileSettings::parse(raw, Path::new("test.yaml")).unwrap();

        assert_eq!(parsed, FileSettings {
            server: Some("orion.example.com".to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            insecure: Some(true),
        });
    }

    #[test]
    fn test_parse_partial_and_empty_yaml() {
        let parsed = FileSettings::parse("server: orion\n", Path::new("test.yaml")).unwrap();
        assert_eq!(parsed.server.as_deref(), Some("orion"));
        assert_eq!(parsed.username, None);

        assert_eq!(FileSettings::parse("", Path::new("test.yaml")).unwrap(), FileSettings::default());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = FileSettings::parse("server: [unclosed", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, CliError::ConfigParse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = FileSettings::discover(Some(Path::new("/nonexistent/solar.yaml"))).unwrap_err();
        assert!(matches!(err, CliError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("solarcmd-settings-{}.yaml", std::process::id()));
        std::fs::write(&path, "server: disk-server\nusername: u\npassword: p\n").unwrap();

        let global = GlobalOptions {
            config: Some(path.clone()),
            ..GlobalOptions::default()
        };
        let settings = Settings::load(&global);
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.server, "disk-server");
        assert!(!settings.insecure);
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = Settings::resolve(&GlobalOptions::default(), file()).unwrap();
        assert!(!format!("{settings:?}").contains("file-pass"));
    }

    #[test]
    fn test_connect() {
        let settings = Settings::resolve(&GlobalOptions::default(), file()).unwrap();
        let client = settings.connect().unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://file-server:17778/SolarWinds/InformationService/v3/Json/"
        );
    }
}
