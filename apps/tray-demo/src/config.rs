//! Demo configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/notifyarea/demo.toml`
//! - Windows: `%APPDATA%/notifyarea/demo.toml`

use std::path::{Path, PathBuf};

use notifyarea_icon::TipType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tooltip presentation, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipMode {
    #[default]
    Standard,
    RichPopup,
}

impl From<TipMode> for TipType {
    fn from(mode: TipMode) -> Self {
        match mode {
            TipMode::Standard => TipType::Standard,
            TipMode::RichPopup => TipType::RichPopup,
        }
    }
}

/// Demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Tooltip shown over the icon.
    #[serde(default = "default_tip")]
    pub tip: String,

    #[serde(default)]
    pub tip_mode: TipMode,

    /// Stable icon identity; generated on first run.
    #[serde(default)]
    pub guid: Option<Uuid>,

    /// Window class registered for the hidden window.
    #[serde(default = "default_class_name")]
    pub class_name: String,

    #[serde(default = "default_balloon_title")]
    pub balloon_title: String,

    #[serde(default = "default_balloon_text")]
    pub balloon_text: String,

    /// Show a balloon as soon as the icon appears.
    #[serde(default)]
    pub balloon_on_start: bool,

    #[serde(default = "default_true")]
    pub balloon_sound: bool,

    /// Heartbeat period in milliseconds (0 = off). Each beat refreshes the
    /// tooltip with the beat count.
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u32,
}

fn default_tip() -> String {
    "notifyarea demo".into()
}

fn default_class_name() -> String {
    "NotifyAreaDemoWndClass".into()
}

fn default_balloon_title() -> String {
    "notifyarea".into()
}

fn default_balloon_text() -> String {
    "The demo icon is running.".into()
}

fn default_true() -> bool {
    true
}

fn default_heartbeat_ms() -> u32 {
    5000
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tip: default_tip(),
            tip_mode: TipMode::default(),
            guid: None,
            class_name: default_class_name(),
            balloon_title: default_balloon_title(),
            balloon_text: default_balloon_text(),
            balloon_on_start: false,
            balloon_sound: default_true(),
            heartbeat_ms: default_heartbeat_ms(),
        }
    }
}

impl DemoConfig {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let exists = path.exists();
        let mut config = if exists {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            DemoConfig::default()
        };

        // Persist the generated identity so the shell keeps the icon's
        // position across runs.
        if !exists || config.guid.is_none() {
            config.guid.get_or_insert_with(Uuid::new_v4);
            config.save_to(path)?;
        }
        Ok(config)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("notifyarea")
            .join("demo.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("notifyarea").join("demo.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/notifyarea/demo.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DemoConfig::default();
        assert_eq!(config.tip, "notifyarea demo");
        assert_eq!(config.tip_mode, TipMode::Standard);
        assert!(config.guid.is_none());
        assert!(config.balloon_sound);
        assert!(!config.balloon_on_start);
        assert_eq!(config.heartbeat_ms, 5000);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: DemoConfig = toml::from_str(
            r#"
            tip = "build server"
            tip_mode = "rich_popup"
            "#,
        )
        .unwrap();
        assert_eq!(config.tip, "build server");
        assert_eq!(config.tip_mode, TipMode::RichPopup);
        assert_eq!(TipType::from(config.tip_mode), TipType::RichPopup);
        assert_eq!(config.class_name, "NotifyAreaDemoWndClass");
        assert_eq!(config.heartbeat_ms, 5000);
    }

    #[test]
    fn unknown_tip_mode_is_rejected() {
        assert!(toml::from_str::<DemoConfig>(r#"tip_mode = "balloon""#).is_err());
    }

    #[test]
    fn first_load_creates_file_with_guid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("demo.toml");

        let first = DemoConfig::load_from(&path).unwrap();
        assert!(path.exists());
        let guid = first.guid.expect("generated guid");

        let second = DemoConfig::load_from(&path).unwrap();
        assert_eq!(second.guid, Some(guid));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demo.toml");

        let config = DemoConfig {
            tip: "SaveTest".into(),
            guid: Some(Uuid::from_u128(7)),
            heartbeat_ms: 0,
            ..DemoConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = DemoConfig::load_from(&path).unwrap();
        assert_eq!(loaded.tip, "SaveTest");
        assert_eq!(loaded.guid, Some(Uuid::from_u128(7)));
        assert_eq!(loaded.heartbeat_ms, 0);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demo.toml");
        DemoConfig::default().save_to(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("notifyarea"));
    }
}
