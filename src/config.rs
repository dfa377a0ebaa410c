use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};

/// identity used when the config carries no user section
pub const DEFAULT_IDENTITY: &str = "sgit <sgit@localhost>";

/// repository configuration stored in the config file
///
/// the core only consumes the resolved author identity from here;
/// everything else is informational.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoreConfig {
    pub repository_format_version: u32,
    pub filemode: bool,
    pub bare: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            repository_format_version: 0,
            filemode: true,
            bare: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl Config {
    /// load config from file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    /// resolved `"Name <email>"` identity for author/committer defaults
    pub fn identity(&self) -> String {
        match &self.user {
            Some(user) => format!("{} <{}>", user.name, user.email),
            None => DEFAULT_IDENTITY.to_string(),
        }
    }

    /// set the user identity
    pub fn set_user(&mut self, name: impl Into<String>, email: impl Into<String>) {
        self.user = Some(UserConfig {
            name: name.into(),
            email: email.into(),
        });
    }
}
