use super::Config;
use crate::error::{ConfigError, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Default location: `~/.depthgate/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        Ok(home.join(".depthgate").join("config.toml"))
    }

    /// Load the config at the default location, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        Self::load_or_init_at(Self::default_path()?)
    }

    /// Load `config_path`, or write defaults there if it does not exist yet.
    /// Env overrides are applied after the first save so they never persist.
    pub fn load_or_init_at(config_path: PathBuf) -> Result<Self> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }

        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }

        let mut config = Self {
            config_path,
            ..Self::default()
        };
        config.validate()?;
        config.save()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from an explicit path. A missing file yields
    /// defaults without touching the filesystem.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str::<Config>(&contents).map_err(|e| {
                ConfigError::Load(format!("failed to parse {}: {e}", path.display()))
            })?
        } else {
            Self::default()
        };
        config.config_path = path.to_path_buf();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Load(format!("failed to serialize config: {e}")))?;
        fs::write(&self.config_path, toml_str).map_err(ConfigError::Io)?;
        Ok(())
    }
}
