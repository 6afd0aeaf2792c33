use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use dirs_next::config_dir;
use letterboxd_core::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "letterboxd_sync";
const CONFIG_NAME: &str = "config.json";

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            user_agent: default_user_agent(),
            base_url: default_base_url(),
        }
    }
}

impl SyncConfig {
    pub fn apply_defaults(&mut self) {
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
        if self.base_url.trim().is_empty() {
            self.base_url = default_base_url();
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            user_agent: Some(self.user_agent.clone()),
            ..ClientOptions::default()
        }
    }

    pub fn select_account(&self, username: Option<&str>) -> Result<&Account> {
        match username {
            Some(name) => self
                .accounts
                .iter()
                .find(|account| account.username.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("no account named '{name}' in the configuration")),
            None => self
                .accounts
                .iter()
                .find(|account| account.enabled)
                .ok_or_else(|| anyhow!("the configuration has no enabled account")),
        }
    }
}

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: SyncConfig,
}

impl ConfigStore {
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_path(custom_path)?;
        if !path.exists() {
            bail!(
                "configuration file not found: {} (create it with `add-account`)",
                path.display()
            );
        }
        let mut config = read_config(&path)?;
        config.apply_defaults();
        Ok(Self { path, config })
    }

    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_path(custom_path)?;
        let mut config = if path.exists() {
            read_config(&path)?
        } else {
            SyncConfig::default()
        };
        config.apply_defaults();
        Ok(Self { path, config })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write config file: {}", self.path.display()))?;
        Ok(())
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn upsert_account(&mut self, account: Account) -> Result<()> {
        match self
            .config
            .accounts
            .iter_mut()
            .find(|existing| existing.username.eq_ignore_ascii_case(&account.username))
        {
            Some(existing) => *existing = account,
            None => self.config.accounts.push(account),
        }
        self.save()
    }
}

fn read_config(path: &Path) -> Result<SyncConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn resolve_path(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path),
        None => config_path_in(config_dir()),
    }
}

fn config_path_in(base: Option<PathBuf>) -> Result<PathBuf> {
    let mut base = base.ok_or_else(|| {
        anyhow!("no user configuration directory on this system, pass --config-path <path>")
    })?;
    base.push(APP_DIR);
    base.push(CONFIG_NAME);
    Ok(base)
}
