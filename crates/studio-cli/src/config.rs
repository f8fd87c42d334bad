//! Configuration for the `studio` binary.
//!
//! Provides [`StudioConfig`], loaded from TOML, environment variables, and
//! defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `STUDIO_CONFIG` environment variable
//! 3. XDG default: `~/.config/studio/config.toml`
//! 4. Built-in defaults
//!
//! `STUDIO_<SECTION>_<KEY>` variables override file values. confyg passes
//! them through as strings, so only string fields can be set that way.

use std::net::SocketAddr;
use std::path::PathBuf;

use confyg::{Confygery, env};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use studio_content::CategoryPalette;
use studio_core::traits::ConfigProvider;
use studio_core::{Error, Result};
use studio_llm::{ProviderKind, ProviderSettings};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "STUDIO_CONFIG";
/// Fallback key for the Claude backend.
pub const ANTHROPIC_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Fallback key for the Gemini backend.
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Base path for all project data.
    pub base_path: Option<String>,

    /// Published posts and previews.
    pub content: ContentConfig,

    /// HTTP server.
    pub server: ServerConfig,

    /// Model backend.
    pub llm: LlmConfig,

    /// Contact and newsletter storage.
    pub forms: FormsConfig,

    /// Settings for talking to a running server.
    pub client: ClientConfig,
}

/// Content configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory of published `.mdx` posts.
    pub path: Option<String>,

    /// Badge colour per category, in display order.
    pub category_colors: IndexMap<String, String>,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Host address to bind to.
    pub host: String,
}

/// Model backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `gemini`, `claude` or `mock`.
    pub provider: ProviderKind,

    /// Model override.
    pub model: Option<String>,

    /// API key; falls back to the provider's usual env var.
    pub api_key: Option<String>,

    /// Endpoint override.
    pub base_url: Option<String>,

    /// Attempts to open a stream before giving up.
    pub max_attempts: u32,

    /// First retry delay in milliseconds.
    pub retry_delay_ms: u64,

    /// Output token budget.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: Option<f32>,
}

/// Where form submissions go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStorage {
    /// Kept in memory; lost on restart.
    #[default]
    Memory,
    /// JSON-lines files.
    File,
}

/// Form storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Storage backend.
    pub storage: FormStorage,

    /// Directory for file storage.
    pub path: Option<String>,
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server used by `--remote` commands.
    pub server_url: String,

    /// Where downloaded drafts are written.
    pub download_dir: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            project_name: "studio".to_string(),
            base_path: None,
            content: ContentConfig::default(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            forms: FormsConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        let palette = CategoryPalette::default();
        Self {
            path: None,
            category_colors: palette
                .categories()
                .map(|c| (c.to_string(), palette.color_for(c).to_string()))
                .collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_key: None,
            base_url: None,
            max_attempts: 3,
            retry_delay_ms: 1000,
            max_tokens: studio_generate::service::DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".to_string(),
            download_dir: None,
        }
    }
}

impl StudioConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level("STUDIO");
        for section in ["content", "server", "llm", "forms", "client"] {
            env_opts.add_section(section);
        }
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("studio").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `STUDIO_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "STUDIO", &mut vars);
        Ok(vars)
    }

    /// Settings for building the model provider.
    ///
    /// Without a configured key, the provider's conventional env var is used.
    pub fn provider_settings(&self) -> ProviderSettings {
        let fallback = match self.llm.provider {
            ProviderKind::Claude => std::env::var(ANTHROPIC_KEY_ENV).ok(),
            ProviderKind::Gemini => std::env::var(GEMINI_KEY_ENV).ok(),
            ProviderKind::Mock => None,
        };
        ProviderSettings {
            kind: self.llm.provider,
            model: self.llm.model.clone(),
            api_key: self.llm.api_key.clone().or(fallback),
            base_url: self.llm.base_url.clone(),
            max_attempts: self.llm.max_attempts,
            retry_delay_ms: self.llm.retry_delay_ms,
        }
    }

    /// Category colours for previews.
    pub fn palette(&self) -> CategoryPalette {
        CategoryPalette::new(self.content.category_colors.clone())
    }

    /// Address the server binds to.
    pub fn server_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                Error::config(format!(
                    "Invalid server address {}:{}: {e}",
                    self.server.host, self.server.port
                ))
            })
    }

    /// Directory drafts are downloaded into.
    pub fn download_dir(&self) -> Result<PathBuf> {
        match &self.client.download_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => std::env::current_dir()
                .map_err(|e| Error::config(format!("Could not determine download directory: {e}"))),
        }
    }
}

impl ConfigProvider for StudioConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn base_path(&self) -> Result<PathBuf> {
        match &self.base_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => std::env::current_dir()
                .map_err(|e| Error::config(format!("Could not determine base path: {e}"))),
        }
    }

    fn content_path(&self, content_type: &str) -> Result<PathBuf> {
        let explicit = match content_type {
            "posts" => self.content.path.as_ref(),
            "forms" => self.forms.path.as_ref(),
            _ => None,
        };
        match explicit {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(self.base_path()?.join(content_type)),
        }
    }
}

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                flatten_toml_value(val, &format!("{prefix}_{}", key.to_uppercase()), out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
