use crate::error::{BrewError, Result};
use crate::score::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScryfallConfig / EdhrecConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallConfig {
    #[serde(default = "default_scryfall_url")]
    pub base_url: String,
    /// Minimum gap between request starts.
    #[serde(default = "default_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_scryfall_url() -> String {
    "https://api.scryfall.com".to_string()
}

fn default_delay_ms() -> u64 {
    50
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        Self {
            base_url: default_scryfall_url(),
            request_delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdhrecConfig {
    #[serde(default = "default_edhrec_url")]
    pub base_url: String,
    #[serde(default = "default_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_edhrec_url() -> String {
    "https://json.edhrec.com".to_string()
}

impl Default for EdhrecConfig {
    fn default() -> Self {
        Self {
            base_url: default_edhrec_url(),
            request_delay_ms: default_delay_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on Scryfall result pages followed per search.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_pages() -> u32 {
    6
}

fn default_user_agent() -> String {
    concat!("brewer/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
        }
    }
}

// ---------------------------------------------------------------------------
// MirrorConfig / OutputConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// SQLite file built by `brewer mirror import`.
    #[serde(default = "default_mirror_path")]
    pub path: PathBuf,
    /// Use the mirror for card lookup and commander search.
    #[serde(default)]
    pub enabled: bool,
}

fn default_mirror_path() -> PathBuf {
    crate::paths::default_mirror_path().unwrap_or_else(|_| PathBuf::from(crate::paths::MIRROR_FILE))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default)]
    pub include_zero: bool,
}

fn default_top() -> usize {
    10
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            include_zero: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub scryfall: ScryfallConfig,
    #[serde(default)]
    pub edhrec: EdhrecConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<MirrorConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            scoring: ScoringWeights::default(),
            scryfall: ScryfallConfig::default(),
            edhrec: EdhrecConfig::default(),
            http: HttpConfig::default(),
            mirror: None,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BrewError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(BrewError::ConfigNotFound(_)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::atomic_write(path, self.to_yaml()?.as_bytes())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The mirror path when the mirror is switched on.
    pub fn active_mirror(&self) -> Option<&Path> {
        self.mirror
            .as_ref()
            .filter(|m| m.enabled)
            .map(|m| m.path.as_path())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut warn = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message });
        };

        let s = &self.scoring;
        if !(s.scale > 0.0) {
            warn(
                WarnLevel::Error,
                format!("scoring.scale must be positive, got {}", s.scale),
            );
        }
        if s.match_base == 0 {
            warn(
                WarnLevel::Warning,
                "scoring.match_base is 0: matching cards add nothing to a score".to_string(),
            );
        }
        if !(0.0..=1.0).contains(&s.inclusion_threshold) {
            warn(
                WarnLevel::Warning,
                format!(
                    "scoring.inclusion_threshold={} is outside 0..1 and can never or always match",
                    s.inclusion_threshold
                ),
            );
        }
        if !(-1.0..=1.0).contains(&s.synergy_threshold) {
            warn(
                WarnLevel::Warning,
                format!(
                    "scoring.synergy_threshold={} is outside -1..1",
                    s.synergy_threshold
                ),
            );
        }

        for (name, url, delay) in [
            ("scryfall", &self.scryfall.base_url, self.scryfall.request_delay_ms),
            ("edhrec", &self.edhrec.base_url, self.edhrec.request_delay_ms),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warn(
                    WarnLevel::Error,
                    format!("{name}.base_url '{url}' is not an http(s) URL"),
                );
            }
            if delay < 50 {
                warn(
                    WarnLevel::Warning,
                    format!("{name}.request_delay_ms={delay} is below the 50ms courtesy delay"),
                );
            }
        }

        if self.http.timeout_secs == 0 {
            warn(
                WarnLevel::Error,
                "http.timeout_secs must be at least 1".to_string(),
            );
        }
        if self.http.max_pages == 0 {
            warn(
                WarnLevel::Warning,
                "http.max_pages is 0: searches will return nothing".to_string(),
            );
        }
        if self.output.top == 0 {
            warn(
                WarnLevel::Warning,
                "output.top is 0: brew will print no commanders".to_string(),
            );
        }
        if let Some(m) = self.active_mirror() {
            if !m.exists() {
                warn(
                    WarnLevel::Warning,
                    format!("mirror.path '{}' does not exist yet", m.display()),
                );
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
