use anyhow::Context as _;
use brewer_client::{CardBackend, Edhrec, MirrorSource, Scryfall};
use brewer_core::config::Config;
use brewer_core::paths;
use std::path::{Path, PathBuf};

/// Effective settings for one invocation: the config file plus flag and
/// environment overrides.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    mirror_override: Option<PathBuf>,
}

impl Context {
    pub fn load(
        explicit: Option<&Path>,
        mirror: Option<PathBuf>,
        scryfall_url: Option<String>,
        edhrec_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let config_path = match explicit {
            Some(p) => p.to_path_buf(),
            None => paths::default_config_path()?,
        };
        let mut config = Config::load_or_default(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;

        if let Some(url) = scryfall_url {
            config.scryfall.base_url = url;
        }
        if let Some(url) = edhrec_url {
            config.edhrec.base_url = url;
        }

        Ok(Self {
            config,
            config_path,
            mirror_override: mirror,
        })
    }

    /// Mirror location: `--mirror`, then `mirror.path`, then the default.
    pub fn mirror_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(p) = &self.mirror_override {
            return Ok(p.clone());
        }
        if let Some(m) = &self.config.mirror {
            return Ok(m.path.clone());
        }
        Ok(paths::default_mirror_path()?)
    }

    /// The mirror when `--mirror` is given or the config enables it,
    /// otherwise Scryfall.
    pub fn card_backend(&self) -> anyhow::Result<CardBackend> {
        let local = self
            .mirror_override
            .as_deref()
            .or_else(|| self.config.active_mirror());
        match local {
            Some(path) => {
                tracing::info!(path = %path.display(), "using local mirror");
                let source = MirrorSource::open(path)
                    .with_context(|| format!("failed to open mirror {}", path.display()))?;
                Ok(CardBackend::Local(source))
            }
            None => Ok(CardBackend::Remote(
                Scryfall::new(&self.config).context("failed to build Scryfall client")?,
            )),
        }
    }

    pub fn stats(&self) -> anyhow::Result<Edhrec> {
        Edhrec::new(&self.config).context("failed to build EDHREC client")
    }
}

pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start tokio runtime")
}
