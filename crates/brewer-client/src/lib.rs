//! `brewer-client`: async drivers for Scryfall and EDHREC, and the
//! resolve-and-score pipeline built on them.
//!
//! # Architecture
//!
//! ```text
//! card names
//!     │
//!     ▼
//! lookup_pool     ← CardSource::lookup (Scryfall /cards/named or the mirror)
//!     │
//!     ▼
//! resolve         ← six PairingRules fan out CardSource::search, merged in order
//!     │
//!     ▼
//! score_candidates← StatsSource::deck_stats per candidate slug (EDHREC)
//!     │
//!     ▼
//! rank            ← score, popularity, name; top N
//! ```
//!
//! Every request to a service passes through that service's [`Throttle`].
//! Failures of a single rule or candidate are reported as [`Diagnostic`]s and
//! never abort the brew.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use brewer_client::{brew, BrewOptions, CardBackend, Edhrec, Scryfall};
//! use brewer_core::config::Config;
//!
//! let cfg = Config::default();
//! let cards = CardBackend::Remote(Scryfall::new(&cfg)?);
//! let stats = Edhrec::new(&cfg)?;
//! let names = vec!["Kaalia of the Vast".to_string()];
//! let report = brew(&cards, &stats, &names, &BrewOptions::default()).await;
//! for c in &report.ranked {
//!     println!("{:>2}  {}", c.synergy.score, c.display_name);
//! }
//! ```

pub mod edhrec;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod scorer;
pub mod scryfall;
pub mod source;
pub mod throttle;

pub(crate) mod http;

pub use edhrec::Edhrec;
pub use error::ClientError;
pub use pipeline::{brew, lookup_pool, BrewOptions, BrewReport, Pool, SkipReason, SkippedCard};
pub use resolver::{resolve, Diagnostic, Resolution};
pub use scorer::{score_candidates, score_name};
pub use scryfall::Scryfall;
pub use source::{CardBackend, CardSource, MirrorSource, StatsSource};
pub use throttle::Throttle;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;
