//! Configuration and data path management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default width of the neutral compound-score window (`±0.05`).
pub const DEFAULT_NEUTRAL_BAND: f64 = 0.05;

/// Positive scores below this are downgraded to neutral when the text
/// contains a dampening token.
pub const DEFAULT_DAMPENING_CEILING: f64 = 0.20;

/// Default number of keywords attached to each review.
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// File name of the valence lexicon inside the resources directory.
pub const LEXICON_FILE: &str = "sentiment_lexicon.txt";

/// Paths used by the pipeline, API and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// SQLite database (`data/db/reviews.db`).
    pub db_path: PathBuf,
    /// Raw input CSV (`data/raw/reviews.csv`).
    pub raw_csv: PathBuf,
    /// Processed CSV written by API-triggered runs.
    pub processed_csv: PathBuf,
    /// Dashboard export CSV.
    pub export_csv: PathBuf,
    /// Linguistic resources (lexicon).
    pub resources: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/db/reviews.db"),
            raw_csv: PathBuf::from("data/raw/reviews.csv"),
            processed_csv: PathBuf::from("data/processed/reviews_from_api.csv"),
            export_csv: PathBuf::from("data/export/reviews_for_dashboard.csv"),
            resources: PathBuf::from("resources"),
        }
    }
}

impl DataPaths {
    /// Read paths from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env_path("AMZ_DB_PATH").unwrap_or(defaults.db_path),
            raw_csv: env_path("AMZ_RAW_CSV").unwrap_or(defaults.raw_csv),
            processed_csv: env_path("REVIEWLENS_PROCESSED_CSV").unwrap_or(defaults.processed_csv),
            export_csv: env_path("AMZ_EXPORT_CSV").unwrap_or(defaults.export_csv),
            resources: env_path("REVIEWLENS_RESOURCES").unwrap_or(defaults.resources),
        }
    }

    /// Make every path absolute against `base` so a changed working
    /// directory does not move them.
    pub fn resolve(self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let abs = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            db_path: abs(self.db_path),
            raw_csv: abs(self.raw_csv),
            processed_csv: abs(self.processed_csv),
            export_csv: abs(self.export_csv),
            resources: abs(self.resources),
        }
    }

    /// Path of the valence lexicon file.
    pub fn lexicon_file(&self) -> PathBuf {
        self.resources.join(LEXICON_FILE)
    }
}

/// Settings for the NLP engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpConfig {
    /// Valence lexicon for compound scoring. `None` disables the scorer.
    pub lexicon_path: Option<PathBuf>,
    /// Skip every resource-backed strategy.
    pub force_fallback: bool,
    /// Neutral window half-width.
    pub neutral_band: f64,
    /// Dampening cut-off for mildly positive texts.
    pub dampening_ceiling: f64,
    /// Keywords per record.
    pub keyword_count: usize,
}

impl Default for NlpConfig {
    /// Defaults point at the bundled lexicon under `resources/`, relative to
    /// the working directory.
    fn default() -> Self {
        Self {
            lexicon_path: Some(DataPaths::default().lexicon_file()),
            force_fallback: false,
            neutral_band: DEFAULT_NEUTRAL_BAND,
            dampening_ceiling: DEFAULT_DAMPENING_CEILING,
            keyword_count: DEFAULT_KEYWORD_COUNT,
        }
    }
}

impl NlpConfig {
    /// Configuration with every fallback forced.
    pub fn fallback_only() -> Self {
        Self {
            force_fallback: true,
            ..Self::default()
        }
    }
}

/// Top-level ReviewLens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server port.
    pub port: u16,
    pub data_paths: DataPaths,
    pub nlp: NlpConfig,
}

impl AppConfig {
    /// Create configuration from environment and defaults.
    ///
    /// A set but unparseable `PORT` or `REVIEWLENS_KEYWORDS` is a
    /// [`Error::Config`].
    pub fn from_env() -> Result<Self> {
        let port = parse_setting("PORT", std::env::var("PORT").ok())?.unwrap_or(DEFAULT_PORT);

        let cwd = std::env::current_dir()?;
        let data_paths = DataPaths::from_env().resolve(&cwd);

        let force_fallback = std::env::var("REVIEWLENS_NLP_FALLBACK")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let keyword_count =
            parse_setting("REVIEWLENS_KEYWORDS", std::env::var("REVIEWLENS_KEYWORDS").ok())?
                .unwrap_or(DEFAULT_KEYWORD_COUNT);

        let nlp = NlpConfig {
            lexicon_path: Some(data_paths.lexicon_file()),
            force_fallback,
            keyword_count,
            ..NlpConfig::default()
        };

        Ok(Self {
            port,
            data_paths,
            nlp,
        })
    }
}

/// Parse an optional setting. Unset or blank is `None`.
fn parse_setting<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("Invalid value for {}: {:?}", key, v))),
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_makes_paths_absolute() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = DataPaths::default().resolve(dir.path());
        assert!(paths.db_path.is_absolute());
        assert!(paths.db_path.ends_with("data/db/reviews.db"));
        assert_eq!(
            paths.lexicon_file(),
            dir.path().join("resources").join(LEXICON_FILE)
        );
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("elsewhere.db");
        let paths = DataPaths {
            db_path: db.clone(),
            ..DataPaths::default()
        }
        .resolve("/tmp");
        assert_eq!(paths.db_path, db);
    }

    #[test]
    fn test_nlp_defaults() {
        let cfg = NlpConfig::default();
        assert_eq!(cfg.neutral_band, 0.05);
        assert_eq!(cfg.dampening_ceiling, 0.20);
        assert_eq!(cfg.keyword_count, 5);
        assert!(NlpConfig::fallback_only().force_fallback);
        assert_eq!(
            cfg.lexicon_path,
            Some(PathBuf::from("resources").join(LEXICON_FILE))
        );
    }

    #[test]
    fn test_parse_setting() {
        assert_eq!(parse_setting::<u16>("PORT", None).unwrap(), None);
        assert_eq!(parse_setting::<u16>("PORT", Some("  ".into())).unwrap(), None);
        assert_eq!(parse_setting::<u16>("PORT", Some(" 9000 ".into())).unwrap(), Some(9000));

        let err = parse_setting::<u16>("PORT", Some("http".into())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("PORT"));
        assert!(parse_setting::<usize>("REVIEWLENS_KEYWORDS", Some("-1".into())).is_err());
    }
}
