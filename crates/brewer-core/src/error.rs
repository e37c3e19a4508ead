use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrewError {
    #[error("config not found at {0}: run 'brewer config init'")]
    ConfigNotFound(String),

    #[error("invalid color symbol '{0}': expected one of W, U, B, R, G")]
    InvalidColor(String),

    #[error("mirror error: {0}")]
    Mirror(String),

    #[error("mirror is empty: run 'brewer mirror import <oracle-cards.json>'")]
    MirrorEmpty,

    #[error("search error: {0}")]
    Search(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrewError>;
