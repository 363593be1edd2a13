use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locator config {path}: {source}")]
    LocatorFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locator config: {0}")]
    LocatorFileParse(#[source] serde_yaml::Error),

    #[error("invalid locator config: {0}")]
    Validation(String),
}

/// Errors reading or writing the scraped dataset file.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to access dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset file {path} is not a valid store list: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
