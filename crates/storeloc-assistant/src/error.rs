use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("failed to read model file {path}: {source}")]
    ModelFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file: {0}")]
    ModelFileParse(#[from] serde_yaml::Error),

    #[error("invalid model: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference error: {0}")]
    Inference(String),
}
