use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid project name '{0}': use letters and numbers")]
    InvalidName(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("no Figma file key found in {0}: add a figma.com/file/<KEY> URL or a 'FileKey: <KEY>' line")]
    MissingFileKey(String),

    #[error("FIGMA_ACCESS_TOKEN not set")]
    MissingToken,

    #[error("no comments preview found: run 'superdesigner review {0}' first")]
    CommentsNotFound(String),

    #[error("figma API error ({status}): {message}")]
    Figma { status: u16, message: String },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, DesignError>;
