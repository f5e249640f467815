pub type MirrorResult<T> = Result<T, MirrorError>;

#[derive(thiserror::Error, Debug)]
pub enum MirrorError {
    #[error("config error: {0}")]
    Config(String),

    #[error("capture error: {0}")]
    Capture(String),

    #[error("display error: {0}")]
    Display(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MirrorError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }
}
