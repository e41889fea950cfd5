use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cli error: {0}")]
    Cli(String),
    #[error("payload parse error: {0}")]
    PayloadParse(String),
    #[error("missing ui element: {0}")]
    MissingElement(String),
    #[error("dispatch error: {0}")]
    Dispatch(String),
}
