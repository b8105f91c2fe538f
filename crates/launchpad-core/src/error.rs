use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchpadError {
    #[error("invalid scheme data")]
    InvalidScheme,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
