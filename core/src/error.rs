use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid cell index")]
    InvalidCell,
}

pub type Result<T> = core::result::Result<T, GameError>;
