use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Document is missing field `{0}`")]
    MissingField(&'static str),
    #[error("Field `{0}` has an unexpected type")]
    WrongType(&'static str),
    #[error("Score {0} is out of range")]
    ScoreOutOfRange(i64),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be at most {max} characters")]
    TooLong { max: usize },
}
