use thiserror::Error;

pub type HsResult<T> = Result<T, HsError>;

#[derive(Error, Debug)]
pub enum HsError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
