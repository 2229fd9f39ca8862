use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised while resolving a size, binding call arguments, or
/// constructing a sized generator. All of them surface before any item is
/// produced.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{value} should be an integer, a length-queryable value or a size function, not {type_name}")]
    InvalidSizeSpecification {
        value: String,
        type_name: &'static str,
    },

    #[error("{value} should be an integer or a length-queryable value, not {type_name}")]
    InvalidSize {
        value: String,
        type_name: &'static str,
    },

    #[error(transparent)]
    Length(anyhow::Error),

    #[error("{function}() missing a required argument: '{parameter}'")]
    MissingArgument { function: String, parameter: String },

    #[error("{function}() got multiple values for argument '{parameter}'")]
    DuplicateArgument { function: String, parameter: String },

    #[error("{function}() got an unexpected argument: '{argument}'")]
    UnexpectedArgument { function: String, argument: String },

    #[error("expected a suspended sequence, but it has already finished")]
    NotASequence,
}

/// Failure returned when driving a [`SizedGenerator`](crate::SizedGenerator)
/// or a [`SizedStream`](crate::SizedStream).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResumeError<E> {
    #[error("the sized sequence has been closed")]
    Closed,

    /// Raised by the underlying sequence and passed through untouched.
    #[error("{0}")]
    Raised(E),
}

impl<E> ResumeError<E> {
    /// Returns the failure raised by the underlying sequence, if any.
    pub fn into_raised(self) -> Option<E> {
        match self {
            ResumeError::Closed => None,
            ResumeError::Raised(e) => Some(e),
        }
    }
}
