//! Error types for building and evaluating fuzzy rule bases.

use thiserror::Error;

/// A specialized `Result` type for fuzzy inference operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A membership function was given parameters that leave it ill-defined.
    #[error("invalid argument for membership function `{function}`: {reason}")]
    InvalidArgument { function: String, reason: String },

    /// A rule building call was given no operand.
    #[error("argument `{0}` must not be null")]
    NullArgument(&'static str),

    /// A rule premise references a variable that has no input value.
    #[error("no input value for variable `{0}`")]
    MissingInput(String),

    /// An input value is NaN or infinite.
    #[error("input value for variable `{0}` must be finite")]
    InvalidInput(String),

    /// The trapezoid centroid was asked to handle a non-trapezoidal conclusion.
    #[error("all membership functions must be trapezoidal (found `{0}`)")]
    NotTrapezoidal(String),

    /// A single crisp value was requested but the rule set concludes on some other number of variables.
    #[error("expected exactly one output variable, found {0}")]
    AmbiguousOutput(usize),
}

impl Error {
    pub(crate) fn invalid(function: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            function: function.to_owned(),
            reason: reason.into(),
        }
    }
}

#[test]
fn test_error_display() {
    let err = Error::invalid("bell", "`a` must not be zero");
    assert_eq!(
        err.to_string(),
        "invalid argument for membership function `bell`: `a` must not be zero"
    );

    let err = Error::InvalidInput("Water".into());
    assert_eq!(err.to_string(), "input value for variable `Water` must be finite");

    let err = Error::NotTrapezoidal("Low".into());
    assert!(err.to_string().starts_with("all membership functions must be trapezoidal"));
}
