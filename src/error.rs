use std::backtrace::Backtrace;

use crate::solver::state::{ConstraintId, VarId};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The things that can go wrong while building or driving a problem.
///
/// Contradictions are deliberately absent: a violated constraint is a
/// normal solver outcome (it triggers backtracking), never an error. The
/// variants here all indicate a bug in the code that built the problem or
/// supplied the guess strategy.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("impossible bounds: min_true {min_true} is greater than max_true {max_true}")]
    ImpossibleBounds { min_true: usize, max_true: usize },

    #[error("variable ?{var} is already a member of constraint #{constraint}")]
    DuplicateMember { var: VarId, constraint: ConstraintId },

    #[error("variable ?{var} is already {current}, refusing to re-decide it as {requested}")]
    Redecided {
        var: VarId,
        current: bool,
        requested: bool,
    },

    #[error("guess strategy chose variable ?{var}, which is already decided")]
    GuessNotUnknown { var: VarId },

    #[error("guess strategy produced no guess while {unknown} variables are still Unknown")]
    NoGuess { unknown: usize },

    #[error("an Unknown value was read as a boolean")]
    UnknownTruth,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl Error {
    /// The underlying [`SolverError`], without the captured backtrace.
    pub fn inner(&self) -> &SolverError {
        match self {
            Error::Inner { inner, .. } => inner,
        }
    }
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
