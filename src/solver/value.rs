//! The three-valued truth type the whole engine is built on.

use crate::error::{Error, SolverError};

/// A truth value that may also be undecided.
///
/// `TriBool` exists so that "we don't know yet" can never masquerade as
/// `false` in a conditional. There is no implicit conversion to `bool`;
/// the only way across is [`TryFrom`], which fails loudly on
/// [`TriBool::Unknown`]:
///
/// ```
/// use quorum::solver::value::TriBool;
///
/// assert_eq!(bool::try_from(TriBool::True).unwrap(), true);
/// assert!(bool::try_from(TriBool::Unknown).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriBool {
    True,
    False,
    Unknown,
}

impl TriBool {
    pub fn is_unknown(self) -> bool {
        self == TriBool::Unknown
    }

    pub fn is_decided(self) -> bool {
        self != TriBool::Unknown
    }
}

impl From<bool> for TriBool {
    fn from(value: bool) -> Self {
        if value {
            TriBool::True
        } else {
            TriBool::False
        }
    }
}

impl TryFrom<TriBool> for bool {
    type Error = Error;

    fn try_from(value: TriBool) -> Result<Self, Self::Error> {
        match value {
            TriBool::True => Ok(true),
            TriBool::False => Ok(false),
            TriBool::Unknown => Err(SolverError::UnknownTruth.into()),
        }
    }
}

impl std::fmt::Display for TriBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriBool::True => "True",
            TriBool::False => "False",
            TriBool::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
