// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Errors

use thiserror::Error;

/// Stable integer status codes.
///
/// Downstream clients match on these numeric values; they follow the common
/// numerical-library error enumeration for the shared codes and use a
/// separate 11xx block for the solver-specific ones. All codes are pairwise
/// distinct.
pub mod code {
    /// Optimality condition satisfied
    pub const SUCCESS: i32 = 0;
    /// Iterations have not converged yet
    pub const CONTINUE: i32 = -2;
    /// Input domain error
    pub const EDOM: i32 = 1;
    /// Output range error
    pub const ERANGE: i32 = 2;
    /// Invalid pointer or uninitialized handle
    pub const EFAULT: i32 = 3;
    /// Invalid argument supplied by user
    pub const EINVAL: i32 = 4;
    /// Generic failure
    pub const EFAILED: i32 = 5;
    /// Allocation failed
    pub const ENOMEM: i32 = 8;
    /// Tried to divide by zero
    pub const EZERODIV: i32 = 12;
    /// Vector lengths are not conformant
    pub const EBADLEN: i32 = 19;
    /// Objective function dropped below its lower cut-off
    pub const UNBOUNDEDF: i32 = 1101;
    /// Infeasible point
    pub const INFEASIBLE: i32 = 1102;
    /// Too many inner iterations
    pub const FINNERIT: i32 = 1103;
    /// Line search failed
    pub const FLSEARCH: i32 = 1104;
    /// Unable to find a descent direction
    pub const FDDIR: i32 = 1105;
}

/// boxmin error type
#[derive(Debug, Error)]
pub enum BoxminError {
    /// Indicates an invalid parameter
    #[error("Invalid parameter: {text:?}")]
    InvalidParameter {
        /// Text
        text: String,
    },

    /// Indicates that vector lengths do not agree
    #[error("Dimension mismatch: {text:?}")]
    DimensionMismatch {
        /// Text
        text: String,
    },

    /// Indicates that a minimizer is used before `set`
    #[error("Not initialized: {text:?}")]
    NotInitialized {
        /// Text
        text: String,
    },

    /// The inner conjugate-gradient solver could not produce a descent direction
    #[error("No descent direction: {text:?}")]
    NoDescentDirection {
        /// Text
        text: String,
    },

    /// For errors which are likely bugs.
    #[error("Potential bug: {text:?}. Please file a report on https://github.com/boxmin-rs/boxmin/issues")]
    PotentialBug {
        /// Text
        text: String,
    },
}

impl BoxminError {
    /// Returns the stable integer code of this error (see [`code`]).
    pub fn code(&self) -> i32 {
        match self {
            BoxminError::InvalidParameter { .. } => code::EINVAL,
            BoxminError::DimensionMismatch { .. } => code::EBADLEN,
            BoxminError::NotInitialized { .. } => code::EFAULT,
            BoxminError::NoDescentDirection { .. } => code::FDDIR,
            BoxminError::PotentialBug { .. } => code::EFAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Status;

    send_sync_test!(error, BoxminError);

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            code::SUCCESS,
            code::CONTINUE,
            code::EDOM,
            code::ERANGE,
            code::EFAULT,
            code::EINVAL,
            code::EFAILED,
            code::ENOMEM,
            code::EZERODIV,
            code::EBADLEN,
            code::UNBOUNDEDF,
            code::INFEASIBLE,
            code::FINNERIT,
            code::FLSEARCH,
            code::FDDIR,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_error_codes() {
        let err = BoxminError::InvalidParameter {
            text: "gamma".to_string(),
        };
        assert_eq!(err.code(), code::EINVAL);
        let err = BoxminError::DimensionMismatch {
            text: "x0".to_string(),
        };
        assert_eq!(err.code(), code::EBADLEN);
        let err = BoxminError::NoDescentDirection {
            text: "cg".to_string(),
        };
        assert_eq!(err.code(), code::FDDIR);
        assert_eq!(Status::Success.code(), code::SUCCESS);
        assert_eq!(Status::Continue.code(), code::CONTINUE);
    }
}
