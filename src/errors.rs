// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

//! # **Error Types** - *Statistical Kernel Error Handling*
//!
//! Error types for special-function, distribution and copula operations.
//!
//! ## Error Categories
//! - **Domain Errors**: Invalid parameters or arguments outside a function's domain
//! - **Dimension Errors**: Point, marginal and copula dimension mismatches
//! - **Missing Functionality**: Code paths that exist in the interface but were never completed
//! - **Internal Errors**: Faults reported by an underlying numerical routine
//!
//! Non-convergence of an iterative algorithm is deliberately *not* an error:
//! it is logged and the best available estimate is returned.

use core::fmt;
use std::error::Error;

/// Error type for all kernel operations.
///
/// Each variant includes a contextual message string describing the failing call.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Invalid arguments provided to a kernel function, e.g. a negative
    /// number of degrees of freedom or a probability outside [0, 1].
    InvalidArguments(String),

    /// Slice length or dimension mismatch between operands.
    LengthMismatch(String),

    /// Index out of range, e.g. a conditioning index beyond the dimension.
    OutOfBounds(String),

    /// The requested operation exists in the interface but is not implemented
    /// for this combination of inputs.
    NotYetImplemented(String),

    /// An underlying numerical routine reported an unrecoverable fault.
    Internal(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
            KernelError::LengthMismatch(msg) => write!(f, "Length mismatch: {}", msg),
            KernelError::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
            KernelError::NotYetImplemented(msg) => write!(f, "Not yet implemented: {}", msg),
            KernelError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl Error for KernelError {}

/// Creates a formatted error message for length mismatches between left-hand side (LHS) and right-hand side (RHS) operands.
///
/// # Arguments
/// * `fname` - Function name where the mismatch occurred
/// * `lhs` - Length of the left-hand side operand
/// * `rhs` - Length of the right-hand side operand
///
/// # Returns
/// A formatted error message string
pub fn log_length_mismatch(fname: String, lhs: usize, rhs: usize) -> String {
    return format!("{} => Length mismatch: LHS {} RHS {}", fname, lhs, rhs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes() {
        let e = KernelError::InvalidArguments("digamma: pole at 0".into());
        assert_eq!(e.to_string(), "Invalid arguments: digamma: pole at 0");
        let e = KernelError::NotYetImplemented("gradient".into());
        assert_eq!(e.to_string(), "Not yet implemented: gradient");
    }

    #[test]
    fn length_mismatch_message() {
        let msg = log_length_mismatch("composed_pdf".into(), 3, 2);
        assert_eq!(msg, "composed_pdf => Length mismatch: LHS 3 RHS 2");
    }
}
