//! Block decoding errors.
//!
//! Every failure is detected at the point of violation and reported together
//! with the input position at which it was detected.  [`DecompressError::code`]
//! maps that onto the negative-integer convention of the C API
//! (`-(consumed) - 1`), which is what the `c-abi` exports return.

use thiserror::Error;

/// Why a block was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A match offset reaches before the earliest valid history byte, or is zero.
    #[error("match offset outside of valid history")]
    OffsetOutOfBounds,
    /// The input ended in the middle of a sequence.
    #[error("input ends mid-sequence")]
    TruncatedInput,
    /// A decoded length, added to a cursor, would wrap the address space.
    #[error("decoded length overflows the address space")]
    LengthOverflow,
    /// A variable-length extension ran past its permitted reading boundary.
    #[error("length extension runs past its reading limit")]
    VarIntOverrun,
    /// The last sequence did not end exactly on the input/output boundary.
    #[error("block does not terminate on the buffer boundary")]
    BadTermination,
    /// A match would produce bytes inside the trailing literals-only zone.
    #[error("match overlaps the trailing literals")]
    LastLiteralsViolation,
    /// Zero output capacity with anything but the canonical empty block.
    #[error("zero-capacity output requires the empty block")]
    EmptyOutput,
    /// Caller-supplied buffer dimensions are inconsistent.
    #[error("inconsistent buffer dimensions")]
    InvalidArgument,
}

/// Malformed LZ4 block.
///
/// The contents of the destination buffer are unspecified after an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("corrupted LZ4 block: {kind} (at input byte {consumed})")]
pub struct DecompressError {
    pub kind: DecodeErrorKind,
    /// Number of input bytes consumed when the violation was detected.
    pub consumed: usize,
}

impl DecompressError {
    pub const fn new(kind: DecodeErrorKind, consumed: usize) -> Self {
        Self { kind, consumed }
    }

    /// Negative C-API return value: `-(consumed) - 1`, saturated to `i32::MIN`.
    pub fn code(&self) -> i32 {
        i32::try_from(self.consumed)
            .ok()
            .and_then(|c| c.checked_neg())
            .and_then(|c| c.checked_sub(1))
            .unwrap_or(i32::MIN)
    }
}
