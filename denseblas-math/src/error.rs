use thiserror::Error;

/// Result type for the safe BLAS operations
pub type BlasResult<T> = std::result::Result<T, BlasError>;

/// Errors reported by the BLAS operations before or during dispatch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlasError {
    /// Operand dimensions do not agree
    #[error("shape mismatch in {op}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A symmetric or triangular operand was not square
    #[error("{op} needs a square matrix, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Neither stride of a matrix was 1
    #[error("{op} needs one unit stride, got strides {strides:?}")]
    NonContiguous {
        op: &'static str,
        strides: [usize; 2],
    },

    /// Two operands that must share a layout were given with different ones
    #[error("{op} needs both operands in the same layout")]
    MixedLayout { op: &'static str },

    #[cfg(feature = "cublas")]
    #[error(transparent)]
    Cublas(#[from] crate::blas::cublas::CublasError),
}

impl BlasError {
    pub(crate) fn shape(op: &'static str, expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            op,
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
