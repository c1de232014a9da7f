/// Traits and implementations of BLAS providers
pub mod blas;

/// Traits and implementations for basic dimension types
pub mod dims;

/// Errors returned by the BLAS operations
pub mod error;

pub mod random;

/// Traits and implementations for basic storage buffers
pub mod storage;

/// Implementations for tensor operations and structures
pub mod tensor;

pub use error::{BlasError, BlasResult};
