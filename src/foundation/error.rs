/// Crate-wide result type.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors produced by bitmap construction, pixel access and conversion.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// A precondition on sizes, depths or pairings was violated.
    #[error("validation error: {0}")]
    Validation(String),

    /// A pixel coordinate fell outside the bitmap or device.
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height}")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Width of the accessed surface.
        width: u32,
        /// Height of the accessed surface.
        height: u32,
    },

    /// A representation could not be produced in the requested format.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// A scene description could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterError::Conversion`].
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Build a [`RasterError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub(crate) fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
