//! Canonical tensor model shared by every decode and capture path.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Metadata half of the payload contract: element encoding plus extents.
///
/// This is the exact structure the in-target companion script writes to its
/// metadata file, and the structure handed onward to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorMeta {
    pub dtype: String,
    pub shape: Vec<usize>,
}

/// Byte width of a numpy-style dtype name, or `None` for names we cannot
/// size. An unsizable dtype must fail at the producer — without a width the
/// buffer-length invariant cannot be established.
pub fn dtype_size(dtype: &str) -> Option<usize> {
    match dtype {
        "bool" | "int8" | "uint8" => Some(1),
        "int16" | "uint16" | "float16" => Some(2),
        "int32" | "uint32" | "float32" => Some(4),
        "int64" | "uint64" | "float64" | "complex64" => Some(8),
        "complex128" => Some(16),
        _ => None,
    }
}

/// The normalized (data, shape, dtype) triple all decode and capture paths
/// converge to before rendering.
///
/// Invariant: `data.len() == product(shape) * dtype_size(dtype)`. The only
/// constructor establishes it; consumers may rely on it without
/// re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor {
    data: Vec<u8>,
    shape: Vec<usize>,
    dtype: String,
}

impl Tensor {
    /// Build a tensor, failing rather than emitting an inconsistent one.
    pub fn from_parts(
        data: Vec<u8>,
        shape: Vec<usize>,
        dtype: impl Into<String>,
    ) -> LensResult<Self> {
        let dtype = dtype.into();
        let width = dtype_size(&dtype)
            .ok_or_else(|| LensError::InvalidInput(format!("unknown dtype: {dtype}")))?;
        let expected = shape
            .iter()
            .try_fold(width, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| {
                LensError::InvalidInput(format!("shape {shape:?} overflows a byte count"))
            })?;
        if data.len() != expected {
            return Err(LensError::InvalidInput(format!(
                "buffer holds {} bytes but shape {shape:?} as {dtype} needs {expected}",
                data.len()
            )));
        }
        Ok(Self { data, shape, dtype })
    }

    /// Raw element bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> &str {
        &self.dtype
    }

    /// Metadata projection for handoff to a renderer.
    pub fn meta(&self) -> TensorMeta {
        TensorMeta {
            dtype: self.dtype.clone(),
            shape: self.shape.clone(),
        }
    }

    /// Consume the tensor, yielding its raw byte buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Errors that can occur while normalizing bytes into a tensor.
#[derive(thiserror::Error, Debug)]
pub enum LensError {
    /// The buffer matched none of the supported container signatures.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A container parsed, but held no image to decode.
    #[error("no image found in container")]
    NoImageFound,

    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The companion script's output files did not validate.
    #[error("payload unreadable: {0}")]
    PayloadUnreadable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience result type.
pub type LensResult<T> = Result<T, LensError>;
