// ============================================================
// Layer 3 — Model Output Adapter Type
// ============================================================
// Every inference runtime hands back its results in its own
// wrapper type. Adapters convert those into this ONE struct:
// a flat f32 buffer plus its shape, row-major.
//
// The decoders only ever see ndarray views built from it,
// so they never branch on where the numbers came from.
//
// JSON form (what recorded outputs look like on disk):
//   { "shape": [1, 7, 3], "data": [0.1, 0.8, 0.1, ...] }

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::domain::error::TensorError;

/// A dense f32 tensor produced by an external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Dimensions, outermost first
    pub shape: Vec<usize>,

    /// Values in row-major order
    pub data: Vec<f32>,
}

impl ModelOutput {
    #[cfg(test)]
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self { shape, data }
    }

    /// Number of values the shape calls for
    pub fn expected_len(&self) -> usize {
        self.shape.iter().product()
    }

    fn check_len(&self) -> Result<(), TensorError> {
        let expected = self.expected_len();
        if expected != self.data.len() {
            return Err(TensorError::DataLength {
                shape:  self.shape.clone(),
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    fn rank_error(&self, expected: &str) -> TensorError {
        TensorError::Rank {
            expected: expected.to_string(),
            shape:    self.shape.clone(),
        }
    }

    /// Interpret as a (B, T, V) batch of probability matrices.
    /// A bare (T, V) matrix becomes a batch of one.
    pub fn into_sequence_batch(self) -> Result<Array3<f32>, TensorError> {
        self.check_len()?;
        match *self.shape.as_slice() {
            [t, v]    => Ok(Array3::from_shape_vec((1, t, v), self.data)?),
            [b, t, v] => Ok(Array3::from_shape_vec((b, t, v), self.data)?),
            _ => Err(self.rank_error("2 or 3")),
        }
    }
}
