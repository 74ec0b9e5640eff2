//! State encodings applied by the training loop before a state is stored

use serde::{Deserialize, Serialize};

use crate::{RLError, Result};

/// Encoding from raw world states to feature vectors
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoding {
    /// Keep the state unchanged
    #[default]
    Identity,
    /// Expand small integer coordinates to one-hot blocks. `ranges[i]` is
    /// the number of values coordinate `i` can take, so `(2, 3)` with
    /// ranges `(4, 5)` becomes `0 0 1 0 | 0 0 0 1 0`.
    OneHot {
        /// Number of distinct values of each coordinate
        ranges: Vec<usize>,
    },
}

impl Encoding {
    /// One-hot encoding for the given per-coordinate ranges
    #[must_use]
    pub fn one_hot(ranges: Vec<usize>) -> Self {
        Self::OneHot { ranges }
    }

    /// Length of an encoded state, if it does not depend on the input
    #[must_use]
    pub fn output_dim(&self) -> Option<usize> {
        match self {
            Self::Identity => None,
            Self::OneHot { ranges } => Some(ranges.iter().sum()),
        }
    }

    /// Encode a raw state
    pub fn apply(&self, state: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::Identity => Ok(state.to_vec()),
            Self::OneHot { ranges } => encode_one_hot(state, ranges),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn encode_one_hot(state: &[f64], ranges: &[usize]) -> Result<Vec<f64>> {
    if state.len() != ranges.len() {
        return Err(RLError::DimensionMismatch {
            expected: ranges.len(),
            actual: state.len(),
        });
    }

    let mut encoded = vec![0.0; ranges.iter().sum()];
    let mut offset = 0;

    for (&value, &range) in state.iter().zip(ranges) {
        // Coordinates are integers carried as floats, round them
        let index = value + 0.49;
        if !(0.0..range as f64).contains(&index) {
            return Err(RLError::InvalidState(format!(
                "coordinate {value} outside of range 0..{range}"
            )));
        }
        encoded[offset + index as usize] = 1.0;
        offset += range;
    }

    Ok(encoded)
}
