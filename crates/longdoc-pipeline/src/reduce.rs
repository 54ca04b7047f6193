//! Overlap reduction.
//!
//! Collapses the raw per-window occurrences into exactly one vector per
//! subword index by arithmetic mean.

use tracing::debug;

use crate::batch::RawOccurrence;
use crate::error::PipelineError;

/// Merge raw occurrences into one mean vector per subword index `0..S`.
///
/// Window coverage guarantees every index at least one occurrence; an
/// index with none is a planner/embedder mismatch and raises a coverage
/// violation rather than defaulting to zero. Occurrences referring to
/// indices outside `0..subword_count` trip the same error.
pub fn merge_occurrences(
    occurrences: &[RawOccurrence],
    subword_count: usize,
    hidden_dim: usize,
) -> Result<Vec<Vec<f32>>, PipelineError> {
    let mut sums = vec![vec![0.0f32; hidden_dim]; subword_count];
    let mut counts = vec![0usize; subword_count];

    for occ in occurrences {
        if occ.vector.len() != hidden_dim {
            return Err(PipelineError::DimensionMismatch {
                expected: hidden_dim,
                actual: occ.vector.len(),
            });
        }
        let sum = sums
            .get_mut(occ.subword_index)
            .ok_or(PipelineError::Coverage {
                subword_index: occ.subword_index,
            })?;
        for (acc, value) in sum.iter_mut().zip(&occ.vector) {
            *acc += value;
        }
        counts[occ.subword_index] += 1;
    }

    for (index, (sum, &count)) in sums.iter_mut().zip(&counts).enumerate() {
        if count == 0 {
            return Err(PipelineError::Coverage {
                subword_index: index,
            });
        }
        let inv = 1.0 / count as f32;
        for value in sum.iter_mut() {
            *value *= inv;
        }
    }

    debug!(
        subwords = subword_count,
        occurrences = occurrences.len(),
        "Merged overlapping occurrences"
    );

    Ok(sums)
}
