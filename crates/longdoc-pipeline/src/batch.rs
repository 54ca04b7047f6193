//! Window batching and encoder invocation.
//!
//! Groups planned windows into mini-batches, pads them to uniform width,
//! and turns the encoder's per-position hidden states back into raw
//! per-subword occurrences. A subword covered by two overlapping windows
//! produces two raw occurrences here; merging happens in the reducer.

use tracing::{debug, trace};

use longdoc_model::SequenceEncoder;
use longdoc_types::Window;

use crate::error::PipelineError;

/// One subword's embedding as produced by one specific window.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOccurrence {
    /// Index of the subword in `0..S`
    pub subword_index: usize,
    /// Hidden-state vector from the window that covered it
    pub vector: Vec<f32>,
}

/// Run the encoder over all windows and collect raw occurrences.
///
/// Windows are accumulated until the mini-batch is full or the final
/// window is reached, then submitted in one encoder call. Shorter windows
/// are right-padded to `window_size` with `padding_id`; the attention mask
/// marks real positions with 1. Padding positions are discarded from the
/// output, so every emitted occurrence maps to a real subword index.
///
/// An encoder failure is fatal for the document and propagated unchanged.
pub fn embed_windows(
    windows: &[Window],
    subword_ids: &[u32],
    encoder: &dyn SequenceEncoder,
    window_size: usize,
    mini_batch_size: usize,
    padding_id: u32,
) -> Result<Vec<RawOccurrence>, PipelineError> {
    let total: usize = windows.iter().map(|w| w.len()).sum();
    let mut occurrences = Vec::with_capacity(total);

    let mut batch_ids: Vec<Vec<u32>> = Vec::with_capacity(mini_batch_size);
    let mut batch_masks: Vec<Vec<u32>> = Vec::with_capacity(mini_batch_size);
    let mut batch_windows: Vec<Window> = Vec::with_capacity(mini_batch_size);

    for (position, window) in windows.iter().enumerate() {
        let ids = &subword_ids[window.start..window.end];

        let mut row = ids.to_vec();
        // Mask derives from position, not id comparison: a real subword
        // whose vocabulary id equals the padding id must stay unmasked
        let mut mask = vec![1u32; row.len()];
        row.resize(window_size, padding_id);
        mask.resize(window_size, 0);

        batch_ids.push(row);
        batch_masks.push(mask);
        batch_windows.push(*window);

        let is_last = position + 1 == windows.len();
        if batch_ids.len() == mini_batch_size || is_last {
            trace!(
                windows = batch_windows.len(),
                width = window_size,
                "Submitting mini-batch"
            );
            flush_batch(
                encoder,
                &mut batch_ids,
                &mut batch_masks,
                &mut batch_windows,
                &mut occurrences,
            )?;
        }
    }

    debug!(
        windows = windows.len(),
        occurrences = occurrences.len(),
        "Embedded all windows"
    );

    Ok(occurrences)
}

/// Submit one accumulated mini-batch and drain it into occurrences.
fn flush_batch(
    encoder: &dyn SequenceEncoder,
    batch_ids: &mut Vec<Vec<u32>>,
    batch_masks: &mut Vec<Vec<u32>>,
    batch_windows: &mut Vec<Window>,
    occurrences: &mut Vec<RawOccurrence>,
) -> Result<(), PipelineError> {
    let hidden = encoder.encode(batch_ids, batch_masks)?;

    if hidden.len() != batch_windows.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: batch_windows.len(),
            actual: hidden.len(),
        });
    }

    for (window, states) in batch_windows.iter().zip(hidden) {
        // Keep only non-padding positions, in window order
        for (offset, vector) in states.into_iter().take(window.len()).enumerate() {
            occurrences.push(RawOccurrence {
                subword_index: window.start + offset,
                vector,
            });
        }
    }

    batch_ids.clear();
    batch_masks.clear();
    batch_windows.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use longdoc_model::MockEncoder;

    fn ids(count: usize) -> Vec<u32> {
        (0..count).map(|i| i as u32 + 10).collect()
    }

    #[test]
    fn test_single_window_occurrences() {
        let encoder = MockEncoder::new(3);
        let subword_ids = ids(5);
        let windows = vec![Window::new(0, 5)];

        let occurrences =
            embed_windows(&windows, &subword_ids, &encoder, 8, 4, 0).unwrap();

        assert_eq!(occurrences.len(), 5);
        for (i, occ) in occurrences.iter().enumerate() {
            assert_eq!(occ.subword_index, i);
            assert_eq!(occ.vector, encoder.vector_for(subword_ids[i]));
        }
    }

    #[test]
    fn test_padding_positions_dropped() {
        let encoder = MockEncoder::new(2);
        let subword_ids = ids(3);
        // Window of 3 padded up to width 10: only 3 occurrences may come out
        let windows = vec![Window::new(0, 3)];

        let occurrences =
            embed_windows(&windows, &subword_ids, &encoder, 10, 4, 0).unwrap();
        assert_eq!(occurrences.len(), 3);
    }

    #[test]
    fn test_overlapping_windows_duplicate_occurrences() {
        let encoder = MockEncoder::new(2);
        let subword_ids = ids(10);
        let windows = vec![Window::new(0, 6), Window::new(4, 10)];

        let occurrences =
            embed_windows(&windows, &subword_ids, &encoder, 6, 4, 0).unwrap();

        assert_eq!(occurrences.len(), 12);
        // Subwords 4 and 5 fell in both windows
        let count_4 = occurrences.iter().filter(|o| o.subword_index == 4).count();
        assert_eq!(count_4, 2);
        let count_0 = occurrences.iter().filter(|o| o.subword_index == 0).count();
        assert_eq!(count_0, 1);
    }

    #[test]
    fn test_batch_boundary_flush() {
        // 5 windows, mini-batch of 2: flushes at 2, 4, and the final one
        let encoder = MockEncoder::new(1);
        let subword_ids = ids(25);
        let windows: Vec<Window> = (0..5).map(|i| Window::new(i * 5, (i + 1) * 5)).collect();

        let occurrences =
            embed_windows(&windows, &subword_ids, &encoder, 5, 2, 0).unwrap();

        assert_eq!(occurrences.len(), 25);
        let indices: Vec<usize> = occurrences.iter().map(|o| o.subword_index).collect();
        assert_eq!(indices, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_windows_no_occurrences() {
        let encoder = MockEncoder::new(2);
        let occurrences = embed_windows(&[], &[], &encoder, 4, 2, 0).unwrap();
        assert!(occurrences.is_empty());
    }

    #[test]
    fn test_real_subword_with_padding_id_kept() {
        // A real subword whose id equals the padding id must still yield
        // an occurrence
        let encoder = MockEncoder::new(2);
        let subword_ids = vec![0u32, 11, 12];
        let windows = vec![Window::new(0, 3)];

        let occurrences =
            embed_windows(&windows, &subword_ids, &encoder, 6, 2, 0).unwrap();
        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[0].subword_index, 0);
    }
}
