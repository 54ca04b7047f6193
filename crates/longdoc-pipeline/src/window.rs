//! Sliding-window planning over subword index space.
//!
//! Partitions `[0, S)` into an ordered list of overlapping windows of at
//! most `W` subwords, covering the whole range with no gap. Window seams
//! are snapped to positions where a token ends, so a token's subwords are
//! only split across windows when the token itself cannot fit in one.

use std::collections::HashSet;

use tracing::{debug, warn};

use longdoc_types::{Subword, Token, Window};

use crate::error::PipelineError;

/// Plan the ordered window list for `subwords.len()` subwords.
///
/// `window_size` is the maximum window width `W`; `overlap` is the
/// fraction of `W` reused as the start of the next window, in `[0, 1)`
/// (validated by the caller).
///
/// Guarantees on success: the first window starts at 0, the last ends at
/// `S`, every window satisfies `start < end` and `len <= W` except when a
/// hard cut was impossible, consecutive windows touch or overlap, and the
/// planner terminates within `S` iterations. A cursor that cannot advance
/// is forced one subword forward and reported as a diagnostic; if coverage
/// still fails, planning errors out with the offending cursor.
pub fn plan_windows(
    subwords: &[Subword],
    tokens: &[Token],
    window_size: usize,
    overlap: f32,
) -> Result<Vec<Window>, PipelineError> {
    let total = subwords.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let boundaries = token_seam_positions(subwords, tokens);
    let stride_back = (window_size as f32 * overlap) as usize;

    let mut windows: Vec<Window> = Vec::new();
    let mut window_start = 0usize;
    let mut iterations = 0usize;

    while window_start < total {
        iterations += 1;
        if iterations > total {
            // Unreachable with the forward-progress guard below, kept as a
            // hard termination proof
            return Err(PipelineError::Planning {
                cursor: window_start,
            });
        }

        // Final window: runs to the end, no snapping
        if window_start + window_size >= total {
            windows.push(Window::new(window_start, total));
            break;
        }

        let limit = window_start + window_size;

        // Largest token seam at or before the limit that still leaves a
        // non-empty window
        let upper = boundaries.partition_point(|&p| p <= limit);
        let snapped = boundaries[..upper]
            .last()
            .copied()
            .filter(|&p| p > window_start);

        let window_end = match snapped {
            Some(p) => p,
            None => {
                // A single token wider than the window: cut mid-token
                warn!(
                    cursor = window_start,
                    limit = limit,
                    "No token seam inside window, cutting mid-token"
                );
                limit
            }
        };

        windows.push(Window::new(window_start, window_end));

        // Overlap target, snapped back to the nearest token seam (or 0)
        let target = window_end.saturating_sub(stride_back);
        let at_or_before = boundaries.partition_point(|&p| p <= target);
        let mut next_start = if at_or_before == 0 {
            0
        } else {
            boundaries[at_or_before - 1]
        };

        if next_start <= window_start {
            // Forced advance changes the effective overlap for this seam;
            // reported rather than silent
            warn!(
                cursor = window_start,
                computed_start = next_start,
                "Window cursor stalled, forcing advance by one subword"
            );
            next_start = window_start + 1;
        }

        window_start = next_start;
    }

    verify_cover(&windows, total)?;

    debug!(
        subwords = total,
        windows = windows.len(),
        window_size = window_size,
        "Planned sliding windows"
    );

    Ok(windows)
}

/// Positions `p` in `1..=S` where the subword ending at `p` closes a token.
///
/// These are the only places a window may end, and (as the position right
/// after a completed token) the preferred places for the next window to
/// start.
fn token_seam_positions(subwords: &[Subword], tokens: &[Token]) -> Vec<usize> {
    let token_ends: HashSet<usize> = tokens.iter().map(|t| t.byte_end).collect();

    subwords
        .iter()
        .enumerate()
        .filter(|(_, s)| token_ends.contains(&s.byte_end))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Check the coverage invariant: ordered, gapless, spanning `[0, total)`.
fn verify_cover(windows: &[Window], total: usize) -> Result<(), PipelineError> {
    let mut covered_to = 0usize;

    for window in windows {
        if window.is_empty() || window.start > covered_to {
            return Err(PipelineError::Planning {
                cursor: covered_to,
            });
        }
        covered_to = covered_to.max(window.end);
    }

    if windows.first().map(|w| w.start) != Some(0) || covered_to != total {
        return Err(PipelineError::Planning { cursor: covered_to });
    }

    Ok(())
}
