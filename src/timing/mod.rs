//! Timing reconciliation - one onset per syllable token
//!
//! Detected onsets are consumed positionally. When the detector found fewer
//! onsets than there are syllables, the remainder is spread evenly between the
//! last detected onset and the end of the audio.

use tracing::{debug, warn};

use crate::errors::ScheduleError;
use crate::types::ReconciledTimings;

/// Align `onsets` to `syllable_count`
///
/// # Arguments
/// * `onsets` - detector onsets in seconds, expected non-decreasing
/// * `syllable_count` - number of syllable tokens to time
/// * `audio_duration` - total audio length in seconds, used for synthesis
/// * `min_spacing` - gap between synthesized onsets when the audio ends at or
///   before the last detected onset
///
/// # Errors
/// * [`ScheduleError::InsufficientOnsets`] when `onsets` is empty
/// * [`ScheduleError::InvalidOnset`] for a negative or non-finite onset
/// * [`ScheduleError::InvalidDuration`] when synthesis is needed but the audio
///   duration is not a finite number
pub fn reconcile_onsets(
    onsets: &[f64],
    syllable_count: usize,
    audio_duration: f64,
    min_spacing: f64,
) -> Result<ReconciledTimings, ScheduleError> {
    if onsets.is_empty() {
        return Err(ScheduleError::InsufficientOnsets {
            tokens: syllable_count,
            onsets: 0,
        });
    }
    validate_onsets(onsets)?;

    if onsets.len() >= syllable_count {
        let dropped = onsets.len() - syllable_count;
        if dropped > 0 {
            debug!(dropped, syllable_count, "more onsets than syllables; surplus unused");
        }
        return Ok(ReconciledTimings {
            onsets: onsets[..syllable_count].to_vec(),
            real: syllable_count,
            synthesized: 0,
            dropped,
        });
    }

    let missing = syllable_count - onsets.len();
    let last_onset = onsets[onsets.len() - 1];
    if !audio_duration.is_finite() {
        return Err(ScheduleError::InvalidDuration {
            duration: audio_duration,
            last_onset,
            missing,
        });
    }

    // Detector frames can land just past a container duration stored at coarse precision
    let span_end = if audio_duration > last_onset {
        audio_duration
    } else {
        warn!(
            audio_duration,
            last_onset,
            min_spacing,
            "audio ends before the last onset; stepping synthesized onsets past it"
        );
        last_onset + min_spacing * missing as f64
    };

    warn!(
        onsets = onsets.len(),
        syllables = syllable_count,
        synthesized = missing,
        "found fewer onsets than syllables; spacing the rest evenly to the end of the audio"
    );

    let mut reconciled = Vec::with_capacity(syllable_count);
    reconciled.extend_from_slice(onsets);
    reconciled.extend(evenly_spaced(last_onset, span_end, missing));

    Ok(ReconciledTimings {
        onsets: reconciled,
        real: onsets.len(),
        synthesized: missing,
        dropped: 0,
    })
}

/// `count` timestamps spread over `(from, to]`, the last one landing on `to`
fn evenly_spaced(from: f64, to: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = (to - from) / count as f64;
    (1..=count).map(move |k| if k == count { to } else { from + step * k as f64 })
}

fn validate_onsets(onsets: &[f64]) -> Result<(), ScheduleError> {
    let mut previous = 0.0_f64;
    for (index, &value) in onsets.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(ScheduleError::InvalidOnset { index, value });
        }
        if value < previous {
            warn!(index, value, previous, "onset sequence goes backwards");
        }
        previous = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 24.0;

    #[test]
    fn synthesizes_evenly_to_audio_end() {
        let timings = reconcile_onsets(&[1.0], 3, 4.0, FRAME).unwrap();
        assert_eq!(timings.onsets, vec![1.0, 2.5, 4.0]);
        assert_eq!(timings.real, 1);
        assert_eq!(timings.synthesized, 2);
    }

    #[test]
    fn truncates_surplus_onsets() {
        let timings = reconcile_onsets(&[0.1, 0.2, 0.3, 0.4], 2, 1.0, FRAME).unwrap();
        assert_eq!(timings.onsets, vec![0.1, 0.2]);
        assert_eq!(timings.dropped, 2);
        assert_eq!(timings.synthesized, 0);
    }

    #[test]
    fn exact_match_is_untouched() {
        let onsets = [0.5, 0.9, 1.4];
        let timings = reconcile_onsets(&onsets, 3, 2.0, FRAME).unwrap();
        assert_eq!(timings.onsets, onsets.to_vec());
    }

    #[test]
    fn empty_onsets_are_fatal() {
        let err = reconcile_onsets(&[], 5, 10.0, FRAME).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InsufficientOnsets {
                tokens: 5,
                onsets: 0
            }
        );
    }

    #[test]
    fn rejects_negative_and_nan_onsets() {
        assert!(matches!(
            reconcile_onsets(&[0.5, -1.0], 2, 3.0, FRAME),
            Err(ScheduleError::InvalidOnset { index: 1, .. })
        ));
        assert!(matches!(
            reconcile_onsets(&[f64::NAN], 1, 3.0, FRAME),
            Err(ScheduleError::InvalidOnset { index: 0, .. })
        ));
    }

    #[test]
    fn audio_ending_before_last_onset_still_synthesizes() {
        let timings = reconcile_onsets(&[0.5, 3.004], 3, 3.0, FRAME).unwrap();
        assert_eq!(timings.len(), 3);
        assert_eq!(timings.real, 2);
        assert_eq!(timings.synthesized, 1);
        assert!((timings.onsets[2] - (3.004 + FRAME)).abs() < 1e-12);

        let stepped = reconcile_onsets(&[2.0], 3, 1.5, FRAME).unwrap();
        assert!(stepped.onsets[1] > 2.0);
        assert!(stepped.onsets[2] > stepped.onsets[1]);
    }

    #[test]
    fn non_finite_duration_blocks_synthesis() {
        let err = reconcile_onsets(&[2.0], 3, f64::INFINITY, FRAME).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InvalidDuration { missing: 2, .. }
        ));
        // duration only matters when synthesis happens
        assert!(reconcile_onsets(&[2.0], 1, f64::NAN, FRAME).is_ok());
    }

    #[test]
    fn synthesized_onsets_strictly_increase() {
        let timings = reconcile_onsets(&[0.2, 0.4], 9, 3.0, FRAME).unwrap();
        assert_eq!(timings.len(), 9);
        for pair in timings.onsets[1..].windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(timings.onsets[8], 3.0);
    }
}
