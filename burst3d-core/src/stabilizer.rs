/// Debounce filter over the raw per-frame gesture stream
use crate::gesture::GestureCategory;

/// Default number of repeats after the first sighting before a gesture is
/// confirmed (the third identical sample in a row).
pub const STABILITY_THRESHOLD: u32 = 2;

/// Run-length state of the raw gesture stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilizerCursor {
    last_raw: GestureCategory,
    matches: u32,
}

impl StabilizerCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw classification.
    ///
    /// Returns the gesture once it has repeated `threshold` times after its
    /// first sighting, and keeps returning it while the run continues. `None`
    /// means "no change": the caller keeps its previous confirmed gesture.
    pub fn observe(&mut self, raw: GestureCategory, threshold: u32) -> Option<GestureCategory> {
        if raw == self.last_raw {
            self.matches = self.matches.saturating_add(1);
        } else {
            self.last_raw = raw;
            self.matches = 0;
        }

        (self.matches >= threshold).then_some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GestureCategory::*;

    fn feed(cursor: &mut StabilizerCursor, raw: &[GestureCategory]) -> Vec<Option<GestureCategory>> {
        raw.iter()
            .map(|&g| cursor.observe(g, STABILITY_THRESHOLD))
            .collect()
    }

    #[test]
    fn test_confirms_on_third_identical_sample() {
        let mut cursor = StabilizerCursor::new();
        let out = feed(&mut cursor, &[Fist, Fist, OpenPalm, OpenPalm, OpenPalm]);
        assert_eq!(out, vec![None, None, None, None, Some(OpenPalm)]);
    }

    #[test]
    fn test_single_frame_glitch_is_suppressed() {
        let mut cursor = StabilizerCursor::new();
        let out = feed(&mut cursor, &[Fist, Fist, Fist, OpenPalm, Fist, Fist]);
        assert_eq!(out, vec![None, None, Some(Fist), None, None, None]);
    }

    #[test]
    fn test_run_keeps_confirming() {
        let mut cursor = StabilizerCursor::new();
        let out = feed(&mut cursor, &[One, One, One, One]);
        assert_eq!(out[2..], [Some(One), Some(One)]);
    }

    #[test]
    fn test_fresh_cursor_counts_unknown_run() {
        // The cursor starts on Unknown, so two more Unknowns confirm it
        let mut cursor = StabilizerCursor::new();
        let out = feed(&mut cursor, &[Unknown, Unknown]);
        assert_eq!(out, vec![None, Some(Unknown)]);
    }

    #[test]
    fn test_zero_threshold_confirms_immediately() {
        let mut cursor = StabilizerCursor::new();
        assert_eq!(cursor.observe(Fist, 0), Some(Fist));
    }
}
