//! Author-supplied track preferences.

use crate::models::types::TrackSlot;

/// A parsed stop-track hint.
///
/// The hint grammar is `^[+-]?\d*$`: an empty hint keeps the preference
/// carried over from earlier stops, a bare sign picks the side for
/// automatic assignment, and a signed number requests that exact track.
/// Anything outside the grammar is accepted permissively and treated as
/// empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreferredTrack {
    positive: bool,
    number: Option<i32>,
}

impl PreferredTrack {
    /// The initial carried preference: automatic, positive side.
    pub fn positive() -> Self {
        Self {
            positive: true,
            number: None,
        }
    }

    /// Apply a stop's hint on top of the carried preference.
    pub fn updated(self, hint: &str) -> Self {
        Self::parse(hint).unwrap_or(self)
    }

    fn parse(hint: &str) -> Option<Self> {
        if hint.is_empty() {
            return None;
        }
        let (positive, digits) = if let Some(rest) = hint.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = hint.strip_prefix('-') {
            (false, rest)
        } else {
            (true, hint)
        };
        if digits.is_empty() {
            return Some(Self {
                positive,
                number: None,
            });
        }
        let magnitude: i32 = digits.parse().ok()?;
        let number = if positive { magnitude } else { -magnitude };
        Some(Self {
            positive,
            number: Some(number),
        })
    }

    /// Adopt an existing assignment as an explicit track, e.g. when a
    /// same-named line continues from an already-routed station.
    pub fn from_existing(self, slot: Option<&TrackSlot>) -> Self {
        match slot {
            Some(slot) => Self {
                positive: slot.track >= 0,
                number: Some(slot.track),
            },
            None => self,
        }
    }

    pub fn has_number(&self) -> bool {
        self.number.is_some()
    }

    pub fn number(&self) -> Option<i32> {
        self.number
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// Keep only the side, dropping any explicit number. This is the form
    /// carried forward to the next stop.
    pub fn reduced(self) -> Self {
        Self {
            positive: self.positive,
            number: None,
        }
    }
}
