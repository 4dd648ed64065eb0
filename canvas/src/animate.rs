//! Play animation: players ride their arrows as progress sweeps 0 → 100.
//!
//! Animation is a read-side projection. [`animate`] produces a new
//! collection for rendering and never touches the authoritative one held
//! by [`crate::history::History`].

#[cfg(test)]
#[path = "animate_test.rs"]
mod animate_test;

use crate::consts::{ANIMATION_MATCH_RADIUS, DEFAULT_PLAYBACK_SPEED, PROGRESS_MAX};
use crate::doc::{Element, ElementKind};
use crate::geometry::{distance, lerp_point};

/// Project `elements` at `progress` (clamped to `0..=100`).
///
/// Each arrow with valid endpoints moves the first player, in collection
/// order, whose original position is within 20 units of the arrow's start.
/// When several arrows move the same player the last one wins.
#[must_use]
pub fn animate(elements: &[Element], progress: f64) -> Vec<Element> {
    let t = clamp_progress(progress) / PROGRESS_MAX;
    let mut out = elements.to_vec();

    for arrow in elements.iter().filter(|el| el.kind.is_arrow()) {
        let Some((start, end)) = arrow.arrow_endpoints() else {
            continue;
        };
        let rider = elements.iter().position(|el| {
            el.kind == ElementKind::Player && distance(el.position_point(), start) <= ANIMATION_MATCH_RADIUS
        });
        if let Some(i) = rider {
            let at = lerp_point(start, end, t);
            out[i].x = at.x;
            out[i].y = at.y;
        }
    }
    out
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, PROGRESS_MAX)
}

/// Scrubber state for stepping through an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    progress: f64,
    playing: bool,
    /// Progress units advanced per second of playback.
    speed: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self { progress: 0.0, playing: false, speed: DEFAULT_PLAYBACK_SPEED }
    }
}

impl Playback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Playback advancing `speed` progress units per second.
    #[must_use]
    pub fn with_speed(speed: f64) -> Self {
        Self { speed: speed.max(0.0), ..Self::default() }
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playing. A finished animation restarts from the beginning.
    pub fn play(&mut self) {
        if self.progress >= PROGRESS_MAX {
            self.progress = 0.0;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to `progress`, clamped to the valid range.
    pub fn seek(&mut self, progress: f64) {
        self.progress = clamp_progress(progress);
    }

    /// Stop and rewind to the start.
    pub fn reset(&mut self) {
        self.playing = false;
        self.progress = 0.0;
    }

    /// Advance by `dt_secs` of wall time. Returns `true` if progress changed.
    /// Playback stops on reaching the end.
    pub fn tick(&mut self, dt_secs: f64) -> bool {
        if !self.playing || dt_secs <= 0.0 {
            return false;
        }
        let before = self.progress;
        self.progress = clamp_progress(self.progress + self.speed * dt_secs);
        if self.progress >= PROGRESS_MAX {
            self.playing = false;
        }
        (self.progress - before).abs() > f64::EPSILON
    }
}
