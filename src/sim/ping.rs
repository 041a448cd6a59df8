//! Ping: a per-cell flash that decays to off in fixed steps
//!
//! A ping starts at a fixed brightness and loses `start / (ghosts + 1)` per
//! step. Steps are spaced by `interval` seconds of tick time, with at most one
//! step per tick. The final step lands on exactly 0.

use serde::{Deserialize, Serialize};

use super::element::Element;

/// Resumable decay state of one cell's ping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingSequence {
    /// Element shown while the ping is visible
    pub element: Element,
    start_brightness: f32,
    total_steps: u32,
    step: u32,
    interval: f32,
    elapsed: f32,
}

impl PingSequence {
    pub fn new(element: Element, start_brightness: f32, num_ghosts: u32, interval: f32) -> Self {
        Self {
            element,
            start_brightness,
            total_steps: num_ghosts.saturating_add(1),
            step: 0,
            interval,
            elapsed: 0.0,
        }
    }

    /// Decay steps taken so far
    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Steps until the ping is finished (ghosts + 1)
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Brightness at the current step
    pub fn brightness(&self) -> f32 {
        if self.step >= self.total_steps {
            return 0.0;
        }
        let decrement = self.start_brightness / self.total_steps as f32;
        self.start_brightness - self.step as f32 * decrement
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.total_steps
    }

    /// Accumulate tick time; returns true if a decay step was taken.
    ///
    /// Time left over after a step is dropped, so a long frame never
    /// skips a ghost.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = 0.0;
        self.step += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_ping_takes_three_steps() {
        let mut ping = PingSequence::new(Element::Fire, 0.8, 2, 0.0125);
        assert_eq!(ping.total_steps(), 3);
        assert!((ping.brightness() - 0.8).abs() < 1e-6);

        // Not enough time for a step
        assert!(!ping.advance(0.01));
        assert_eq!(ping.step(), 0);

        assert!(ping.advance(0.01));
        assert!((ping.brightness() - 0.8 * 2.0 / 3.0).abs() < 1e-6);

        assert!(ping.advance(0.0125));
        assert!((ping.brightness() - 0.8 / 3.0).abs() < 1e-6);

        assert!(ping.advance(0.0125));
        assert!(ping.is_finished());
        assert_eq!(ping.brightness(), 0.0);

        // Finished pings ignore further time
        assert!(!ping.advance(1.0));
        assert_eq!(ping.step(), 3);
    }

    #[test]
    fn test_max_ghosts_does_not_overflow() {
        let ping = PingSequence::new(Element::Light, 0.8, u32::MAX, 0.0125);
        assert_eq!(ping.total_steps(), u32::MAX);
        assert!((ping.brightness() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_long_frame_takes_single_step() {
        let mut ping = PingSequence::new(Element::Water, 0.8, 2, 0.0125);
        assert!(ping.advance(5.0));
        assert_eq!(ping.step(), 1);
        assert!(!ping.is_finished());
    }

    proptest! {
        #[test]
        fn prop_ping_decays_strictly_to_zero(
            start in 0.05f32..=1.0,
            ghosts in 0u32..8,
            dt in 0.0125f32..0.5,
        ) {
            let mut ping = PingSequence::new(Element::Earth, start, ghosts, 0.0125);
            let mut last = ping.brightness();
            let mut steps = 0;
            while !ping.is_finished() {
                prop_assert!(ping.advance(dt));
                steps += 1;
                let now = ping.brightness();
                prop_assert!(now < last);
                last = now;
            }
            prop_assert_eq!(steps, ghosts + 1);
            prop_assert_eq!(ping.brightness(), 0.0);
        }
    }
}
