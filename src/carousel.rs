//! Slide state for the hero banner and the gallery strip.

use std::time::Duration;

use crate::config::{CarouselSettings, SiteConfig};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Wrapping slide index with an auto-advance timer and a modal viewer.
///
/// Time is fed in through [`Carousel::advance`], so the host decides where
/// ticks come from. Any manual navigation restarts the timer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Carousel {
    len: usize,
    current: usize,
    interval: Duration,
    elapsed: Duration,
    paused: bool,
    viewer: Option<usize>,
}

impl Carousel {
    pub fn new(len: usize, start: usize, interval: Duration) -> Self {
        Self {
            len,
            current: if len == 0 { 0 } else { start % len },
            interval,
            elapsed: Duration::ZERO,
            paused: false,
            viewer: None,
        }
    }

    pub fn from_settings(settings: &CarouselSettings) -> Self {
        Self::new(settings.slides, settings.start, settings.interval())
    }

    pub fn hero() -> Self {
        Self::from_settings(&SiteConfig::global().hero)
    }

    pub fn gallery() -> Self {
        Self::from_settings(&SiteConfig::global().gallery)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        self.show((self.current + 1) % self.len);
    }

    pub fn prev(&mut self) {
        if self.len == 0 {
            return;
        }
        self.show((self.current + self.len - 1) % self.len);
    }

    /// Jumps to `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.show(index);
        true
    }

    pub fn swipe(&mut self, direction: SwipeDirection) {
        match direction {
            SwipeDirection::Left => self.next(),
            SwipeDirection::Right => self.prev(),
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Feeds `dt` of wall time and moves one slide per full interval that
    /// has elapsed. Returns whether the current slide changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.paused || self.len < 2 || self.interval.is_zero() {
            return false;
        }
        let elapsed = (self.elapsed + dt).as_nanos();
        let interval = self.interval.as_nanos();
        let steps = elapsed / interval;
        self.elapsed = Duration::from_nanos(u64::try_from(elapsed % interval).unwrap_or(u64::MAX));
        if steps == 0 {
            return false;
        }
        let shift = usize::try_from(steps % self.len as u128).unwrap_or(0);
        self.current = (self.current + shift) % self.len;
        true
    }

    /// Time left until the next automatic advance.
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.elapsed)
    }

    /// Slide indices for `slots` positions centred on the current slide.
    ///
    /// With nine slots the current slide sits in slot four, slot zero shows
    /// the slide four places back, and so on, wrapping at both ends.
    pub fn window(&self, slots: usize) -> Vec<usize> {
        if self.len == 0 {
            return Vec::new();
        }
        let centre = slots / 2;
        (0..slots)
            .map(|slot| (self.current + slot + (self.len - 1) * centre) % self.len)
            .collect()
    }

    pub fn open_viewer(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.viewer = Some(index);
        true
    }

    pub fn close_viewer(&mut self) {
        self.viewer = None;
    }

    pub fn viewer(&self) -> Option<usize> {
        self.viewer
    }

    fn show(&mut self, index: usize) {
        self.current = index;
        self.elapsed = Duration::ZERO;
    }
}
