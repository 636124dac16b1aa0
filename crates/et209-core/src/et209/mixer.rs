//! Frame mixer
//!
//! One frame holds the four raw bus sums produced by a single sample tick.
//! The combination rules turn those into the legacy mono sample or the
//! authentic left/right pair.

use super::registers::Bus;

/// Raw, unfiltered bus sums for one sample
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Center bus (half weight on both channels)
    pub center: i32,
    /// Right bus
    pub right: i32,
    /// Left bus
    pub left: i32,
    /// Boosted bus (full weight on both channels)
    pub boosted: i32,
}

impl Frame {
    /// Add a contribution to one bus
    #[inline]
    pub fn add(&mut self, bus: Bus, value: i32) {
        match bus {
            Bus::Center => self.center += value,
            Bus::Right => self.right += value,
            Bus::Left => self.left += value,
            Bus::Boosted => self.boosted += value,
        }
    }

    /// Value of one bus
    #[inline]
    pub fn bus(&self, bus: Bus) -> i32 {
        match bus {
            Bus::Center => self.center,
            Bus::Right => self.right,
            Bus::Left => self.left,
            Bus::Boosted => self.boosted,
        }
    }

    /// Buses in `{Center, Right, Left, Boosted}` order
    #[inline]
    pub fn to_array(self) -> [i32; 4] {
        [self.center, self.right, self.left, self.boosted]
    }

    /// Combined mono sample: `(Center + Right + Left) / 2 + Boosted`
    #[inline]
    pub fn combined(&self) -> f32 {
        (self.center + self.right + self.left) as f32 * 0.5 + self.boosted as f32
    }

    /// Authentic left channel: `Left + Boosted + (Center >> 1)`
    #[inline]
    pub fn left_channel(&self) -> i32 {
        (self.center >> 1) + self.left + self.boosted
    }

    /// Authentic right channel: `Right + Boosted + (Center >> 1)`
    #[inline]
    pub fn right_channel(&self) -> i32 {
        (self.center >> 1) + self.right + self.boosted
    }
}

impl From<Frame> for [i32; 4] {
    fn from(frame: Frame) -> Self {
        frame.to_array()
    }
}
