//! Capacity arithmetic shared by all payload kinds.
//!
//! Capacity is counted in channel slots (one 8 bit color channel) and bits.
//! A reserved region at the start of the carrier holds the header, one header
//! bit per slot, so it withholds `reserved_slots * depth` bits of capacity at
//! a given depth.

use crate::bit_plane::BitDepth;
use crate::error::SteganoError;
use crate::media::CHANNELS_PER_PIXEL;
use crate::result::Result;

/// Share of the available capacity below which distortions are considered invisible.
/// Advisory only, the codec never enforces it.
pub const SAFE_USAGE_RATIO: f64 = 0.1;

pub fn total_capacity_bits(
    width: u32,
    height: u32,
    channels_per_pixel: usize,
    depth: BitDepth,
) -> usize {
    width as usize * height as usize * channels_per_pixel * depth.bits()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Capacity {
    total_slots: usize,
    reserved_slots: usize,
    depth: BitDepth,
    group_slots: usize,
}

impl Capacity {
    pub fn new(total_slots: usize, reserved_slots: usize, depth: BitDepth) -> Self {
        Self {
            total_slots,
            reserved_slots,
            depth,
            group_slots: 1,
        }
    }

    /// capacity of an RGB carrier of the given dimensions
    pub fn of(width: u32, height: u32, reserved_slots: usize, depth: BitDepth) -> Self {
        Self::new(
            width as usize * height as usize * CHANNELS_PER_PIXEL,
            reserved_slots,
            depth,
        )
    }

    /// Only whole groups of `group_slots` consecutive slots are writable,
    /// a remainder at the end of the carrier does not count as available.
    pub fn in_groups_of(mut self, group_slots: usize) -> Self {
        self.group_slots = group_slots.max(1);
        self
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn reserved_slots(&self) -> usize {
        self.reserved_slots
    }

    pub fn total_bits(&self) -> usize {
        self.total_slots * self.depth.bits()
    }

    pub fn reserved_bits(&self) -> usize {
        self.reserved_slots.min(self.total_slots) * self.depth.bits()
    }

    pub fn available_slots(&self) -> usize {
        let free = self.total_slots.saturating_sub(self.reserved_slots);
        free - free % self.group_slots
    }

    pub fn available_bits(&self) -> usize {
        self.available_slots() * self.depth.bits()
    }

    /// fails with `CapacityExceeded` if `required_bits` do not fit
    pub fn ensure_fits(&self, required_bits: usize) -> Result<()> {
        let available = self.available_bits();
        if required_bits > available {
            return Err(SteganoError::CapacityExceeded {
                required: required_bits,
                available,
            });
        }

        Ok(())
    }

    pub fn report(&self) -> CapacityReport {
        let available_bits = self.available_bits();
        let available_bytes = available_bits / 8;

        CapacityReport {
            depth: self.depth,
            total_bits: self.total_bits(),
            reserved_bits: self.reserved_bits(),
            available_bits,
            available_bytes,
            safe_bytes: (available_bytes as f64 * SAFE_USAGE_RATIO) as usize,
        }
    }
}

/// Figures about a carrier, meant for presenting to a user
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    pub depth: BitDepth,
    pub total_bits: usize,
    pub reserved_bits: usize,
    pub available_bits: usize,
    pub available_bytes: usize,
    /// recommended upper bound for a payload to stay visually unnoticeable
    pub safe_bytes: usize,
}

impl CapacityReport {
    /// share of the available capacity used by a payload of `bytes`, in percent
    pub fn usage_percent(&self, bytes: usize) -> f64 {
        if self.available_bytes == 0 {
            return f64::INFINITY;
        }
        bytes as f64 * 100.0 / self.available_bytes as f64
    }

    pub fn exceeds_safe_usage(&self, bytes: usize) -> bool {
        bytes > self.safe_bytes
    }
}

/// One line of the image-in-image capacity overview
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageCapacityRow {
    pub lsb: BitDepth,
    pub available_bits: usize,
    /// payload pixels that fit with the worst case of `msb = 8`
    pub max_hidden_pixels: usize,
    /// side length of the largest square payload with `msb = 8`
    pub max_square_side: usize,
}

/// capacity of a carrier for hiding an image, for every possible `lsb`
pub fn image_capacity_table(width: u32, height: u32, reserved_slots: usize) -> Vec<ImageCapacityRow> {
    BitDepth::all()
        .map(|lsb| {
            let available_bits = Capacity::of(width, height, reserved_slots, lsb)
                .in_groups_of(CHANNELS_PER_PIXEL)
                .available_bits();
            let max_hidden_pixels = available_bits / (CHANNELS_PER_PIXEL * BitDepth::MAX.bits());

            ImageCapacityRow {
                lsb,
                available_bits,
                max_hidden_pixels,
                max_square_side: (max_hidden_pixels as f64).sqrt() as usize,
            }
        })
        .collect()
}

/// Picks the smallest `lsb` and, for it, the largest `msb` that lets the payload fit.
///
/// Prefers little carrier distortion over payload fidelity. `None` if even
/// `lsb = 8` with `msb = 1` is too small.
pub fn optimal_depths(
    carrier: (u32, u32),
    payload: (u32, u32),
    reserved_slots: usize,
) -> Option<(BitDepth, BitDepth)> {
    let payload_slots = payload.0 as usize * payload.1 as usize * CHANNELS_PER_PIXEL;

    BitDepth::all().find_map(|lsb| {
        let capacity = Capacity::of(carrier.0, carrier.1, reserved_slots, lsb)
            .in_groups_of(CHANNELS_PER_PIXEL);
        BitDepth::all()
            .rev()
            .find(|msb| capacity.ensure_fits(payload_slots * msb.bits()).is_ok())
            .map(|msb| (lsb, msb))
    })
}
