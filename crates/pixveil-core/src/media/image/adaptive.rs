//! Image in image hiding with adaptive bit depths.
//!
//! The payload image is sampled with `msb` bits per channel, the carrier takes
//! `lsb` bits per channel. Payload bits are queued up and written in groups of
//! `3 * lsb` bits into three consecutive carrier channels. Groups are spread
//! over the whole carrier by a real valued `stride`: the `n`th group starts at
//! channel `offset + round(n * 3 * stride)`, with the position accumulated by
//! repeated addition. Hide and unveil share [`SlotWalk`], so both visit the
//! very same channels.

use log::{debug, trace};

use crate::bit_plane::{high_bits, low_bits, set_low_bits, BitDepth};
use crate::capacity::Capacity;
use crate::error::SteganoError;
use crate::media::header::ImageHeader;
use crate::media::CHANNELS_PER_PIXEL;
use crate::result::Result;

use super::bit_queue::BitQueue;

/// carrier channels written per step
const GROUP_SLOTS: usize = CHANNELS_PER_PIXEL;

/// Smallest stride that keeps write groups from overlapping
pub const MIN_STRIDE: f64 = 1.0;

/// The parameters of one embedding, all that is needed to walk the carrier again
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EmbeddingPlan {
    lsb: BitDepth,
    msb: BitDepth,
    stride: f64,
    offset: usize,
    payload_slots: usize,
}

impl EmbeddingPlan {
    /// Spreads `payload_slots` channels evenly over the carrier channels behind `offset`.
    ///
    /// `stride = (available_slots * lsb) / padded_payload_bits`, where the
    /// payload bits are rounded up to whole write groups. With validated
    /// capacity this is never below [`MIN_STRIDE`].
    pub fn spread(
        carrier_slots: usize,
        offset: usize,
        payload_slots: usize,
        lsb: BitDepth,
        msb: BitDepth,
    ) -> Result<Self> {
        let capacity = Capacity::new(carrier_slots, offset, lsb).in_groups_of(GROUP_SLOTS);
        capacity.ensure_fits(payload_slots * msb.bits())?;

        let groups = write_groups(payload_slots, lsb, msb);
        let stride = if groups == 0 {
            MIN_STRIDE
        } else {
            capacity.available_bits() as f64 / (groups * GROUP_SLOTS * lsb.bits()) as f64
        };

        let plan = Self {
            lsb,
            msb,
            stride,
            offset,
            payload_slots,
        };
        plan.ensure_within(carrier_slots)?;
        debug!("spreading {payload_slots} payload channels with {plan:?}");

        Ok(plan)
    }

    /// Uses a caller chosen stride instead of the even spread.
    ///
    /// Fails with `InvalidStride` if groups would overlap or the walk would leave the carrier.
    pub fn with_stride(
        carrier_slots: usize,
        offset: usize,
        payload_slots: usize,
        lsb: BitDepth,
        msb: BitDepth,
        stride: f64,
    ) -> Result<Self> {
        let capacity = Capacity::new(carrier_slots, offset, lsb).in_groups_of(GROUP_SLOTS);
        capacity.ensure_fits(payload_slots * msb.bits())?;

        let groups = write_groups(payload_slots, lsb, msb);
        let max = if groups > 1 {
            (capacity.available_slots() - GROUP_SLOTS) as f64 / (GROUP_SLOTS * (groups - 1)) as f64
        } else {
            f64::MAX
        };
        let invalid = SteganoError::InvalidStride {
            stride,
            min: MIN_STRIDE,
            max,
        };
        if !stride.is_finite() || !(MIN_STRIDE..=max).contains(&stride) {
            return Err(invalid);
        }

        let plan = Self {
            lsb,
            msb,
            stride,
            offset,
            payload_slots,
        };
        plan.ensure_within(carrier_slots).map_err(|_| invalid)?;
        debug!("custom stride for {payload_slots} payload channels with {plan:?}");

        Ok(plan)
    }

    /// the plan a header describes, trusting its stride bit for bit
    pub fn from_header(header: &ImageHeader, offset: usize) -> Self {
        Self {
            lsb: header.lsb,
            msb: header.msb,
            stride: header.stride,
            offset,
            payload_slots: header.width as usize * header.height as usize * CHANNELS_PER_PIXEL,
        }
    }

    pub fn header(&self, width: u32, height: u32) -> ImageHeader {
        ImageHeader {
            width,
            height,
            lsb: self.lsb,
            msb: self.msb,
            stride: self.stride,
        }
    }

    pub fn lsb(&self) -> BitDepth {
        self.lsb
    }

    pub fn msb(&self) -> BitDepth {
        self.msb
    }

    pub fn stride(&self) -> f64 {
        self.stride
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn payload_slots(&self) -> usize {
        self.payload_slots
    }

    /// number of `3 * lsb` bit groups written into the carrier
    pub fn write_groups(&self) -> usize {
        write_groups(self.payload_slots, self.lsb, self.msb)
    }

    /// the first channel index of every write group, in order
    pub fn slots(&self) -> SlotWalk {
        SlotWalk {
            pos: 0.0,
            step: self.stride * GROUP_SLOTS as f64,
            offset: self.offset,
            remaining: self.write_groups(),
        }
    }

    /// one past the last carrier channel the walk touches, saturating for absurd strides
    pub fn end(&self) -> usize {
        self.slots()
            .last()
            .map_or(self.offset, |slot| slot.saturating_add(GROUP_SLOTS))
    }

    fn ensure_within(&self, carrier_slots: usize) -> Result<()> {
        let end = self.end();
        if end > carrier_slots {
            return Err(SteganoError::CapacityExceeded {
                required: (end - self.offset).saturating_mul(self.lsb.bits()),
                available: carrier_slots.saturating_sub(self.offset) * self.lsb.bits(),
            });
        }

        Ok(())
    }
}

fn write_groups(payload_slots: usize, lsb: BitDepth, msb: BitDepth) -> usize {
    (payload_slots * msb.bits()).div_ceil(GROUP_SLOTS * lsb.bits())
}

/// Iterates the first channel of each write group.
///
/// `pos` is accumulated by addition and rounded half to even, hide and unveil
/// must agree on both or every following group is off. Positions past
/// `usize::MAX` saturate, they lie outside any carrier anyway.
#[derive(Debug, Clone)]
pub struct SlotWalk {
    pos: f64,
    step: f64,
    offset: usize,
    remaining: usize,
}

impl Iterator for SlotWalk {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let slot = (self.pos.round_ties_even() as usize).saturating_add(self.offset);
        self.pos += self.step;

        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SlotWalk {}

/// Writes the payload channels into `carrier` as described by `plan`.
///
/// The whole walk is checked against the carrier bounds before the first channel changes.
pub fn embed(plan: &EmbeddingPlan, carrier: &mut [u8], payload: &[u8]) -> Result<()> {
    if payload.len() != plan.payload_slots {
        return Err(SteganoError::InvalidCarrierLength {
            expected: plan.payload_slots,
            actual: payload.len(),
        });
    }
    plan.ensure_within(carrier.len())?;

    let group_bits = GROUP_SLOTS * plan.lsb.bits();
    let mut queue = BitQueue::default();
    let mut slots = plan.slots();

    for channel in payload {
        queue.push(high_bits(*channel, plan.msb), plan.msb);
        while queue.len() >= group_bits {
            write_group(plan, carrier, slots.next(), &mut queue)?;
        }
    }

    // the tail that does not fill a whole group
    if !queue.is_empty() {
        queue.pad_to(group_bits);
        write_group(plan, carrier, slots.next(), &mut queue)?;
    }

    Ok(())
}

fn write_group(
    plan: &EmbeddingPlan,
    carrier: &mut [u8],
    slot: Option<usize>,
    queue: &mut BitQueue,
) -> Result<()> {
    let available = carrier.len();
    let group = slot
        .and_then(|slot| carrier.get_mut(slot..slot.checked_add(GROUP_SLOTS)?))
        .ok_or_else(|| SteganoError::CapacityExceeded {
            required: plan.end().saturating_mul(plan.lsb.bits()),
            available: available * plan.lsb.bits(),
        })?;
    trace!("writing group at {slot:?}");

    for channel in group {
        *channel = set_low_bits(*channel, queue.pop(plan.lsb), plan.lsb);
    }

    Ok(())
}

/// Reads `plan.payload_slots()` channels back from `carrier`.
///
/// Every recovered channel carries the `msb` hidden bits on top, padded with zeros.
/// Running out of carrier first is a `CorruptPayload`, a partial result is never returned.
pub fn extract(plan: &EmbeddingPlan, carrier: &[u8]) -> Result<Vec<u8>> {
    let expected = plan.payload_slots;
    let pad = 8 - plan.msb.get();
    let mut payload = Vec::with_capacity(expected);
    let mut queue = BitQueue::default();

    for slot in plan.slots() {
        let group = slot
            .checked_add(GROUP_SLOTS)
            .and_then(|end| carrier.get(slot..end));
        let Some(group) = group else {
            return Err(SteganoError::CorruptPayload {
                expected,
                recovered: payload.len(),
            });
        };

        for channel in group {
            queue.push(low_bits(*channel, plan.lsb), plan.lsb);
        }
        while queue.len() >= plan.msb.bits() && payload.len() < expected {
            payload.push(queue.pop(plan.msb) << pad);
        }
    }

    if payload.len() < expected {
        return Err(SteganoError::CorruptPayload {
            expected,
            recovered: payload.len(),
        });
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(d: u8) -> BitDepth {
        BitDepth::new(d).unwrap()
    }

    fn noise(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    /// what unveil is expected to return for a payload at a given msb
    fn truncated(payload: &[u8], msb: BitDepth) -> Vec<u8> {
        let keep = !(0xFFu8.checked_shr(msb.get() as u32).unwrap_or(0));
        payload.iter().map(|c| c & keep).collect()
    }

    #[test]
    fn should_place_a_single_pixel_at_the_start_of_a_4x4_carrier() {
        let mut carrier = vec![0b1111_0000u8; 48];
        let payload = [0b1000_0000, 0b0111_1111, 0b1100_0000];
        let plan = EmbeddingPlan::spread(48, 0, 3, depth(1), depth(1)).unwrap();

        assert_eq!(plan.stride(), 16.0);
        assert_eq!(plan.slots().collect::<Vec<_>>(), vec![0]);

        embed(&plan, &mut carrier, &payload).unwrap();
        assert_eq!(carrier[..3], [0b1111_0001, 0b1111_0000, 0b1111_0001]);
        assert!(carrier[3..].iter().all(|c| *c == 0b1111_0000));

        let recovered = extract(&plan, &carrier).unwrap();
        assert_eq!(recovered, vec![0b1000_0000, 0b0000_0000, 0b1000_0000]);
    }

    #[test]
    fn should_pack_densely_at_the_capacity_limit() {
        // 30 slots behind the offset, 10 groups, payload needs exactly 10 groups
        let plan = EmbeddingPlan::spread(34, 4, 15, depth(2), depth(4)).unwrap();

        assert_eq!(plan.stride(), 1.0);
        assert_eq!(
            plan.slots().collect::<Vec<_>>(),
            (0..10).map(|g| 4 + g * 3).collect::<Vec<_>>()
        );
    }

    #[test]
    fn should_spread_sparsely_over_a_large_carrier() {
        let plan = EmbeddingPlan::spread(3000, 0, 30, depth(1), depth(1)).unwrap();
        let slots: Vec<usize> = plan.slots().collect();

        assert_eq!(plan.stride(), 100.0);
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[1], 300);
        assert_eq!(*slots.last().unwrap(), 2700);
    }

    #[test]
    fn should_never_overlap_groups() {
        for (carrier_slots, payload_slots, lsb, msb) in [
            (1_000, 123, 3, 5),
            (997, 330, 1, 3),
            (4_099, 1_200, 8, 8),
            (50_001, 7, 1, 8),
        ] {
            let plan = EmbeddingPlan::spread(carrier_slots, 4, payload_slots, depth(lsb), depth(msb))
                .unwrap();
            let slots: Vec<usize> = plan.slots().collect();

            assert!(plan.stride() >= MIN_STRIDE);
            assert!(slots.windows(2).all(|w| w[1] >= w[0] + 3));
            assert!(plan.end() <= carrier_slots);
        }
    }

    #[test]
    fn should_round_trip_dense_and_sparse_embeddings() {
        for (carrier_slots, payload_slots, lsb, msb) in [
            (3_000, 3_000, 1, 1),
            (3_000, 999, 3, 3),
            (3_004, 1_500, 4, 8),
            (12_288, 48, 1, 8),
            (12_288, 4_096, 8, 8),
            (6_001, 2_001, 5, 7),
        ] {
            let mut carrier = noise(carrier_slots, 7);
            let payload = noise(payload_slots, 42);
            let (lsb, msb) = (depth(lsb), depth(msb));
            let plan = EmbeddingPlan::spread(carrier_slots, 0, payload_slots, lsb, msb).unwrap();

            embed(&plan, &mut carrier, &payload).unwrap();
            let recovered = extract(&plan, &carrier).unwrap();

            assert_eq!(
                recovered,
                truncated(&payload, msb),
                "round trip failed for lsb={lsb} msb={msb} stride={}",
                plan.stride()
            );
        }
    }

    #[test]
    fn should_keep_the_tail_of_a_payload_that_does_not_fill_a_group() {
        // 3 * 3 = 9 bits per pixel, 3 * 8 = 24 bits per group
        let mut carrier = noise(900, 1);
        let payload = noise(15, 2);
        let plan = EmbeddingPlan::spread(900, 0, 15, depth(8), depth(3)).unwrap();

        assert_eq!(plan.write_groups(), 2);
        embed(&plan, &mut carrier, &payload).unwrap();

        assert_eq!(extract(&plan, &carrier).unwrap(), truncated(&payload, depth(3)));
    }

    #[test]
    fn should_reject_a_payload_beyond_capacity_without_touching_the_carrier() {
        let result = EmbeddingPlan::spread(48, 0, 48, depth(1), depth(2));

        match result {
            Err(SteganoError::CapacityExceeded {
                required,
                available,
            }) => {
                assert_eq!(required, 96);
                assert_eq!(available, 48);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn required_bits_should_grow_with_msb() {
        let mut last = 0;
        for msb in BitDepth::all() {
            let required = match EmbeddingPlan::spread(10, 0, 30, depth(1), msb) {
                Err(SteganoError::CapacityExceeded { required, .. }) => required,
                other => panic!("expected CapacityExceeded, got {other:?}"),
            };
            assert!(required > last);
            last = required;
        }
    }

    #[test]
    fn should_accept_custom_strides_within_bounds() {
        let plan = EmbeddingPlan::with_stride(300, 0, 30, depth(1), depth(1), 2.5).unwrap();
        let mut carrier = noise(300, 3);
        let payload = noise(30, 4);

        assert_eq!(plan.slots().take(3).collect::<Vec<_>>(), vec![0, 8, 15]);
        embed(&plan, &mut carrier, &payload).unwrap();
        assert_eq!(extract(&plan, &carrier).unwrap(), truncated(&payload, depth(1)));
    }

    #[test]
    fn should_reject_overlapping_or_overlong_custom_strides() {
        for stride in [0.5, 11.5, f64::NAN, f64::INFINITY] {
            let result = EmbeddingPlan::with_stride(300, 0, 30, depth(1), depth(1), stride);
            assert!(
                matches!(result, Err(SteganoError::InvalidStride { .. })),
                "stride {stride} was accepted"
            );
        }
    }

    #[test]
    fn should_fail_loudly_on_an_exhausted_carrier() {
        let plan = EmbeddingPlan::spread(300, 0, 30, depth(1), depth(1)).unwrap();
        let carrier = noise(150, 5);

        assert!(matches!(
            extract(&plan, &carrier),
            Err(SteganoError::CorruptPayload {
                expected: 30,
                recovered: 15
            })
        ));
    }

    #[test]
    fn should_report_a_header_stride_beyond_the_carrier() {
        let header = ImageHeader {
            width: 4,
            height: 4,
            lsb: depth(1),
            msb: depth(1),
            stride: 1e300,
        };
        let plan = EmbeddingPlan::from_header(&header, 100);
        let carrier = noise(12_288, 6);

        assert_eq!(plan.slots().nth(1), Some(usize::MAX));
        assert_eq!(plan.end(), usize::MAX);
        assert!(matches!(
            extract(&plan, &carrier),
            Err(SteganoError::CorruptPayload {
                expected: 48,
                recovered: 3
            })
        ));
    }

    #[test]
    fn should_walk_identically_from_a_header() {
        let plan = EmbeddingPlan::spread(10_000, 100, 999, depth(2), depth(6)).unwrap();
        let header = plan.header(37, 9);
        let restored = EmbeddingPlan::from_header(&header, 100);

        assert_eq!(restored, plan);
        assert!(plan.slots().eq(restored.slots()));
    }
}
