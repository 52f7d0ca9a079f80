use crate::bit_plane::BitDepth;

/// A first-in first-out queue of up to 64 bits.
///
/// The oldest bit sits at the most significant end of `bits`.
#[derive(Debug, Default)]
pub(crate) struct BitQueue {
    bits: u64,
    len: u32,
}

impl BitQueue {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// appends the lowest `depth` bits of `value`
    pub fn push(&mut self, value: u8, depth: BitDepth) {
        let width = depth.get() as u32;
        debug_assert!(self.len + width <= u64::BITS, "bit queue overflow");

        self.bits = (self.bits << width) | (value as u64 & mask(width));
        self.len += width;
    }

    /// takes the oldest `depth` bits, right-aligned
    pub fn pop(&mut self, depth: BitDepth) -> u8 {
        let width = depth.get() as u32;
        debug_assert!(width <= self.len, "bit queue underflow");

        self.len -= width;
        let value = (self.bits >> self.len) & mask(width);
        self.bits &= mask(self.len);

        value as u8
    }

    /// appends zero bits until the queue holds `len` bits
    pub fn pad_to(&mut self, len: usize) {
        let missing = (len as u32).saturating_sub(self.len);
        debug_assert!(self.len + missing <= u64::BITS, "bit queue overflow");

        self.bits <<= missing;
        self.len += missing;
    }
}

fn mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(d: u8) -> BitDepth {
        BitDepth::new(d).unwrap()
    }

    #[test]
    fn should_pop_bits_in_push_order() {
        let mut q = BitQueue::default();
        q.push(0b101, depth(3));
        q.push(0b0110, depth(4));

        assert_eq!(q.len(), 7);
        assert_eq!(q.pop(depth(2)), 0b10);
        assert_eq!(q.pop(depth(3)), 0b101);
        assert_eq!(q.pop(depth(2)), 0b10);
        assert!(q.is_empty());
    }

    #[test]
    fn should_ignore_bits_above_the_depth() {
        let mut q = BitQueue::default();
        q.push(0xFF, depth(2));

        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(depth(2)), 0b11);
    }

    #[test]
    fn should_pad_with_zeros_at_the_end() {
        let mut q = BitQueue::default();
        q.push(0b11, depth(2));
        q.pad_to(6);

        assert_eq!(q.len(), 6);
        assert_eq!(q.pop(depth(6)), 0b110000);
    }

    #[test]
    fn should_hold_six_full_bytes() {
        let mut q = BitQueue::default();
        for b in [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC] {
            q.push(b, depth(8));
        }

        assert_eq!(q.len(), 48);
        for b in [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC] {
            assert_eq!(q.pop(depth(8)), b);
        }
    }
}
