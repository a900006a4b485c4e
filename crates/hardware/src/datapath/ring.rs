//! Decouple buffer: a fixed-capacity circular queue.
//!
//! The queue is addressed by `start`/`end` cursors wrapping modulo the depth.
//! Like its hardware counterpart it has no occupancy register, so one slot is
//! always left free: `start == end` means empty and `end + 1 == start` means
//! full, giving `depth - 1` usable entries. It provides:
//! 1. **Push/Pop:** Enqueue at `end`, dequeue at `start`.
//! 2. **Predicates:** `is_empty`, `is_full`, and `is_near_full` (one push from full).
//! 3. **Head access:** The beat at `start` is what the stream presents.

/// Circular queue with one reserved slot.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    /// Index of the oldest entry.
    start: usize,
    /// Index the next push writes to.
    end: usize,
    /// `depth - 1`; depth is a power of two.
    mask: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty ring of `depth` slots.
    ///
    /// `depth` must be a power of two of at least 2; [`Config::validate`]
    /// guarantees this for configured buffers.
    ///
    /// [`Config::validate`]: crate::config::Config::validate
    pub fn new(depth: usize) -> Self {
        debug_assert!(depth >= 2 && depth.is_power_of_two());
        let mut slots = Vec::with_capacity(depth);
        slots.resize_with(depth, || None);
        Self {
            slots,
            start: 0,
            end: 0,
            mask: depth - 1,
        }
    }

    /// Number of slots, including the reserved one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Largest number of live entries.
    #[inline]
    pub fn usable(&self) -> usize {
        self.mask
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.wrapping_sub(self.start) & self.mask
    }

    /// True when no entry is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when a push would collide with `start`.
    #[inline]
    pub fn is_full(&self) -> bool {
        (self.end + 1) & self.mask == self.start
    }

    /// True when exactly one more push would make the ring full.
    #[inline]
    pub fn is_near_full(&self) -> bool {
        (self.end + 2) & self.mask == self.start
    }

    /// Current read cursor.
    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Current write cursor.
    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Appends an entry, handing it back if the ring is full.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.slots[self.end] = Some(value);
        self.end = (self.end + 1) & self.mask;
        Ok(())
    }

    /// Removes and returns the oldest entry.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.slots[self.start].take();
        self.start = (self.start + 1) & self.mask;
        value
    }

    /// Oldest entry, without removing it.
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.slots[self.start].as_ref()
        }
    }

    /// Live entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).filter_map(move |i| self.slots[(self.start + i) & self.mask].as_ref())
    }

    /// Drops every entry and rewinds both cursors to 0.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.start = 0;
        self.end = 0;
    }
}
