//! # Stamp Buffer
//!
//! A per-slot "seen this round" flag with O(1) bulk reset.

/// A fixed-length set of slot indices that clears in constant time.
///
/// Each slot stores the generation in which it was last marked. A slot is
/// marked only if its stamp equals the current generation, so
/// [`StampBuffer::advance`] unmarks everything without touching memory.
/// When the generation counter wraps the stamps are zeroed once.
///
/// # Thread Safety
///
/// Not thread-safe. Own one buffer per searcher.
///
/// # Example
///
/// ```rust
/// use kiln_core::StampBuffer;
///
/// let mut seen = StampBuffer::new(16);
/// seen.mark(3);
/// assert!(seen.is_marked(3));
///
/// seen.advance();
/// assert!(!seen.is_marked(3));
/// ```
#[derive(Debug, Clone)]
pub struct StampBuffer {
    /// Generation in which each slot was last marked.
    stamps: Box<[u32]>,
    /// Current generation. Never zero, so fresh slots read as unmarked.
    generation: u32,
}

impl StampBuffer {
    /// Creates a buffer with `len` unmarked slots.
    ///
    /// # Arguments
    ///
    /// * `len` - Number of slots
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            stamps: vec![0u32; len].into_boxed_slice(),
            generation: 1,
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Returns true if the buffer has no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// Returns the current generation.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Unmarks every slot.
    pub fn advance(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }
    }

    /// Marks a slot. Out-of-range indices are ignored.
    #[inline]
    pub fn mark(&mut self, index: usize) {
        if let Some(stamp) = self.stamps.get_mut(index) {
            *stamp = self.generation;
        }
    }

    /// Unmarks a single slot.
    #[inline]
    pub fn unmark(&mut self, index: usize) {
        if let Some(stamp) = self.stamps.get_mut(index) {
            *stamp = 0;
        }
    }

    /// Returns true if the slot was marked in the current generation.
    #[inline]
    #[must_use]
    pub fn is_marked(&self, index: usize) -> bool {
        self.stamps.get(index).is_some_and(|&s| s == self.generation)
    }

    /// Marks a slot and returns whether it was already marked.
    #[inline]
    pub fn test_and_mark(&mut self, index: usize) -> bool {
        let was = self.is_marked(index);
        self.mark(index);
        was
    }

    #[cfg(test)]
    fn force_generation(&mut self, generation: u32) {
        self.generation = generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_advance() {
        let mut buf = StampBuffer::new(8);
        assert!(!buf.is_marked(2));
        buf.mark(2);
        assert!(buf.is_marked(2));
        buf.advance();
        assert!(!buf.is_marked(2));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut buf = StampBuffer::new(4);
        buf.mark(100);
        assert!(!buf.is_marked(100));
    }

    #[test]
    fn test_test_and_mark() {
        let mut buf = StampBuffer::new(4);
        assert!(!buf.test_and_mark(1));
        assert!(buf.test_and_mark(1));
    }

    #[test]
    fn test_generation_wraparound_clears() {
        let mut buf = StampBuffer::new(4);
        buf.force_generation(u32::MAX);
        buf.mark(0);
        assert!(buf.is_marked(0));

        buf.advance();
        assert_eq!(buf.generation(), 1);
        assert!(!buf.is_marked(0));

        // A stale stamp equal to the new generation must not survive the wrap.
        buf.force_generation(1);
        assert!(!buf.is_marked(0));
    }
}
