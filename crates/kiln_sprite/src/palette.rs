//! # Palettes
//!
//! Every container addresses colours through an 8-bit index, so a palette is
//! always 256 slots. Slots past the stored entry count read as transparent black.

/// One RGBA8 colour.
pub type Rgba = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0; 4];

/// Indexed colour table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgba; 256],
    len: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: [TRANSPARENT; 256],
            len: 0,
        }
    }
}

impl Palette {
    /// Builds a palette from stored BGRA entries. The stored alpha byte is
    /// unused by the legacy formats and every entry becomes opaque.
    #[must_use]
    pub fn from_bgra(entries: &[[u8; 4]]) -> Self {
        let mut palette = Self::default();
        for (slot, &[b, g, r, _]) in palette.entries.iter_mut().zip(entries) {
            *slot = [r, g, b, 255];
        }
        palette.len = entries.len().min(256);
        palette
    }

    /// Builds a palette from stored RGBA entries, alpha kept.
    #[must_use]
    pub fn from_rgba(entries: &[Rgba]) -> Self {
        let mut palette = Self::default();
        let len = entries.len().min(256);
        palette.entries[..len].copy_from_slice(&entries[..len]);
        palette.len = len;
        palette
    }

    /// Number of stored entries (at most 256).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no entries are stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Colour for `index`.
    #[inline]
    #[must_use]
    pub const fn get(&self, index: u8) -> Rgba {
        self.entries[index as usize]
    }

    /// Stored entries.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Rgba] {
        &self.entries[..self.len]
    }

    /// Index of the stored entry closest to `rgb` by summed channel distance.
    /// Ties go to the lowest index. Empty palettes map everything to 0.
    #[must_use]
    pub fn nearest(&self, rgb: [u8; 3]) -> u8 {
        let mut best = (0u8, u32::MAX);
        for (index, entry) in self.entries().iter().enumerate() {
            let dist: u32 = rgb
                .iter()
                .zip(entry)
                .map(|(&a, &b)| u32::from(a.abs_diff(b)))
                .sum();
            if dist < best.1 {
                best = (index as u8, dist);
                if dist == 0 {
                    break;
                }
            }
        }
        best.0
    }
}
