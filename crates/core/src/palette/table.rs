//! Per-sprite palette remap table.
//!
//! A [`PaletteTable`] translates each source palette index to an output index
//! before the transparency test. It always holds exactly [`PALETTE_SIZE`]
//! entries, entry 0 is always 0 and no entry is ever negative. Invalid input is
//! sanitized or ignored, never rejected.

use crate::logging::{log, LogCategory, LogLevel};

/// Number of slots in a remap table (4bpp palette).
pub const PALETTE_SIZE: usize = 16;

/// Palette index reserved as the transparency key.
pub const TRANSPARENT_INDEX: i32 = 0;

/// Validated 16-slot index remapping array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteTable {
    entries: [i32; PALETTE_SIZE],
}

const IDENTITY: [i32; PALETTE_SIZE] = {
    let mut entries = [0; PALETTE_SIZE];
    let mut i = 0;
    while i < PALETTE_SIZE {
        entries[i] = i as i32;
        i += 1;
    }
    entries
};

impl Default for PaletteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteTable {
    /// Identity mapping: every index maps to itself.
    pub const fn new() -> Self {
        Self { entries: IDENTITY }
    }

    /// Build a table from a partial mapping, sanitized like [`PaletteTable::replace`].
    pub fn from_mapping(mapping: &[i32]) -> Self {
        let mut table = Self::new();
        table.replace(mapping);
        table
    }

    /// Replace the whole mapping.
    ///
    /// The mapping may have any length. Slot 0 is forced to 0, slots past the
    /// end of `mapping` are padded with the identity, and any negative value is
    /// reset to the identity. Values past slot 15 are dropped. Large values
    /// (16 and up) are kept as-is; they are written verbatim to the destination.
    pub fn replace(&mut self, mapping: &[i32]) {
        let mut entries = IDENTITY;
        let copied = mapping.len().min(PALETTE_SIZE);
        entries[..copied].copy_from_slice(&mapping[..copied]);
        entries[0] = TRANSPARENT_INDEX;

        for (i, entry) in entries.iter_mut().enumerate() {
            if *entry < 0 {
                *entry = i as i32;
            }
        }

        log(LogCategory::Palette, LogLevel::Trace, || {
            format!(
                "Palette: replace with {} entries ({} ignored) -> {:?}",
                mapping.len(),
                mapping.len().saturating_sub(PALETTE_SIZE),
                entries
            )
        });

        self.entries = entries;
    }

    /// Remap a single color. Both `src` and `dst` must be in 1–15, otherwise
    /// the call does nothing.
    pub fn set_entry(&mut self, src: i32, dst: i32) {
        if !(1..=15).contains(&src) || !(1..=15).contains(&dst) {
            log(LogCategory::Palette, LogLevel::Debug, || {
                format!("Palette: ignoring remap {} -> {} (outside 1-15)", src, dst)
            });
            return;
        }
        self.entries[src as usize] = dst;
    }

    /// Look up the output index for `index`.
    ///
    /// `index` must be a valid palette index (0–15). This is checked in debug
    /// builds only.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside 0–15.
    #[inline(always)]
    pub fn lookup(&self, index: i32) -> i32 {
        debug_assert!(
            (0..PALETTE_SIZE as i32).contains(&index),
            "palette index {} outside 0-15",
            index
        );
        self.entries[index as usize]
    }

    /// All 16 entries, slot 0 first.
    #[inline]
    pub fn entries(&self) -> &[i32; PALETTE_SIZE] {
        &self.entries
    }

    pub fn is_identity(&self) -> bool {
        self.entries == IDENTITY
    }

    /// Go back to the identity mapping.
    pub fn reset(&mut self) {
        self.entries = IDENTITY;
    }
}
