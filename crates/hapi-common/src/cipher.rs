//! Positional XOR cipher used to scramble HAPI archive contents.
//!
//! Every byte after the header is stored as `((mask ^ pos) ^ !plain) & 0xFF`,
//! where `pos` is the byte's absolute offset in the archive. The transform is
//! its own inverse, so the same routine scrambles and unscrambles.

/// Cipher state derived from the raw header key.
///
/// A raw key of zero disables scrambling entirely.
///
/// # Example
///
/// ```
/// use hapi_common::Cipher;
///
/// let cipher = Cipher::from_key(0x12345678);
/// let scrambled = cipher.apply(100, 0x41);
/// assert_eq!(cipher.apply(100, scrambled), 0x41);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cipher {
    mask: u32,
    active: bool,
}

impl Cipher {
    /// A cipher that passes every byte through unchanged.
    pub const DISABLED: Self = Self {
        mask: 0,
        active: false,
    };

    /// Build the cipher for a raw header key.
    #[inline]
    pub const fn from_key(raw_key: u32) -> Self {
        if raw_key == 0 {
            return Self::DISABLED;
        }
        Self {
            mask: Self::derive_mask(raw_key),
            active: true,
        }
    }

    /// Derive the effective mask from a raw key.
    ///
    /// This is not a rotation: the shift amounts are what existing archives
    /// were written with and must stay `<< 2` / `>> 6`.
    #[inline]
    pub const fn derive_mask(raw_key: u32) -> u32 {
        !((raw_key << 2) | (raw_key >> 6))
    }

    /// Whether bytes are transformed at all.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The effective mask, if the cipher is active.
    #[inline]
    pub const fn mask(&self) -> Option<u32> {
        if self.active {
            Some(self.mask)
        } else {
            None
        }
    }

    /// Transform a single byte located at absolute `position`.
    #[inline]
    pub fn apply(&self, position: u64, byte: u8) -> u8 {
        if !self.active {
            return byte;
        }
        // Offsets are 32-bit on disk; the high bits never take part.
        ((self.mask ^ position as u32) ^ !(byte as u32)) as u8
    }

    /// Transform a run of bytes whose first byte sits at absolute `start`.
    pub fn apply_slice(&self, start: u64, data: &mut [u8]) {
        if !self.active {
            return;
        }
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self.apply(start + i as u64, *byte);
        }
    }
}
