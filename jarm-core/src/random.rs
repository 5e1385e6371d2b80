//! Injectable randomness.
//!
//! The builder never calls an RNG directly. Every byte that varies between
//! runs — `client_random`, `session_id`, the key-share key exchange, and the
//! chosen GREASE value — comes from a trait object supplied by the caller.
//! Tests inject fixed sequences so a built ClientHello is byte-for-byte
//! reproducible; production wires up [`OsRandomSource`] and
//! [`UniformGreaseChooser`].

use crate::catalog::GREASE_VALUES;

/// Supplies the random byte material a ClientHello needs.
///
/// A single 32-byte draw covers `client_random`; a second covers
/// `session_id`; a third covers the key-share exchange data. Profiles never
/// reuse a draw across fields, so implementations may treat each call as an
/// independent stream.
pub trait RandomSource {
    /// Fill `buf` with random bytes.
    fn fill(&self, buf: &mut [u8]);
}

/// Picks one of the 16 catalog GREASE values for a probe.
pub trait GreaseChooser {
    /// Return one value from [`GREASE_VALUES`].
    fn choose(&self) -> u16;
}

/// Production [`RandomSource`] backed by the `rand` crate's thread RNG.
#[cfg(feature = "crypto")]
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomSource;

#[cfg(feature = "crypto")]
impl RandomSource for OsRandomSource {
    fn fill(&self, buf: &mut [u8]) {
        use rand::RngCore;
        rand::thread_rng().fill_bytes(buf);
    }
}

/// Production [`GreaseChooser`] drawing uniformly from the 16 GREASE values.
#[cfg(feature = "crypto")]
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformGreaseChooser;

#[cfg(feature = "crypto")]
impl GreaseChooser for UniformGreaseChooser {
    fn choose(&self) -> u16 {
        use rand::Rng;
        let idx = rand::thread_rng().gen_range(0..GREASE_VALUES.len());
        GREASE_VALUES[idx]
    }
}

/// Deterministic [`RandomSource`] that replays a fixed byte sequence,
/// wrapping around if more bytes are requested than it holds. Used by tests
/// and by the fixture replay harness in `jarm-cli`'s integration tests.
#[derive(Debug, Clone)]
pub struct FixedRandomSource {
    bytes: Vec<u8>,
}

impl FixedRandomSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        assert!(!bytes.is_empty(), "FixedRandomSource needs at least one byte");
        Self { bytes }
    }
}

impl RandomSource for FixedRandomSource {
    fn fill(&self, buf: &mut [u8]) {
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.bytes[i % self.bytes.len()];
        }
    }
}

/// Deterministic [`GreaseChooser`] that always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedGreaseChooser(pub u16);

impl GreaseChooser for FixedGreaseChooser {
    fn choose(&self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_random_wraps_around() {
        let src = FixedRandomSource::new(vec![0x01, 0x02, 0x03]);
        let mut buf = [0u8; 7];
        src.fill(&mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x01, 0x02, 0x03, 0x01]);
    }

    #[test]
    fn fixed_grease_is_constant() {
        let chooser = FixedGreaseChooser(0x5a5a);
        assert_eq!(chooser.choose(), 0x5a5a);
        assert_eq!(chooser.choose(), 0x5a5a);
    }
}
