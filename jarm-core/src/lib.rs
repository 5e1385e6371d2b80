//! Deterministic construction and parsing of the ten ClientHello/ServerHello
//! exchanges that make up a JARM TLS fingerprint, plus the fuzzy-hash
//! assembler that folds them into the final 62-character string.
//!
//! This crate is deliberately free of networking and async runtime
//! dependencies — opening the sockets and running the probes concurrently
//! is `jarm-cli`'s job. Everything here is pure, panic-free, and
//! reproducible given the same injected randomness.

pub mod builder;
pub mod catalog;
pub mod error;
pub mod hash;
pub mod parser;
pub mod profile;
pub mod random;

pub use builder::build;
pub use error::{Error, Result};
pub use hash::assemble;
pub use parser::{parse, ParseOutcome, Tail};
pub use profile::{ProbeProfile, TEN_PROFILES};
pub use random::{GreaseChooser, RandomSource};

#[cfg(feature = "crypto")]
pub use random::{OsRandomSource, UniformGreaseChooser};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedGreaseChooser, FixedRandomSource};

    /// Exercises the full build → (synthetic) parse → assemble pipeline
    /// end to end, without any network I/O, mirroring what the Probe
    /// Runner does for a real scan.
    #[test]
    fn full_pipeline_produces_a_valid_jarm_shape() {
        let random = FixedRandomSource::new(vec![0x11; 32]);
        let grease = FixedGreaseChooser(0x0a0a);

        let renderings: [String; 10] = std::array::from_fn(|i| {
            let profile = &TEN_PROFILES[i];
            let payload = build(profile, "example.com", &random, &grease);
            assert!(!payload.is_empty());
            // No live server to answer, so every probe renders as failed —
            // this still proves build() and assemble() compose cleanly.
            ParseOutcome::Failed.render()
        });

        let jarm = assemble(&renderings);
        assert_eq!(jarm, "0".repeat(62));
    }
}
