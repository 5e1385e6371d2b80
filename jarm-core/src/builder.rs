//! Hello Builder: turns a [`ProbeProfile`] and a target hostname into a
//! complete TLS record carrying a ClientHello.
//!
//! Every byte that isn't fixed by the profile comes from the injected
//! [`RandomSource`] and [`GreaseChooser`] — this module never reaches for an
//! RNG itself, which is what makes [`build`] reproducible under test.

use crate::catalog::{self, CipherList};
use crate::profile::{CipherOrder, ExtensionOrder, ProbeProfile, SupportMode};
use crate::random::{GreaseChooser, RandomSource};

const SIGNATURE_ALGORITHMS_EXT: [u8; 24] = [
    0x00, 0x0d, 0x00, 0x14, 0x00, 0x12, 0x04, 0x03, 0x08, 0x04, 0x04, 0x01, 0x05, 0x03, 0x08,
    0x05, 0x05, 0x01, 0x08, 0x06, 0x06, 0x01, 0x02, 0x01,
];

const SUPPORTED_GROUPS_EXT: [u8; 14] = [
    0x00, 0x0a, 0x00, 0x0a, 0x00, 0x08, 0x00, 0x1d, 0x00, 0x17, 0x00, 0x18, 0x00, 0x19,
];

const EC_POINT_FORMATS_EXT: [u8; 6] = [0x00, 0x0b, 0x00, 0x02, 0x01, 0x00];
const EXT_MASTER_SECRET_EXT: [u8; 4] = [0x00, 0x17, 0x00, 0x00];
const MAX_FRAGMENT_LENGTH_EXT: [u8; 5] = [0x00, 0x01, 0x00, 0x01, 0x01];
const RENEGOTIATION_INFO_EXT: [u8; 5] = [0xff, 0x01, 0x00, 0x01, 0x00];
const SESSION_TICKET_EXT: [u8; 4] = [0x00, 0x23, 0x00, 0x00];
const PSK_KEY_EXCHANGE_MODES_EXT: [u8; 6] = [0x00, 0x2d, 0x00, 0x02, 0x01, 0x01];

/// Builds the complete TLS record (record header + handshake header +
/// ClientHello body) for one probe.
pub fn build(
    profile: &ProbeProfile,
    hostname: &str,
    random: &dyn RandomSource,
    grease: &dyn GreaseChooser,
) -> Vec<u8> {
    let grease_value = grease.choose();
    let (record_version, hello_version) = profile.version.wire_versions();

    let mut client_random = [0u8; 32];
    random.fill(&mut client_random);
    let mut session_id = [0u8; 32];
    random.fill(&mut session_id);
    let mut key_share_random = [0u8; 32];
    random.fill(&mut key_share_random);

    let ciphers = build_ciphers(profile, grease_value);
    let extensions = build_extensions(profile, hostname, grease_value, &key_share_random);

    let mut hello_body = Vec::new();
    hello_body.extend_from_slice(&hello_version.to_be_bytes());
    hello_body.extend_from_slice(&client_random);
    hello_body.push(32);
    hello_body.extend_from_slice(&session_id);
    hello_body.extend_from_slice(&(ciphers.len() as u16).to_be_bytes());
    hello_body.extend_from_slice(&ciphers);
    hello_body.extend_from_slice(&[0x01, 0x00]);
    hello_body.extend_from_slice(&(extensions.len() as u16).to_be_bytes());
    hello_body.extend_from_slice(&extensions);

    let mut handshake = Vec::new();
    handshake.push(0x01);
    // Three-byte length whose top byte is always zero, matching the source.
    handshake.push(0x00);
    handshake.extend_from_slice(&(hello_body.len() as u16).to_be_bytes());
    handshake.extend_from_slice(&hello_body);

    let mut record = Vec::new();
    record.push(0x16);
    record.extend_from_slice(&record_version.to_be_bytes());
    record.extend_from_slice(&(handshake.len() as u16).to_be_bytes());
    record.extend_from_slice(&handshake);
    record
}

fn build_ciphers(profile: &ProbeProfile, grease_value: u16) -> Vec<u8> {
    let list = catalog::ciphers(profile.cipher_list);
    let ordered = reorder_u16(&list, profile.cipher_order);

    let mut out = Vec::with_capacity((ordered.len() + 1) * 2);
    if profile.use_grease {
        out.extend_from_slice(&grease_value.to_be_bytes());
    }
    for id in ordered {
        out.extend_from_slice(&id.to_be_bytes());
    }
    out
}

/// Applies `order` to `list`, implementing all five [`CipherOrder`] variants.
fn reorder_u16(list: &[u16], order: CipherOrder) -> Vec<u16> {
    match order {
        CipherOrder::Forward => list.to_vec(),
        CipherOrder::Reverse => reversed(list),
        CipherOrder::BottomHalf => bottom_half(list),
        CipherOrder::TopHalf => top_half(list),
        CipherOrder::MiddleOut => middle_out(list),
    }
}

fn reversed(list: &[u16]) -> Vec<u16> {
    list.iter().rev().copied().collect()
}

fn bottom_half(list: &[u16]) -> Vec<u16> {
    let n = list.len();
    let start = if n % 2 == 1 { n / 2 + 1 } else { n / 2 };
    list[start..].to_vec()
}

fn top_half(list: &[u16]) -> Vec<u16> {
    let n = list.len();
    let rev = reversed(list);
    if n % 2 == 1 {
        let mut out = vec![list[n / 2]];
        out.extend(bottom_half(&rev));
        out
    } else {
        bottom_half(&rev)
    }
}

fn middle_out(list: &[u16]) -> Vec<u16> {
    let n = list.len();
    let m = n / 2;
    let mut out = Vec::with_capacity(n);
    if n % 2 == 1 {
        out.push(list[m]);
        for i in 1..=m {
            out.push(list[m + i]);
            out.push(list[m - i]);
        }
    } else {
        for i in 1..=m {
            out.push(list[m - 1 + i]);
            out.push(list[m - i]);
        }
    }
    out
}

/// Applies the two-value [`ExtensionOrder`] to an ALPN or supported-versions
/// list — the same FORWARD/REVERSE rule as [`reorder_u16`], just without the
/// three cipher-only variants.
fn reorder_ext<T: Clone>(list: &[T], order: ExtensionOrder) -> Vec<T> {
    match order {
        ExtensionOrder::Forward => list.to_vec(),
        ExtensionOrder::Reverse => list.iter().rev().cloned().collect(),
    }
}

fn build_extensions(
    profile: &ProbeProfile,
    hostname: &str,
    grease_value: u16,
    key_share_random: &[u8; 32],
) -> Vec<u8> {
    let mut out = Vec::new();

    if profile.use_grease {
        out.extend_from_slice(&grease_value.to_be_bytes());
        out.extend_from_slice(&[0x00, 0x00]);
    }

    out.extend_from_slice(&build_sni(hostname));
    out.extend_from_slice(&EXT_MASTER_SECRET_EXT);
    out.extend_from_slice(&MAX_FRAGMENT_LENGTH_EXT);
    out.extend_from_slice(&RENEGOTIATION_INFO_EXT);
    out.extend_from_slice(&SUPPORTED_GROUPS_EXT);
    out.extend_from_slice(&EC_POINT_FORMATS_EXT);
    out.extend_from_slice(&SESSION_TICKET_EXT);
    out.extend_from_slice(&build_alpn(profile));
    out.extend_from_slice(&SIGNATURE_ALGORITHMS_EXT);
    out.extend_from_slice(&build_key_share(profile, grease_value, key_share_random));
    out.extend_from_slice(&PSK_KEY_EXCHANGE_MODES_EXT);

    if emits_supported_versions(profile) {
        out.extend_from_slice(&build_supported_versions(profile, grease_value));
    }

    let mut wrapped = Vec::with_capacity(out.len() + 2);
    wrapped.extend_from_slice(&(out.len() as u16).to_be_bytes());
    wrapped.extend_from_slice(&out);
    wrapped
}

fn build_sni(hostname: &str) -> Vec<u8> {
    let host = hostname.as_bytes();
    let host_len = host.len() as u16;
    let mut out = Vec::with_capacity(9 + host.len());
    out.extend_from_slice(&[0x00, 0x00]);
    out.extend_from_slice(&(host_len + 5).to_be_bytes());
    out.extend_from_slice(&(host_len + 3).to_be_bytes());
    out.push(0x00);
    out.extend_from_slice(&host_len.to_be_bytes());
    out.extend_from_slice(host);
    out
}

fn build_alpn(profile: &ProbeProfile) -> Vec<u8> {
    let set: Vec<&'static [u8]> = if profile.use_rare_alpn {
        catalog::RARE_ALPNS.to_vec()
    } else {
        catalog::ALL_ALPNS.to_vec()
    };
    let ordered = reorder_ext(&set, profile.extension_order);

    let mut inner = Vec::new();
    for token in &ordered {
        inner.extend_from_slice(token);
    }

    let mut out = Vec::with_capacity(inner.len() + 4);
    out.extend_from_slice(&[0x00, 0x10]);
    out.extend_from_slice(&(inner.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(&(inner.len() as u16).to_be_bytes());
    out.extend_from_slice(&inner);
    out
}

fn build_key_share(profile: &ProbeProfile, grease_value: u16, random: &[u8; 32]) -> Vec<u8> {
    let mut inner = Vec::new();
    if profile.use_grease {
        inner.extend_from_slice(&grease_value.to_be_bytes());
        inner.extend_from_slice(&[0x00, 0x01, 0x00]);
    }
    inner.extend_from_slice(&[0x00, 0x1d, 0x00, 0x20]);
    inner.extend_from_slice(random);

    let mut out = Vec::with_capacity(inner.len() + 4);
    out.extend_from_slice(&[0x00, 0x33]);
    out.extend_from_slice(&(inner.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(&(inner.len() as u16).to_be_bytes());
    out.extend_from_slice(&inner);
    out
}

fn emits_supported_versions(profile: &ProbeProfile) -> bool {
    matches!(profile.version, crate::catalog::TlsVersion::Tls1_3)
        || matches!(profile.support_mode, SupportMode::Support1_2)
}

fn build_supported_versions(profile: &ProbeProfile, grease_value: u16) -> Vec<u8> {
    let versions: Vec<u16> = match profile.support_mode {
        SupportMode::Support1_2 => vec![0x0301, 0x0302, 0x0303],
        _ => vec![0x0301, 0x0302, 0x0303, 0x0304],
    };
    let ordered = reorder_ext(&versions, profile.extension_order);

    let mut inner = Vec::new();
    if profile.use_grease {
        inner.extend_from_slice(&grease_value.to_be_bytes());
    }
    for v in ordered {
        inner.extend_from_slice(&v.to_be_bytes());
    }

    let mut out = Vec::with_capacity(inner.len() + 5);
    out.extend_from_slice(&[0x00, 0x2b]);
    out.extend_from_slice(&(inner.len() as u16 + 1).to_be_bytes());
    out.push(inner.len() as u8);
    out.extend_from_slice(&inner);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedGreaseChooser, FixedRandomSource};

    fn fixed_random() -> FixedRandomSource {
        FixedRandomSource::new(vec![
            0x17, 0x5d, 0x18, 0x72, 0xb2, 0xe7, 0x14, 0x4c, 0x82, 0x9a, 0x6e, 0x52, 0xe5, 0x39,
            0x7b, 0x44, 0xb9, 0xf8, 0xb2, 0x50, 0x9c, 0x64, 0xb5, 0x03, 0x67, 0x33, 0x3c, 0x99,
            0x29, 0x17, 0x36, 0x6e,
        ])
    }

    #[test]
    fn reorder_forward_is_identity() {
        let l = [1u16, 2, 3, 4, 5];
        assert_eq!(reorder_u16(&l, CipherOrder::Forward), l.to_vec());
    }

    #[test]
    fn reorder_reverse_is_an_involution() {
        let l = [1u16, 2, 3, 4, 5, 6];
        let once = reorder_u16(&l, CipherOrder::Reverse);
        let twice = reorder_u16(&once, CipherOrder::Reverse);
        assert_eq!(twice, l.to_vec());
    }

    #[test]
    fn bottom_half_odd_drops_the_middle_and_everything_before_it() {
        let l = [0u16, 1, 2, 3, 4]; // len 5, odd
        assert_eq!(bottom_half(&l), vec![3, 4]);
    }

    #[test]
    fn bottom_half_even_takes_the_back_half() {
        let l = [0u16, 1, 2, 3, 4, 5]; // len 6, even
        assert_eq!(bottom_half(&l), vec![3, 4, 5]);
    }

    #[test]
    fn middle_out_produces_a_permutation_of_the_same_length() {
        let l = [0u16, 1, 2, 3, 4, 5, 6];
        let out = middle_out(&l);
        assert_eq!(out.len(), l.len());
        let mut sorted = out.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, l.to_vec());

        let l_even = [0u16, 1, 2, 3, 4, 5];
        let out_even = middle_out(&l_even);
        assert_eq!(out_even.len(), l_even.len());
    }

    #[test]
    fn top_half_is_half_length() {
        let l: Vec<u16> = (0..74).collect();
        assert_eq!(top_half(&l).len(), 37);
        let l_odd: Vec<u16> = (0..75).collect();
        assert_eq!(top_half(&l_odd).len(), 38);
    }

    #[test]
    fn build_is_deterministic_given_fixed_inputs() {
        let random = fixed_random();
        let grease = FixedGreaseChooser(0x5a5a);
        let profile = &crate::profile::TEN_PROFILES[0];
        let a = build(profile, "google.com", &random, &grease);
        let b = build(profile, "google.com", &random, &grease);
        assert_eq!(a, b);
        assert_eq!(a[0], 0x16);
    }

    #[test]
    fn record_length_fields_match_actual_body_length() {
        let random = fixed_random();
        let grease = FixedGreaseChooser(0x5a5a);
        let profile = &crate::profile::TEN_PROFILES[4]; // grease + middle-out
        let record = build(profile, "example.com", &random, &grease);

        let record_len = u16::from_be_bytes([record[3], record[4]]) as usize;
        assert_eq!(record_len, record.len() - 5);

        let handshake_len = u32::from_be_bytes([0, record[5], record[6], record[7]]) as usize;
        assert_eq!(handshake_len, record.len() - 9);
    }

    #[test]
    fn supported_versions_only_present_for_tls13_or_support_1_2() {
        assert!(emits_supported_versions(&crate::profile::TEN_PROFILES[0])); // support_1_2
        assert!(!emits_supported_versions(&crate::profile::TEN_PROFILES[2])); // no_support, tls1.2
        assert!(emits_supported_versions(&crate::profile::TEN_PROFILES[6])); // tls1.3
    }
}
