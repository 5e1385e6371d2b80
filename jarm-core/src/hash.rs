//! Hash Assembler: folds the ten per-probe renderings into the 62-character
//! JARM fuzzy hash.

use sha2::{Digest, Sha256};

/// The sentinel rendering produced when every one of the ten probes failed.
const FAILED_RENDERING: &str = "|||";

/// Reference list used to encode a cipher as a two-hex-digit index. A
/// cipher not found here is encoded as one index past the end of the list —
/// preserved source behavior, not a bug (see module docs on `assemble`).
const CIPHER_REFERENCE_LIST: [u16; 69] = [
    0x0004, 0x0005, 0x0007, 0x000a, 0x0016, 0x002f, 0x0033, 0x0035, 0x0039, 0x003c, 0x003d,
    0x0041, 0x0045, 0x0067, 0x006b, 0x0084, 0x0088, 0x009a, 0x009c, 0x009d, 0x009e, 0x009f,
    0x00ba, 0x00be, 0x00c0, 0x00c4, 0xc007, 0xc008, 0xc009, 0xc00a, 0xc011, 0xc012, 0xc013,
    0xc014, 0xc023, 0xc024, 0xc027, 0xc028, 0xc02b, 0xc02c, 0xc02f, 0xc030, 0xc060, 0xc061,
    0xc072, 0xc073, 0xc076, 0xc077, 0xc09c, 0xc09d, 0xc09e, 0xc09f, 0xc0a0, 0xc0a1, 0xc0a2,
    0xc0a3, 0xc0ac, 0xc0ad, 0xc0ae, 0xc0af, 0xcc13, 0xcc14, 0xcca8, 0xcca9, 0x1301, 0x1302,
    0x1303, 0x1304, 0x1305,
];

/// Folds ten [`crate::parser::ParseOutcome::render`] strings, in canonical
/// profile order, into the 62-character lowercase-hex JARM string.
///
/// `assemble` takes renderings rather than [`crate::parser::ParseOutcome`]
/// directly so a caller can replay fixture strings straight from a recorded
/// dataset without reconstructing parse results.
pub fn assemble(renderings: &[String; 10]) -> String {
    if renderings.iter().all(|r| r == FAILED_RENDERING) {
        return "0".repeat(62);
    }

    let mut cipher_bytes = String::with_capacity(20);
    let mut version_bytes = String::with_capacity(10);
    let mut hash_input = String::new();

    for rendering in renderings {
        // Full split, not splitn(4, ..): the error-probe rendering
        // ("<cipher>|<version>|||") has four pipes, one more than its two
        // trailing empty fields would need. A limited splitn(4) would fold
        // that extra pipe into the fourth field and feed it into the hash
        // input; a full split and truncation to four fields drops it, same
        // as components[0:4] on the reference's full split("|").
        let parts: Vec<&str> = rendering.split('|').collect();
        let cipher_hex = parts.first().copied().unwrap_or("");
        let version_hex = parts.get(1).copied().unwrap_or("");
        let alpn = parts.get(2).copied().unwrap_or("");
        let ext_hyphenated = parts.get(3).copied().unwrap_or("");

        cipher_bytes.push_str(&cipher_byte(cipher_hex));
        version_bytes.push(version_byte(version_hex));
        hash_input.push_str(alpn);
        hash_input.push_str(ext_hyphenated);
    }

    let digest = Sha256::digest(hash_input.as_bytes());
    let digest_prefix = hex::encode(&digest[..16]);

    format!("{cipher_bytes}{version_bytes}{digest_prefix}")
}

/// `"00"` for an empty cipher; otherwise the 1-based index of the matching
/// entry in [`CIPHER_REFERENCE_LIST`] as two lowercase hex digits. A cipher
/// absent from the table is encoded as `len(table) + 1` — documented
/// upstream behavior, kept verbatim.
fn cipher_byte(cipher_hex: &str) -> String {
    if cipher_hex.is_empty() {
        return "00".to_string();
    }
    let Ok(cipher) = u16::from_str_radix(cipher_hex, 16) else {
        return "00".to_string();
    };
    let index = match CIPHER_REFERENCE_LIST.iter().position(|&id| id == cipher) {
        Some(pos) => pos + 1,
        None => CIPHER_REFERENCE_LIST.len() + 1,
    };
    format!("{index:02x}")
}

/// `'0'` for an empty version; otherwise the last hex nibble of the 4-digit
/// version string mapped through `'a'..='f'`.
fn version_byte(version_hex: &str) -> char {
    let Some(last) = version_hex.chars().last() else {
        return '0';
    };
    let Some(nibble) = last.to_digit(16) else {
        return '0';
    };
    const LETTERS: &[u8] = b"abcdef";
    LETTERS.get(nibble as usize).copied().unwrap_or(b'a') as char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> String {
        "|||".to_string()
    }

    #[test]
    fn all_failure_sentinel_yields_all_zero() {
        let renderings: [String; 10] = std::array::from_fn(|_| failed());
        assert_eq!(assemble(&renderings), "0".repeat(62));
    }

    #[test]
    fn output_is_always_62_lowercase_hex_chars() {
        let mut renderings: [String; 10] = std::array::from_fn(|_| failed());
        renderings[0] = "002f|0303|h2|0010-000b".to_string();
        let result = assemble(&renderings);
        assert_eq!(result.len(), 62);
        assert!(result.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn failed_probe_slot_is_00_and_0() {
        let mut renderings: [String; 10] = std::array::from_fn(|_| failed());
        renderings[1] = "002f|0303|h2|0010".to_string();
        let result = assemble(&renderings);
        // probe 0 occupies cipher_bytes[0..2], probe 1 occupies cipher_bytes[2..4]
        assert_eq!(&result[0..2], "00");
        assert_eq!(&result[20..21], "0");
    }

    #[test]
    fn cipher_byte_known_and_unknown() {
        assert_eq!(cipher_byte(""), "00");
        assert_eq!(cipher_byte("0004"), "01");
        assert_eq!(cipher_byte("1305"), "45");
        assert_eq!(cipher_byte("ffff"), format!("{:02x}", CIPHER_REFERENCE_LIST.len() + 1));
    }

    #[test]
    fn version_byte_maps_last_nibble_to_letter() {
        assert_eq!(version_byte(""), '0');
        assert_eq!(version_byte("0300"), 'a');
        assert_eq!(version_byte("0303"), 'd');
    }

    #[test]
    fn assemble_is_deterministic() {
        let mut renderings: [String; 10] = std::array::from_fn(|_| failed());
        renderings[0] = "002f|0303|h2|0010-000b".to_string();
        assert_eq!(assemble(&renderings), assemble(&renderings));
    }

    #[test]
    fn error_probe_rendering_contributes_no_stray_pipe_to_the_hash_input() {
        // "<cipher>|<version>|||" has four pipes; a naive splitn(4, '|')
        // leaves a literal "|" in the fourth field and hashes it in. The
        // reference's full split("|")[0:4] contributes "" instead — confirm
        // an all-error-probe scan hashes the same as an all-empty-tail scan
        // with matching cipher/version, since both should contribute "" to
        // hash_input.
        let error_probe: [String; 10] =
            std::array::from_fn(|_| "002f|0303|||".to_string());
        let empty_tail: [String; 10] =
            std::array::from_fn(|_| "002f|0303||".to_string());
        assert_eq!(assemble(&error_probe), assemble(&empty_tail));
    }
}
