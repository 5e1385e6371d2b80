//! Hello Parser: turns the raw bytes of one `recv` on a probe socket into a
//! [`ParseOutcome`], without ever panicking on truncated or malformed input.

/// What [`parse`] extracted from the tail of a successfully-recognized
/// ServerHello — the ALPN and the ordered extension type codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tail {
    /// Extensions parsed cleanly (possibly with no ALPN extension present).
    Normal {
        alpn: String,
        ext_types: Vec<u16>,
    },
    /// One of the three "error probe" byte patterns was detected; the
    /// source renders this distinctly from a generic parse failure even
    /// though both end up with an empty alpn and extension list.
    ErrorProbe,
}

/// The result of parsing one ServerHello response buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed {
        cipher: [u8; 2],
        version: [u8; 2],
        tail: Tail,
    },
    Failed,
}

impl ParseOutcome {
    /// Renders this outcome into the pipe-delimited string the hash
    /// assembler consumes. A [`ParseOutcome::Failed`] renders as the
    /// literal sentinel `"|||"`.
    pub fn render(&self) -> String {
        match self {
            ParseOutcome::Failed => "|||".to_string(),
            ParseOutcome::Parsed { cipher, version, tail } => {
                let cipher_hex = hex::encode(cipher);
                let version_hex = hex::encode(version);
                match tail {
                    Tail::Normal { alpn, ext_types } => {
                        let ext_hyphenated = ext_types
                            .iter()
                            .map(|t| format!("{:04x}", t))
                            .collect::<Vec<_>>()
                            .join("-");
                        format!("{}|{}|{}|{}", cipher_hex, version_hex, alpn, ext_hyphenated)
                    }
                    Tail::ErrorProbe => format!("{}|{}|||", cipher_hex, version_hex),
                }
            }
        }
    }
}

/// Parses a single ServerHello response buffer (up to 1484 bytes, the
/// Probe Runner's recv cap). Any indexing fault anywhere in this function
/// resolves to [`ParseOutcome::Failed`] or an empty tail — never a panic.
pub fn parse(buf: &[u8]) -> ParseOutcome {
    if buf.is_empty() {
        return ParseOutcome::Failed;
    }
    if buf[0] == 0x15 {
        return ParseOutcome::Failed;
    }
    if buf.first() != Some(&0x16) || buf.get(5) != Some(&0x02) {
        return ParseOutcome::Failed;
    }

    let counter = match buf.get(43) {
        Some(&c) => c as usize,
        None => return ParseOutcome::Failed,
    };

    let cipher = match (buf.get(counter + 44), buf.get(counter + 45)) {
        (Some(&a), Some(&b)) => [a, b],
        _ => return ParseOutcome::Failed,
    };

    let version = match (buf.get(9), buf.get(10)) {
        (Some(&a), Some(&b)) => [a, b],
        _ => return ParseOutcome::Failed,
    };

    let error_probe = buf.get(counter + 47) == Some(&0x0b)
        || buf.get(counter + 50..counter + 53) == Some([0x0e, 0xac, 0x0b].as_slice())
        || buf.get(82..85) == Some([0x0f, 0xf0, 0x0b].as_slice());

    if error_probe {
        return ParseOutcome::Parsed {
            cipher,
            version,
            tail: Tail::ErrorProbe,
        };
    }

    match parse_extensions(buf, counter) {
        Some((alpn, ext_types)) => ParseOutcome::Parsed {
            cipher,
            version,
            tail: Tail::Normal { alpn, ext_types },
        },
        None => ParseOutcome::Parsed {
            cipher,
            version,
            tail: Tail::Normal {
                alpn: String::new(),
                ext_types: Vec::new(),
            },
        },
    }
}

fn parse_extensions(buf: &[u8], counter: usize) -> Option<(String, Vec<u16>)> {
    let len_bytes = buf.get(counter + 47..counter + 49)?;
    let total_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    let start = counter + 49;
    let end = start.checked_add(total_len)?;

    let mut ext_types = Vec::new();
    let mut alpn = String::new();
    let mut offset = start;

    while offset < end {
        let type_bytes = buf.get(offset..offset + 2)?;
        let ext_type = u16::from_be_bytes([type_bytes[0], type_bytes[1]]);
        let len_bytes = buf.get(offset + 2..offset + 4)?;
        let ext_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let value = buf.get(offset + 4..offset + 4 + ext_len)?;

        ext_types.push(ext_type);
        if ext_type == 0x0010 && value.len() >= 3 {
            alpn = String::from_utf8_lossy(&value[3..]).into_owned();
        }

        offset += 4 + ext_len;
    }

    Some((alpn, ext_types))
}
