//! Probe profiles: the ten symbolic ClientHello variants whose responses are
//! folded into a JARM fingerprint.

use crate::catalog::{CipherList, TlsVersion};

/// How a cipher (or, reused for ALPN/supported-versions lists,
/// extension-level) sequence gets permuted before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherOrder {
    Forward,
    Reverse,
    TopHalf,
    BottomHalf,
    MiddleOut,
}

/// The two reorderings valid for ALPN lists and the supported-versions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionOrder {
    Forward,
    Reverse,
}

/// Whether, and which, `supported_versions` extension a profile emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportMode {
    /// No `supported_versions` extension at all.
    NoSupport,
    /// `supported_versions` listing `{0x0301, 0x0302, 0x0303}`.
    Support1_2,
    /// `supported_versions` listing `{0x0301, 0x0302, 0x0303, 0x0304}`.
    Support1_3,
}

/// An immutable, fully-validated description of one ClientHello variant.
///
/// The ten canonical instances ([`TEN_PROFILES`]) are the only ones a
/// conforming scan ever uses; the fields are plain closed enums rather than
/// strings precisely so that an invalid combination cannot be constructed at
/// all — [`crate::Error::UnsupportedProfileValue`] exists for API parity
/// with the source project's error surface, but Rust's type system makes it
/// unreachable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeProfile {
    pub name: &'static str,
    pub version: TlsVersion,
    pub cipher_list: CipherList,
    pub cipher_order: CipherOrder,
    pub use_grease: bool,
    pub use_rare_alpn: bool,
    pub support_mode: SupportMode,
    pub extension_order: ExtensionOrder,
}

use CipherOrder::*;
use ExtensionOrder as Ext;
use SupportMode::*;
use TlsVersion::*;

/// The ten probe profiles, in the exact order that feeds the hash assembler.
///
/// Profile order is part of the fingerprint; do not sort or otherwise
/// reshuffle this table. Profile 2's `extension_order` is `Reverse` despite
/// its name — that asymmetry is intentional, see the module-level note in
/// [`crate::builder`].
pub const TEN_PROFILES: [ProbeProfile; 10] = [
    ProbeProfile {
        name: "tls1_2_forward",
        version: Tls1_2,
        cipher_list: CipherList::All,
        cipher_order: Forward,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: Support1_2,
        extension_order: Ext::Reverse,
    },
    ProbeProfile {
        name: "tls1_2_reverse",
        version: Tls1_2,
        cipher_list: CipherList::All,
        cipher_order: Reverse,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: Support1_2,
        extension_order: Ext::Reverse,
    },
    ProbeProfile {
        name: "tls1_2_top_half",
        version: Tls1_2,
        cipher_list: CipherList::All,
        cipher_order: TopHalf,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: NoSupport,
        extension_order: Ext::Forward,
    },
    ProbeProfile {
        name: "tls1_2_bottom_half",
        version: Tls1_2,
        cipher_list: CipherList::All,
        cipher_order: BottomHalf,
        use_grease: false,
        use_rare_alpn: true,
        support_mode: NoSupport,
        extension_order: Ext::Forward,
    },
    ProbeProfile {
        name: "tls1_2_middle_out_grease",
        version: Tls1_2,
        cipher_list: CipherList::All,
        cipher_order: MiddleOut,
        use_grease: true,
        use_rare_alpn: true,
        support_mode: NoSupport,
        extension_order: Ext::Reverse,
    },
    ProbeProfile {
        name: "tls1_1_forward",
        version: Tls1_1,
        cipher_list: CipherList::All,
        cipher_order: Forward,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: NoSupport,
        extension_order: Ext::Forward,
    },
    ProbeProfile {
        name: "tls1_3_forward",
        version: Tls1_3,
        cipher_list: CipherList::All,
        cipher_order: Forward,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: Support1_3,
        extension_order: Ext::Reverse,
    },
    ProbeProfile {
        name: "tls1_3_reverse",
        version: Tls1_3,
        cipher_list: CipherList::All,
        cipher_order: Reverse,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: Support1_3,
        extension_order: Ext::Forward,
    },
    ProbeProfile {
        name: "tls1_3_no13_forward",
        version: Tls1_3,
        cipher_list: CipherList::No13,
        cipher_order: Forward,
        use_grease: false,
        use_rare_alpn: false,
        support_mode: Support1_3,
        extension_order: Ext::Forward,
    },
    ProbeProfile {
        name: "tls1_3_middle_out_grease",
        version: Tls1_3,
        cipher_list: CipherList::All,
        cipher_order: MiddleOut,
        use_grease: true,
        use_rare_alpn: false,
        support_mode: Support1_3,
        extension_order: Ext::Reverse,
    },
];
