//! # Capability Matrix
//!
//! Static mapping from every user-facing algorithm to the key sizes and
//! block modes it may be configured with.
//!
//! [`Algorithm`] and [`Mode`] are plain tags. Everything known about them
//! (display names, descriptions, native ids, supported sizes and modes) lives
//! in side tables and is reached through the free functions of this module,
//! so the rules can be audited in one place.
//!
//! ## Mode Tiers
//!
//! - **Stream ciphers** have no block chaining and only ever report [`Mode::Ctr`].
//! - **Modern block ciphers** expose all six modes, GCM first.
//! - **Good block ciphers** expose five modes; GCM is withheld.
//! - **Older block ciphers** expose four modes; CTR is withheld as well.
//! - **GOST 28147-89** is restricted to CBC and ECB.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

mod mode;

pub use mode::{Mode, mode_description, mode_from_native, mode_name, mode_native_id};

/// Security tier an algorithm belongs to, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Maximum,
    High,
    Strong,
    Reliable,
    Stream,
    Specialized,
    LegacyStrong,
    Historical,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Maximum => "Maximum Security",
            Self::High => "High Security",
            Self::Strong => "Strong Security",
            Self::Reliable => "Reliable Security",
            Self::Stream => "Stream Ciphers",
            Self::Specialized => "Specialized & National",
            Self::LegacyStrong => "Legacy Strong",
            Self::Historical => "Historical & Compatibility",
        }
    }
}

/// Every algorithm the application can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum Algorithm {
    Aes256,
    Serpent256,
    Twofish256,
    Aes192,
    Aes128,
    Serpent192,
    Serpent128,
    Twofish192,
    Twofish128,
    Rc6,
    Mars,
    Rc5,
    Skipjack,
    Blowfish,
    Cast128,
    Cast256,
    Camellia,
    ChaCha20,
    Salsa20,
    XSalsa20,
    Hc128,
    Hc256,
    Rabbit,
    Sosemanuk,
    Aria,
    Seed,
    Sm4,
    Gost28147,
    Des3,
    Idea,
    Rc2,
    Safer,
    SaferPlus,
    Des,
    Rc4,
}

/// Static attributes of an [`Algorithm`].
#[derive(Debug)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub tier: Tier,
    /// Algorithm id on the engine boundary.
    pub native_id: i32,
    /// Supported key sizes in bits, ascending.
    pub key_sizes: &'static [u32],
    pub stream: bool,
}

const fn entry(name: &'static str, description: &'static str, tier: Tier, native_id: i32, key_sizes: &'static [u32], stream: bool) -> AlgorithmInfo {
    AlgorithmInfo { name, description, tier, native_id, key_sizes, stream }
}

const K128: &[u32] = &[128];
const K192: &[u32] = &[192];
const K256: &[u32] = &[256];
const K128_256: &[u32] = &[128, 256];
const K128_192_256: &[u32] = &[128, 192, 256];
const K128_TO_256: &[u32] = &[128, 160, 192, 224, 256];
const K128_160: &[u32] = &[128, 160];

static AES256: AlgorithmInfo = entry("AES-256", "Advanced Encryption Standard - 256-bit (Maximum Security)", Tier::Maximum, 1, K256, false);
static SERPENT256: AlgorithmInfo = entry("Serpent-256", "Serpent Block Cipher - 256-bit (Maximum Security)", Tier::Maximum, 2, K256, false);
static TWOFISH256: AlgorithmInfo = entry("Twofish-256", "Twofish Block Cipher - 256-bit (Maximum Security)", Tier::Maximum, 3, K256, false);
static AES192: AlgorithmInfo = entry("AES-192", "Advanced Encryption Standard - 192-bit (High Security)", Tier::High, 1, K192, false);
static AES128: AlgorithmInfo = entry("AES-128", "Advanced Encryption Standard - 128-bit (High Security)", Tier::High, 1, K128, false);
static SERPENT192: AlgorithmInfo = entry("Serpent-192", "Serpent Block Cipher - 192-bit (High Security)", Tier::High, 2, K192, false);
static SERPENT128: AlgorithmInfo = entry("Serpent-128", "Serpent Block Cipher - 128-bit (High Security)", Tier::High, 2, K128, false);
static TWOFISH192: AlgorithmInfo = entry("Twofish-192", "Twofish Block Cipher - 192-bit (High Security)", Tier::High, 3, K192, false);
static TWOFISH128: AlgorithmInfo = entry("Twofish-128", "Twofish Block Cipher - 128-bit (High Security)", Tier::High, 3, K128, false);
static RC6: AlgorithmInfo = entry("RC6", "Rivest Cipher 6 - Variable Key Length", Tier::Strong, 4, K128_192_256, false);
static MARS: AlgorithmInfo = entry("MARS", "IBM MARS Block Cipher", Tier::Strong, 5, K128_192_256, false);
static RC5: AlgorithmInfo = entry("RC5", "Rivest Cipher 5 - Variable Parameters", Tier::Strong, 6, K128_TO_256, false);
static SKIPJACK: AlgorithmInfo = entry("Skipjack", "NSA Skipjack Block Cipher", Tier::Strong, 7, K128, false);
static BLOWFISH: AlgorithmInfo = entry("Blowfish", "Blowfish Block Cipher - Variable Key (32-448 bits)", Tier::Reliable, 8, &[128, 192, 256, 448], false);
static CAST128: AlgorithmInfo = entry("CAST-128", "CAST-128 Block Cipher (128-bit key)", Tier::Reliable, 9, K128, false);
static CAST256: AlgorithmInfo = entry("CAST-256", "CAST-256 Block Cipher (128/160/192/224/256-bit key)", Tier::Reliable, 10, K128_TO_256, false);
static CAMELLIA: AlgorithmInfo = entry("Camellia", "NTT/Mitsubishi Camellia Block Cipher", Tier::Reliable, 11, K128, false);
static CHACHA20: AlgorithmInfo = entry("ChaCha20", "ChaCha20 Stream Cipher (256-bit key)", Tier::Stream, 12, K256, true);
static SALSA20: AlgorithmInfo = entry("Salsa20", "Salsa20 Stream Cipher (128/256-bit key)", Tier::Stream, 13, K128_256, true);
static XSALSA20: AlgorithmInfo = entry("XSalsa20", "Extended Salsa20 Stream Cipher (256-bit key)", Tier::Stream, 14, K256, true);
static HC128: AlgorithmInfo = entry("HC-128", "HC-128 Stream Cipher (128-bit key)", Tier::Stream, 15, K128, true);
static HC256: AlgorithmInfo = entry("HC-256", "HC-256 Stream Cipher (256-bit key)", Tier::Stream, 16, K256, true);
static RABBIT: AlgorithmInfo = entry("Rabbit", "Rabbit Stream Cipher (128-bit key)", Tier::Stream, 17, K128, true);
static SOSEMANUK: AlgorithmInfo = entry("Sosemanuk", "Sosemanuk Stream Cipher (128-256 bit key)", Tier::Stream, 18, K256, true);
static ARIA: AlgorithmInfo = entry("ARIA", "Korean ARIA Block Cipher (128/192/256-bit)", Tier::Specialized, 19, K128, false);
static SEED: AlgorithmInfo = entry("SEED", "Korean SEED Block Cipher (128-bit key)", Tier::Specialized, 20, K128, false);
static SM4: AlgorithmInfo = entry("SM4", "Chinese SM4 Block Cipher (128-bit key)", Tier::Specialized, 21, K128, false);
static GOST28147: AlgorithmInfo = entry("GOST 28147-89", "Russian GOST Block Cipher (256-bit key)", Tier::Specialized, 22, K256, false);
static DES3: AlgorithmInfo = entry("3DES", "Triple Data Encryption Standard (168-bit effective)", Tier::LegacyStrong, 23, &[168], false);
static IDEA: AlgorithmInfo = entry("IDEA", "International Data Encryption Algorithm (128-bit)", Tier::LegacyStrong, 24, K128, false);
static RC2: AlgorithmInfo = entry("RC2", "Rivest Cipher 2 - Variable Key Length", Tier::LegacyStrong, 25, &[40, 64, 128], false);
static SAFER: AlgorithmInfo = entry("SAFER", "Secure And Fast Encryption Routine", Tier::LegacyStrong, 26, K128_160, false);
static SAFER_PLUS: AlgorithmInfo = entry("SAFER+", "Enhanced SAFER Block Cipher", Tier::LegacyStrong, 27, K128_160, false);
static DES: AlgorithmInfo = entry("DES", "Data Encryption Standard (56-bit key) - Legacy Only", Tier::Historical, 28, &[56], false);
static RC4: AlgorithmInfo = entry("RC4", "Rivest Cipher 4 Stream Cipher - Legacy", Tier::Historical, 29, &[40, 128], true);

/// Looks up the static attributes of `algorithm`.
pub fn info(algorithm: Algorithm) -> &'static AlgorithmInfo {
    match algorithm {
        Algorithm::Aes256 => &AES256,
        Algorithm::Serpent256 => &SERPENT256,
        Algorithm::Twofish256 => &TWOFISH256,
        Algorithm::Aes192 => &AES192,
        Algorithm::Aes128 => &AES128,
        Algorithm::Serpent192 => &SERPENT192,
        Algorithm::Serpent128 => &SERPENT128,
        Algorithm::Twofish192 => &TWOFISH192,
        Algorithm::Twofish128 => &TWOFISH128,
        Algorithm::Rc6 => &RC6,
        Algorithm::Mars => &MARS,
        Algorithm::Rc5 => &RC5,
        Algorithm::Skipjack => &SKIPJACK,
        Algorithm::Blowfish => &BLOWFISH,
        Algorithm::Cast128 => &CAST128,
        Algorithm::Cast256 => &CAST256,
        Algorithm::Camellia => &CAMELLIA,
        Algorithm::ChaCha20 => &CHACHA20,
        Algorithm::Salsa20 => &SALSA20,
        Algorithm::XSalsa20 => &XSALSA20,
        Algorithm::Hc128 => &HC128,
        Algorithm::Hc256 => &HC256,
        Algorithm::Rabbit => &RABBIT,
        Algorithm::Sosemanuk => &SOSEMANUK,
        Algorithm::Aria => &ARIA,
        Algorithm::Seed => &SEED,
        Algorithm::Sm4 => &SM4,
        Algorithm::Gost28147 => &GOST28147,
        Algorithm::Des3 => &DES3,
        Algorithm::Idea => &IDEA,
        Algorithm::Rc2 => &RC2,
        Algorithm::Safer => &SAFER,
        Algorithm::SaferPlus => &SAFER_PLUS,
        Algorithm::Des => &DES,
        Algorithm::Rc4 => &RC4,
    }
}

const MODERN_MODES: &[Mode] = &[Mode::Gcm, Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ctr, Mode::Ecb];
const GOOD_MODES: &[Mode] = &[Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ctr, Mode::Ecb];
const BASIC_MODES: &[Mode] = &[Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ecb];
const RESTRICTED_MODES: &[Mode] = &[Mode::Cbc, Mode::Ecb];
const STREAM_MODES: &[Mode] = &[Mode::Ctr];

/// Supported key sizes in bits, in ascending order. Never empty.
#[inline]
pub fn supported_key_sizes(algorithm: Algorithm) -> &'static [u32] {
    info(algorithm).key_sizes
}

/// Supported block modes, most recommended first. Never empty.
pub fn supported_modes(algorithm: Algorithm) -> &'static [Mode] {
    if is_stream_cipher(algorithm) {
        return STREAM_MODES;
    }

    match algorithm {
        Algorithm::Aes256
        | Algorithm::Aes192
        | Algorithm::Aes128
        | Algorithm::Serpent256
        | Algorithm::Serpent192
        | Algorithm::Serpent128
        | Algorithm::Twofish256
        | Algorithm::Twofish192
        | Algorithm::Twofish128
        | Algorithm::Camellia
        | Algorithm::Aria => MODERN_MODES,
        Algorithm::Rc6 | Algorithm::Mars | Algorithm::Cast256 | Algorithm::Seed | Algorithm::Sm4 | Algorithm::Idea | Algorithm::Blowfish => GOOD_MODES,
        Algorithm::Cast128 | Algorithm::Skipjack | Algorithm::Rc5 | Algorithm::Des3 | Algorithm::Des | Algorithm::Rc2 | Algorithm::Safer | Algorithm::SaferPlus => BASIC_MODES,
        _ => RESTRICTED_MODES,
    }
}

#[inline]
pub fn is_stream_cipher(algorithm: Algorithm) -> bool {
    info(algorithm).stream
}

#[inline]
pub fn supports_key_size(algorithm: Algorithm, bits: u32) -> bool {
    supported_key_sizes(algorithm).contains(&bits)
}

#[inline]
pub fn supports_mode(algorithm: Algorithm, mode: Mode) -> bool {
    supported_modes(algorithm).contains(&mode)
}

#[inline]
pub fn algorithm_name(algorithm: Algorithm) -> &'static str {
    info(algorithm).name
}

#[inline]
pub fn native_id(algorithm: Algorithm) -> i32 {
    info(algorithm).native_id
}

/// All algorithms in tier order.
pub fn algorithms() -> impl Iterator<Item = Algorithm> {
    Algorithm::iter()
}

/// Resolves a user-supplied name such as `aes-256`, `AES256` or `3des`.
///
/// Matching ignores case and any character that is not alphanumeric.
pub fn algorithm_from_name(name: &str) -> Option<Algorithm> {
    let wanted = normalize(name);
    algorithms().find(|&algorithm| normalize(algorithm_name(algorithm)) == wanted || normalize(&format!("{algorithm:?}")) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).map(|c| c.to_ascii_lowercase()).collect()
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(algorithm_name(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_algorithm_has_sizes_and_modes() {
        assert_eq!(algorithms().count(), Algorithm::COUNT);
        for algorithm in algorithms() {
            assert!(!supported_key_sizes(algorithm).is_empty(), "{algorithm} has no key sizes");
            assert!(!supported_modes(algorithm).is_empty(), "{algorithm} has no modes");
        }
    }

    #[test]
    fn test_stream_ciphers_only_report_ctr() {
        let streams: Vec<Algorithm> = algorithms().filter(|&a| is_stream_cipher(a)).collect();
        assert_eq!(streams.len(), 8);
        for algorithm in streams {
            assert_eq!(supported_modes(algorithm), &[Mode::Ctr]);
        }
    }

    #[test]
    fn test_mode_tiers() {
        assert_eq!(supported_modes(Algorithm::Aes256)[0], Mode::Gcm);
        assert_eq!(supported_modes(Algorithm::Aria).len(), 6);
        assert!(!supports_mode(Algorithm::Blowfish, Mode::Gcm));
        assert!(supports_mode(Algorithm::Blowfish, Mode::Ctr));
        assert!(!supports_mode(Algorithm::Des, Mode::Ctr));
        assert_eq!(supported_modes(Algorithm::Des3), &[Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ecb]);
        assert_eq!(supported_modes(Algorithm::Gost28147), &[Mode::Cbc, Mode::Ecb]);
    }

    #[test]
    fn test_key_sizes() {
        assert_eq!(supported_key_sizes(Algorithm::Aes192), &[192]);
        assert_eq!(supported_key_sizes(Algorithm::Blowfish), &[128, 192, 256, 448]);
        assert_eq!(supported_key_sizes(Algorithm::Des), &[56]);
        assert!(supports_key_size(Algorithm::Rc4, 40));
        assert!(!supports_key_size(Algorithm::ChaCha20, 512));
    }

    #[test]
    fn test_native_ids_share_families() {
        assert_eq!(native_id(Algorithm::Aes128), native_id(Algorithm::Aes256));
        assert_eq!(native_id(Algorithm::Twofish192), 3);
        assert_eq!(native_id(Algorithm::Rc4), 29);

        let mut ids: Vec<i32> = algorithms().map(native_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn test_algorithm_from_name() {
        assert_eq!(algorithm_from_name("aes-256"), Some(Algorithm::Aes256));
        assert_eq!(algorithm_from_name("AES256"), Some(Algorithm::Aes256));
        assert_eq!(algorithm_from_name("3des"), Some(Algorithm::Des3));
        assert_eq!(algorithm_from_name("gost 28147-89"), Some(Algorithm::Gost28147));
        assert_eq!(algorithm_from_name("saferplus"), Some(Algorithm::SaferPlus));
        assert_eq!(algorithm_from_name("enigma"), None);
    }
}
