use strum::{EnumIter, IntoEnumIterator};

/// Block cipher mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Mode {
    Cbc,
    Gcm,
    Ecb,
    Cfb,
    Ofb,
    Ctr,
}

#[inline]
pub fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Cbc => "CBC",
        Mode::Gcm => "GCM",
        Mode::Ecb => "ECB",
        Mode::Cfb => "CFB",
        Mode::Ofb => "OFB",
        Mode::Ctr => "CTR",
    }
}

#[inline]
pub fn mode_description(mode: Mode) -> &'static str {
    match mode {
        Mode::Cbc => "Cipher Block Chaining",
        Mode::Gcm => "Galois/Counter Mode",
        Mode::Ecb => "Electronic Codebook",
        Mode::Cfb => "Cipher Feedback",
        Mode::Ofb => "Output Feedback",
        Mode::Ctr => "Counter Mode",
    }
}

/// Mode id on the engine boundary.
#[inline]
pub fn mode_native_id(mode: Mode) -> i32 {
    match mode {
        Mode::Cbc => 1,
        Mode::Gcm => 2,
        Mode::Ecb => 3,
        Mode::Cfb => 4,
        Mode::Ofb => 5,
        Mode::Ctr => 6,
    }
}

pub fn mode_from_native(id: i32) -> Option<Mode> {
    Mode::iter().find(|&mode| mode_native_id(mode) == id)
}

impl Mode {
    /// Every mode, in boundary id order.
    pub const ALL: &'static [Self] = &[Self::Cbc, Self::Gcm, Self::Ecb, Self::Cfb, Self::Ofb, Self::Ctr];

    /// Resolves a case-insensitive mode name such as `gcm`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|&mode| mode_name(mode).eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(mode_name(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_ids_roundtrip() {
        for mode in Mode::iter() {
            assert_eq!(mode_from_native(mode_native_id(mode)), Some(mode));
        }
        assert_eq!(mode_from_native(0), None);
        assert_eq!(mode_from_native(7), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Mode::from_name("gcm"), Some(Mode::Gcm));
        assert_eq!(Mode::from_name(" CTR "), Some(Mode::Ctr));
        assert_eq!(Mode::from_name("xts"), None);
    }
}
