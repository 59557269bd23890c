use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color '{0}' (expected letters from WUBRG, or 'c' for colorless)")]
    InvalidColor(char),
}

/// One of the five colors, in WUBRG order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Blue => 'u',
            Color::Black => 'b',
            Color::Red => 'r',
            Color::Green => 'g',
        }
    }

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'w' => Some(Color::White),
            'u' => Some(Color::Blue),
            'b' => Some(Color::Black),
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Color::White => 1 << 0,
            Color::Blue => 1 << 1,
            Color::Black => 1 << 2,
            Color::Red => 1 << 3,
            Color::Green => 1 << 4,
        }
    }
}

/// The set of colors a card or combo is restricted to.
///
/// Stored as bitflags, so two identities built from the same letters in any
/// order or with duplicates compare equal. The canonical text form is the
/// WUBRG subsequence in lowercase (`"wub"`), and `"c"` for colorless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorIdentity(u8);

impl ColorIdentity {
    pub const COLORLESS: Self = Self(0);
    pub const ALL: Self = Self(0b1_1111);

    /// Builds an identity from canonical bits, ignoring anything past the fifth color.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_colorless(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    /// Every color in `self` also appears in `other`
    #[must_use]
    pub const fn is_subset_of(self, other: ColorIdentity) -> bool {
        self.0 & other.0 == self.0
    }

    #[must_use]
    pub const fn is_superset_of(self, other: ColorIdentity) -> bool {
        other.is_subset_of(self)
    }

    #[must_use]
    pub const fn union(self, other: ColorIdentity) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn difference(self, other: ColorIdentity) -> Self {
        Self(self.0 & !other.0)
    }

    #[must_use]
    pub const fn with(self, color: Color) -> Self {
        Self(self.0 | color.bit())
    }

    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Colors present, in WUBRG order
    pub fn colors(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Position in [`COLOR_ORDER`]; identities missing from the table share the last rank.
    #[must_use]
    pub fn canonical_rank(self) -> usize {
        COLOR_ORDER
            .iter()
            .position(|shape| shape.0 == self.0)
            .unwrap_or(COLOR_ORDER.len())
    }
}

const fn shape(letters: &[u8]) -> ColorIdentity {
    let mut bits = 0u8;
    let mut i = 0;
    while i < letters.len() {
        bits |= match letters[i] {
            b'w' => 1 << 0,
            b'u' => 1 << 1,
            b'b' => 1 << 2,
            b'r' => 1 << 3,
            b'g' => 1 << 4,
            _ => 0,
        };
        i += 1;
    }
    ColorIdentity(bits)
}

/// Display ranking of color-identity shapes: colorless, mono, allied pairs,
/// enemy pairs, shards, wedges, four-color, five-color.
pub const COLOR_ORDER: [ColorIdentity; 32] = [
    shape(b""),
    shape(b"w"),
    shape(b"u"),
    shape(b"b"),
    shape(b"r"),
    shape(b"g"),
    shape(b"wu"),
    shape(b"ub"),
    shape(b"br"),
    shape(b"rg"),
    shape(b"gw"),
    shape(b"wb"),
    shape(b"ur"),
    shape(b"bg"),
    shape(b"rw"),
    shape(b"gu"),
    shape(b"wub"),
    shape(b"ubr"),
    shape(b"brg"),
    shape(b"rgw"),
    shape(b"gwu"),
    shape(b"wbg"),
    shape(b"urw"),
    shape(b"bgu"),
    shape(b"rwb"),
    shape(b"gur"),
    shape(b"ubrg"),
    shape(b"brgw"),
    shape(b"rgwu"),
    shape(b"gwub"),
    shape(b"wubr"),
    shape(b"wubrg"),
];

impl From<Color> for ColorIdentity {
    fn from(color: Color) -> Self {
        Self(color.bit())
    }
}

impl FromIterator<Color> for ColorIdentity {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ColorIdentity::COLORLESS, ColorIdentity::with)
    }
}

impl FromStr for ColorIdentity {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("c")
            || trimmed.eq_ignore_ascii_case("colorless")
        {
            return Ok(Self::COLORLESS);
        }

        trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| Color::from_letter(c).ok_or(ColorError::InvalidColor(c)))
            .collect()
    }
}

impl fmt::Display for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_colorless() {
            return write!(f, "c");
        }
        for color in self.colors() {
            write!(f, "{}", color.letter())?;
        }
        Ok(())
    }
}

impl Serialize for ColorIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ci(s: &str) -> ColorIdentity {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_is_order_and_case_insensitive() {
        assert_eq!(ci("bw"), ci("WB"));
        assert_eq!(ci("gwwg"), ci("wg"));
        assert_eq!(ci("w, u"), ci("wu"));
        assert_eq!(ci("bw").to_string(), "wb");
    }

    #[test]
    fn test_parse_colorless() {
        assert!(ci("").is_colorless());
        assert!(ci("c").is_colorless());
        assert!(ci("Colorless").is_colorless());
        assert_eq!(ColorIdentity::COLORLESS.to_string(), "c");
    }

    #[test]
    fn test_parse_rejects_unknown_letters() {
        assert_eq!(
            "wx".parse::<ColorIdentity>(),
            Err(ColorError::InvalidColor('x'))
        );
    }

    #[test]
    fn test_subset_and_superset() {
        assert!(ci("g").is_subset_of(ci("bg")));
        assert!(ci("bg").is_subset_of(ci("bg")));
        assert!(!ci("wb").is_subset_of(ci("g")));
        assert!(ci("wubrg").is_superset_of(ci("ur")));
        assert!(ColorIdentity::COLORLESS.is_subset_of(ColorIdentity::COLORLESS));
        assert!(ColorIdentity::COLORLESS.is_subset_of(ci("r")));
    }

    #[test]
    fn test_union_and_difference() {
        let esper = ci("w").union(ci("ub"));
        assert_eq!(esper, ci("wub"));
        assert_eq!(ColorIdentity::ALL.difference(esper), ci("rg"));
        assert_eq!(esper.count(), 3);
    }

    #[test]
    fn test_canonical_rank_ordering() {
        assert!(ci("c").canonical_rank() < ci("w").canonical_rank());
        assert!(ci("g").canonical_rank() < ci("wb").canonical_rank());
        assert!(ci("gw").canonical_rank() < ci("wb").canonical_rank());
        assert!(ci("wb").canonical_rank() < ci("wub").canonical_rank());
        assert!(ci("gur").canonical_rank() < ci("ubrg").canonical_rank());
        assert_eq!(ci("wubrg").canonical_rank(), COLOR_ORDER.len() - 1);
    }

    #[test]
    fn test_canonical_order_covers_every_identity_once() {
        for bits in 0..32u8 {
            let rank = ColorIdentity::from_bits(bits).canonical_rank();
            assert!(rank < COLOR_ORDER.len(), "bits {bits:#07b} not ranked");
        }
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let json = serde_json::to_string(&ci("gw")).unwrap();
        assert_eq!(json, "\"wg\"");
        let back: ColorIdentity = serde_json::from_str("\"GW\"").unwrap();
        assert_eq!(back, ci("wg"));
    }
}
