use crate::error::BrewError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// WUBRG order, the order identities are printed in.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
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

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// ColorIdentity
// ---------------------------------------------------------------------------

/// A color identity stored as bitflags. The empty set is colorless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorIdentity(u8);

impl ColorIdentity {
    pub const COLORLESS: Self = Self(0);

    pub const fn is_colorless(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    /// True if every color of `other` is also in `self`.
    pub const fn is_superset_of(self, other: ColorIdentity) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: ColorIdentity) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn with(self, color: Color) -> Self {
        Self(self.0 | color.bit())
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn colors(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Letters in WUBRG order, e.g. `"WBR"`. Empty for colorless.
    pub fn letters(self) -> String {
        self.colors().map(Color::symbol).collect()
    }
}

impl fmt::Display for ColorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_colorless() {
            f.write_str("C")
        } else {
            f.write_str(&self.letters())
        }
    }
}

impl FromIterator<Color> for ColorIdentity {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ColorIdentity::COLORLESS, |set, color| set.with(color))
    }
}

impl FromStr for ColorIdentity {
    type Err = BrewError;

    /// Accepts `"wub"`, `"W,U,B"`, `"W U B"` and `"C"`/`""` for colorless.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut id = ColorIdentity::COLORLESS;
        for c in s.chars() {
            if c == ',' || c.is_whitespace() || c.eq_ignore_ascii_case(&'c') {
                continue;
            }
            let color = Color::from_symbol(c).ok_or_else(|| BrewError::InvalidColor(c.to_string()))?;
            id = id.with(color);
        }
        Ok(id)
    }
}

impl Serialize for ColorIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let letters: Vec<String> = self.colors().map(|c| c.symbol().to_string()).collect();
        letters.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ColorIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let letters = Vec::<String>::deserialize(deserializer)?;
        letters
            .iter()
            .map(|l| l.parse::<ColorIdentity>())
            .try_fold(ColorIdentity::COLORLESS, |acc, id| Ok(acc.union(id?)))
            .map_err(|e: BrewError| serde::de::Error::custom(e.to_string()))
    }
}
