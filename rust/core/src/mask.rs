// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type masks: sets of city object kinds
//!
//! A mask can be written as text, e.g. `"Building, Road"` or `"All ~Road"`.
//! Tokens are separated by whitespace, `,` or `|` and compared without case.
//! A leading `~` or `!` clears the bit instead of setting it, `All` selects
//! every kind, and tokens are applied left to right so later tokens win.
//! Unknown tokens are skipped.

use crate::schema::CityObjectType;
use std::convert::Infallible;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

/// Bit set over [`CityObjectType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeMask(u32);

impl TypeMask {
    /// No kinds selected
    pub const NONE: TypeMask = TypeMask(0);

    /// Every defined kind
    pub const ALL: TypeMask = TypeMask((1 << CityObjectType::ALL.len()) - 1);

    /// Create a mask from raw bits, dropping bits no kind uses
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        TypeMask(bits & Self::ALL.0)
    }

    /// Raw bits
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn contains(&self, t: CityObjectType) -> bool {
        self.0 & t.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, t: CityObjectType) {
        self.0 |= t.bit();
    }

    #[inline]
    pub fn remove(&mut self, t: CityObjectType) {
        self.0 &= !t.bit();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of kinds selected
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Selected kinds in bit order
    pub fn iter(&self) -> impl Iterator<Item = CityObjectType> + '_ {
        CityObjectType::ALL
            .iter()
            .copied()
            .filter(move |t| self.contains(*t))
    }

    /// Parse the textual mask grammar. Never fails.
    pub fn parse(text: &str) -> Self {
        let mut mask = TypeMask::NONE;

        for token in text
            .split(|c: char| c.is_whitespace() || c == ',' || c == '|')
            .filter(|t| !t.is_empty())
        {
            let (negate, name) = match token.strip_prefix(|c: char| c == '~' || c == '!') {
                Some(rest) => (true, rest),
                None => (false, token),
            };

            let bits = if name.eq_ignore_ascii_case("All") {
                TypeMask::ALL.0
            } else if let Some(t) = CityObjectType::from_name(name) {
                t.bit()
            } else {
                continue;
            };

            if negate {
                mask.0 &= !bits;
            } else {
                mask.0 |= bits;
            }
        }

        mask
    }
}

impl From<CityObjectType> for TypeMask {
    fn from(t: CityObjectType) -> Self {
        TypeMask(t.bit())
    }
}

impl FromIterator<CityObjectType> for TypeMask {
    fn from_iter<I: IntoIterator<Item = CityObjectType>>(iter: I) -> Self {
        let mut mask = TypeMask::NONE;
        for t in iter {
            mask.insert(t);
        }
        mask
    }
}

impl FromStr for TypeMask {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeMask::parse(s))
    }
}

impl BitOr for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 | rhs.0)
    }
}

impl BitOr<CityObjectType> for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: CityObjectType) -> TypeMask {
        TypeMask(self.0 | rhs.bit())
    }
}

impl BitAnd for TypeMask {
    type Output = TypeMask;

    fn bitand(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 & rhs.0)
    }
}

impl Not for TypeMask {
    type Output = TypeMask;

    fn not(self) -> TypeMask {
        TypeMask(!self.0 & TypeMask::ALL.0)
    }
}

/// Class names joined by `|`, e.g. `Building|Road`
impl fmt::Display for TypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(t.as_str())?;
        }
        Ok(())
    }
}
