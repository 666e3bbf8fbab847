// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! City object kinds
//!
//! Each kind owns exactly one bit so that sets of kinds fit in a [`TypeMask`].
//!
//! [`TypeMask`]: crate::TypeMask

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// City object kinds, one bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum CityObjectType {
    GenericCityObject = 1 << 0,
    Building = 1 << 1,
    Room = 1 << 2,
    BuildingInstallation = 1 << 3,
    BuildingFurniture = 1 << 4,
    Door = 1 << 5,
    Window = 1 << 6,
    CityFurniture = 1 << 7,
    Track = 1 << 8,
    Road = 1 << 9,
    Railway = 1 << 10,
    Square = 1 << 11,
    PlantCover = 1 << 12,
    SolitaryVegetationObject = 1 << 13,
    WaterBody = 1 << 14,
    TINRelief = 1 << 15,
    LandUse = 1 << 16,
    Tunnel = 1 << 17,
    Bridge = 1 << 18,
    BridgeConstructionElement = 1 << 19,
    BridgeInstallation = 1 << 20,
    BridgePart = 1 << 21,
}

impl CityObjectType {
    /// Every kind, in bit order
    pub const ALL: [CityObjectType; 22] = [
        Self::GenericCityObject,
        Self::Building,
        Self::Room,
        Self::BuildingInstallation,
        Self::BuildingFurniture,
        Self::Door,
        Self::Window,
        Self::CityFurniture,
        Self::Track,
        Self::Road,
        Self::Railway,
        Self::Square,
        Self::PlantCover,
        Self::SolitaryVegetationObject,
        Self::WaterBody,
        Self::TINRelief,
        Self::LandUse,
        Self::Tunnel,
        Self::Bridge,
        Self::BridgeConstructionElement,
        Self::BridgeInstallation,
        Self::BridgePart,
    ];

    /// The single bit this kind occupies in a mask
    #[inline]
    pub fn bit(self) -> u32 {
        self as u32
    }

    /// Get the CityGML class name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenericCityObject => "GenericCityObject",
            Self::Building => "Building",
            Self::Room => "Room",
            Self::BuildingInstallation => "BuildingInstallation",
            Self::BuildingFurniture => "BuildingFurniture",
            Self::Door => "Door",
            Self::Window => "Window",
            Self::CityFurniture => "CityFurniture",
            Self::Track => "Track",
            Self::Road => "Road",
            Self::Railway => "Railway",
            Self::Square => "Square",
            Self::PlantCover => "PlantCover",
            Self::SolitaryVegetationObject => "SolitaryVegetationObject",
            Self::WaterBody => "WaterBody",
            Self::TINRelief => "TINRelief",
            Self::LandUse => "LandUse",
            Self::Tunnel => "Tunnel",
            Self::Bridge => "Bridge",
            Self::BridgeConstructionElement => "BridgeConstructionElement",
            Self::BridgeInstallation => "BridgeInstallation",
            Self::BridgePart => "BridgePart",
        }
    }

    /// Look up a kind by class name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CityObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s.trim()).ok_or_else(|| Error::UnknownObjectType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_distinct() {
        let mut seen = 0u32;
        for t in CityObjectType::ALL {
            assert_eq!(t.bit().count_ones(), 1, "{} must own one bit", t);
            assert_eq!(seen & t.bit(), 0, "{} overlaps another kind", t);
            seen |= t.bit();
        }
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(
            CityObjectType::from_name("building"),
            Some(CityObjectType::Building)
        );
        assert_eq!(
            CityObjectType::from_name("TINRELIEF"),
            Some(CityObjectType::TINRelief)
        );
        assert_eq!(CityObjectType::from_name("Skyscraper"), None);
    }

    #[test]
    fn test_from_str_reports_unknown() {
        assert_eq!("Road".parse::<CityObjectType>(), Ok(CityObjectType::Road));
        assert_eq!(
            "Castle".parse::<CityObjectType>(),
            Err(Error::UnknownObjectType("Castle".to_string()))
        );
    }

    #[test]
    fn test_ordering_follows_bits() {
        assert!(CityObjectType::GenericCityObject < CityObjectType::Building);
        assert!(CityObjectType::Bridge < CityObjectType::BridgePart);
    }
}
