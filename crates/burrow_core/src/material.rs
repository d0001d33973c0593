//! # Materials
//!
//! Every solid cell carries an explicit `MaterialKind` tag. Per-kind numbers
//! (durability, yield, gem value) live in an injected `MaterialCatalog`, not in
//! the tag itself.
//!
//! ## Two value axes
//!
//! - **Material yield**: what breaking a base cell (mud, stone) produces.
//! - **Gem value**: what breaking an ore cell is worth. Strictly increasing
//!   with ore rarity.
//!
//! The axes are independent; they are never summed into one score.

use serde::{Deserialize, Serialize};

use crate::error::{BurrowError, BurrowResult};

/// Material of a solid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MaterialKind {
    /// Soft base material.
    Mud = 0,
    /// Hard base material; the host rock for ore veins.
    Stone = 1,
    /// Most common ore.
    Copper = 2,
    /// Common ore.
    Iron = 3,
    /// Uncommon ore.
    Silver = 4,
    /// Rare ore.
    Gold = 5,
    /// Rarest ore.
    Diamond = 6,
}

impl MaterialKind {
    /// Number of kinds.
    pub const COUNT: usize = 7;

    /// Ore kinds in ascending rarity.
    pub const ORES: [Self; 5] = [Self::Copper, Self::Iron, Self::Silver, Self::Gold, Self::Diamond];

    /// Every kind, in tag order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Mud,
        Self::Stone,
        Self::Copper,
        Self::Iron,
        Self::Silver,
        Self::Gold,
        Self::Diamond,
    ];

    /// Intrinsic class of the kind.
    #[inline]
    #[must_use]
    pub const fn class(self) -> MaterialClass {
        match self {
            Self::Mud => MaterialClass::Soft,
            Self::Stone => MaterialClass::Hard,
            _ => MaterialClass::Ore,
        }
    }

    /// True for ore kinds.
    #[inline]
    #[must_use]
    pub const fn is_ore(self) -> bool {
        matches!(self.class(), MaterialClass::Ore)
    }

    /// Rarity rank among ores (0 = most common). `None` for base kinds.
    #[must_use]
    pub const fn ore_rank(self) -> Option<usize> {
        match self {
            Self::Copper => Some(0),
            Self::Iron => Some(1),
            Self::Silver => Some(2),
            Self::Gold => Some(3),
            Self::Diamond => Some(4),
            Self::Mud | Self::Stone => None,
        }
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mud => "mud",
            Self::Stone => "stone",
            Self::Copper => "copper",
            Self::Iron => "iron",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Diamond => "diamond",
        }
    }
}

/// Coarse classification used by target selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialClass {
    /// Soft base kind (mud).
    Soft,
    /// Hard base kind (stone).
    Hard,
    /// Any ore kind.
    Ore,
}

/// Per-kind numbers from the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialProps {
    /// Hit points of a freshly generated cell.
    pub max_durability: u32,
    /// Base "material yield" value.
    pub material_yield: u32,
    /// Gem value (0 for base kinds).
    pub gem_value: u32,
    /// Ore-class predicate.
    pub is_ore: bool,
}

impl MaterialProps {
    const fn base(max_durability: u32, material_yield: u32) -> Self {
        Self {
            max_durability,
            material_yield,
            gem_value: 0,
            is_ore: false,
        }
    }

    const fn ore(max_durability: u32, gem_value: u32) -> Self {
        Self {
            max_durability,
            material_yield: 0,
            gem_value,
            is_ore: true,
        }
    }
}

/// Externally supplied material table.
///
/// Defaults: mud 2 HP, stone 4 HP, every ore shares the stone (hard) value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialCatalog {
    /// Mud entry.
    pub mud: MaterialProps,
    /// Stone entry.
    pub stone: MaterialProps,
    /// Copper entry.
    pub copper: MaterialProps,
    /// Iron entry.
    pub iron: MaterialProps,
    /// Silver entry.
    pub silver: MaterialProps,
    /// Gold entry.
    pub gold: MaterialProps,
    /// Diamond entry.
    pub diamond: MaterialProps,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        const SOFT_HP: u32 = 2;
        const HARD_HP: u32 = 4;
        Self {
            mud: MaterialProps::base(SOFT_HP, 1),
            stone: MaterialProps::base(HARD_HP, 2),
            copper: MaterialProps::ore(HARD_HP, 5),
            iron: MaterialProps::ore(HARD_HP, 10),
            silver: MaterialProps::ore(HARD_HP, 20),
            gold: MaterialProps::ore(HARD_HP, 40),
            diamond: MaterialProps::ore(HARD_HP, 100),
        }
    }
}

impl MaterialCatalog {
    /// Looks up the entry for a kind.
    #[inline]
    #[must_use]
    pub const fn props(&self, kind: MaterialKind) -> &MaterialProps {
        match kind {
            MaterialKind::Mud => &self.mud,
            MaterialKind::Stone => &self.stone,
            MaterialKind::Copper => &self.copper,
            MaterialKind::Iron => &self.iron,
            MaterialKind::Silver => &self.silver,
            MaterialKind::Gold => &self.gold,
            MaterialKind::Diamond => &self.diamond,
        }
    }

    /// Max durability of a fresh cell of this kind.
    #[inline]
    #[must_use]
    pub const fn max_durability(&self, kind: MaterialKind) -> u32 {
        self.props(kind).max_durability
    }

    /// Class of a kind as the catalog sees it.
    #[must_use]
    pub const fn class_of(&self, kind: MaterialKind) -> MaterialClass {
        if self.props(kind).is_ore {
            MaterialClass::Ore
        } else {
            kind.class()
        }
    }

    /// Checks the catalog for values the simulation cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `BurrowError::InvalidCatalog` when a durability is zero, an
    /// ore flag disagrees with the kind, or gem values do not strictly
    /// increase with ore rarity.
    pub fn validate(&self) -> BurrowResult<()> {
        for kind in MaterialKind::ALL {
            let props = self.props(kind);
            if props.max_durability == 0 {
                return Err(BurrowError::InvalidCatalog(format!(
                    "{} has zero max_durability",
                    kind.name()
                )));
            }
            if props.is_ore != kind.is_ore() {
                return Err(BurrowError::InvalidCatalog(format!(
                    "{} has is_ore = {}",
                    kind.name(),
                    props.is_ore
                )));
            }
        }

        let mut previous = 0;
        for kind in MaterialKind::ORES {
            let value = self.props(kind).gem_value;
            if value <= previous {
                return Err(BurrowError::InvalidCatalog(format!(
                    "gem value of {} ({value}) must exceed the previous ore ({previous})",
                    kind.name()
                )));
            }
            previous = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        assert!(MaterialCatalog::default().validate().is_ok());
    }

    #[test]
    fn test_ores_share_hard_durability() {
        let catalog = MaterialCatalog::default();
        let hard = catalog.max_durability(MaterialKind::Stone);
        assert_ne!(catalog.max_durability(MaterialKind::Mud), hard);
        for ore in MaterialKind::ORES {
            assert_eq!(catalog.max_durability(ore), hard, "{} durability", ore.name());
        }
    }

    #[test]
    fn test_gem_values_must_increase() {
        let mut catalog = MaterialCatalog::default();
        catalog.gold.gem_value = 15;
        assert!(matches!(catalog.validate(), Err(BurrowError::InvalidCatalog(_))));
    }

    #[test]
    fn test_class_of() {
        let catalog = MaterialCatalog::default();
        assert_eq!(catalog.class_of(MaterialKind::Mud), MaterialClass::Soft);
        assert_eq!(catalog.class_of(MaterialKind::Stone), MaterialClass::Hard);
        assert_eq!(catalog.class_of(MaterialKind::Silver), MaterialClass::Ore);
    }

    #[test]
    fn test_ore_flag_must_match_kind() {
        let mut catalog = MaterialCatalog::default();
        catalog.stone.is_ore = true;
        assert!(catalog.validate().is_err());
    }
}
