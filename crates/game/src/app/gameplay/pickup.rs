use std::collections::BTreeMap;

use engine::{Vec2, Visual};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PickupKind {
    Lemon,
    WaterBucket,
    LemonadePitcher,
    LemonadeGlass,
    RatPoison,
    LaundryBasin,
    LaundryBasinEmpty,
}

impl PickupKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PickupKind::Lemon => "lemon",
            PickupKind::WaterBucket => "water bucket",
            PickupKind::LemonadePitcher => "lemonade pitcher",
            PickupKind::LemonadeGlass => "lemonade glass",
            PickupKind::RatPoison => "rat poison",
            PickupKind::LaundryBasin => "laundry basin",
            PickupKind::LaundryBasinEmpty => "empty laundry basin",
        }
    }
}

/// Partner kind -> result kind. A missing partner means the pair does not combine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CombineTable {
    entries: BTreeMap<PickupKind, PickupKind>,
}

impl CombineTable {
    pub(crate) fn result_for(&self, partner: PickupKind) -> Option<PickupKind> {
        self.entries.get(&partner).copied()
    }
}

impl FromIterator<(PickupKind, PickupKind)> for CombineTable {
    fn from_iter<I: IntoIterator<Item = (PickupKind, PickupKind)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pickup {
    pub(crate) kind: PickupKind,
    pub(crate) combine_table: CombineTable,
}

impl Pickup {
    /// Result of combining `carried` into this pickup, looked up in this pickup's table.
    pub(crate) fn combine_result(&self, carried: PickupKind) -> Option<PickupKind> {
        self.combine_table.result_for(carried)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PickupTemplate {
    pub(crate) kind: PickupKind,
    pub(crate) size: Vec2,
    pub(crate) help_text: String,
    pub(crate) combine_table: CombineTable,
    pub(crate) visual: Visual,
}

impl PickupTemplate {
    pub(crate) fn pickup(&self) -> Pickup {
        Pickup {
            kind: self.kind,
            combine_table: self.combine_table.clone(),
        }
    }
}

/// Templates for every pickup kind the world knows how to create.
#[derive(Debug, Default)]
pub(crate) struct PickupCatalog {
    templates: BTreeMap<PickupKind, PickupTemplate>,
}

impl PickupCatalog {
    pub(crate) fn insert(&mut self, template: PickupTemplate) {
        self.templates.insert(template.kind, template);
    }

    pub(crate) fn get(&self, kind: PickupKind) -> Option<&PickupTemplate> {
        self.templates.get(&kind)
    }

    pub(crate) fn len(&self) -> usize {
        self.templates.len()
    }
}
