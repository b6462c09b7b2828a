//! Variant metadata registry (ids, labels, deck shapes).
//!
//! Keep this aligned with `variant_engine` so every GameMode has both a
//! metadata entry here and an engine implementation there.

use crate::game::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub mode: GameMode,
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub deck_count: u8,
    /// Total cards in a default deal.
    pub card_total: u16,
    pub has_stock: bool,
    pub has_waste: bool,
}

const KLONDIKE_SPEC: VariantSpec = VariantSpec {
    mode: GameMode::Klondike,
    id: "klondike",
    label: "Klondike",
    emoji: "🥇",
    deck_count: 1,
    card_total: 52,
    has_stock: true,
    has_waste: true,
};

const SPIDER_SPEC: VariantSpec = VariantSpec {
    mode: GameMode::Spider,
    id: "spider",
    label: "Spider",
    emoji: "🕷️",
    deck_count: 2,
    card_total: 104,
    has_stock: true,
    has_waste: false,
};

const FREECELL_SPEC: VariantSpec = VariantSpec {
    mode: GameMode::Freecell,
    id: "freecell",
    label: "FreeCell",
    emoji: "🗽",
    deck_count: 1,
    card_total: 52,
    has_stock: false,
    has_waste: false,
};

const PYRAMID_SPEC: VariantSpec = VariantSpec {
    mode: GameMode::Pyramid,
    id: "pyramid",
    label: "Pyramid",
    emoji: "🔺",
    deck_count: 1,
    card_total: 52,
    has_stock: true,
    has_waste: true,
};

const THIRTY_ONE_SPEC: VariantSpec = VariantSpec {
    mode: GameMode::ThirtyOne,
    id: "thirty-one",
    label: "Thirty-One",
    emoji: "🍑",
    deck_count: 1,
    card_total: 52,
    has_stock: true,
    has_waste: false,
};

const VARIANT_SPECS: [VariantSpec; 5] = [
    KLONDIKE_SPEC,
    SPIDER_SPEC,
    FREECELL_SPEC,
    PYRAMID_SPEC,
    THIRTY_ONE_SPEC,
];

pub fn all_variant_specs() -> &'static [VariantSpec] {
    &VARIANT_SPECS
}

pub fn spec_for_mode(mode: GameMode) -> &'static VariantSpec {
    VARIANT_SPECS
        .iter()
        .find(|spec| spec.mode == mode)
        .unwrap_or(&VARIANT_SPECS[0])
}

pub fn spec_for_id(id: &str) -> Option<&'static VariantSpec> {
    VARIANT_SPECS.iter().find(|spec| spec.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spec_round_trips_its_id() {
        for spec in all_variant_specs() {
            assert_eq!(spec_for_id(spec.id).map(|s| s.mode), Some(spec.mode));
            assert_eq!(GameMode::from_id(spec.id), Some(spec.mode));
            assert_eq!(spec.mode.id(), spec.id);
        }
    }

    #[test]
    fn deck_counts_match_card_totals() {
        for spec in all_variant_specs() {
            assert_eq!(u16::from(spec.deck_count) * 52, spec.card_total);
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(spec_for_id("canfield").is_none());
    }
}
