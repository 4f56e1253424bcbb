//! Catalog index module.
//!
//! A read-only, in-memory view over the item definitions the engine works
//! with. Items are stored sorted by id so that every query returns them in
//! the same order, which is also the final tie-break for candidate ranking.

pub mod item;
pub mod manifest;

pub use item::{
    ClassAffinity, DamageElement, ItemDefinition, ItemKind, PieceQuality, Rarity, Slot,
    SlotGroup, SubclassRole, WeaponType,
};
pub use manifest::{parse_manifest_json, NormalizedManifest, RawItem, RawRarity};

use crate::error::EngineError;
use crate::item_id::ItemId;
use crate::stats::StatChannel;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Filter for per-slot candidate queries.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    pub slot: Slot,
    pub class: ClassAffinity,
    /// Restrict to owned items. Has no effect when no inventory is known.
    pub inventory_only: bool,
}

/// Immutable, indexed set of item definitions.
///
/// # Examples
///
/// ```rust
/// use buildsmith::catalog::{CatalogIndex, CandidateFilter};
/// use buildsmith::{ClassAffinity, ItemDefinition, ItemKind, Slot};
///
/// let catalog = CatalogIndex::from_items(vec![
///     ItemDefinition::new("helm_b", "Helm B", ItemKind::Armor).with_slot(Slot::Helmet),
///     ItemDefinition::new("helm_a", "Helm A", ItemKind::Armor).with_slot(Slot::Helmet),
/// ])
/// .unwrap();
///
/// let filter = CandidateFilter {
///     slot: Slot::Helmet,
///     class: ClassAffinity::Any,
///     inventory_only: false,
/// };
/// let ids: Vec<_> = catalog.candidates(filter).iter().map(|i| i.id.as_str()).collect();
/// assert_eq!(ids, ["helm_a", "helm_b"]);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    items: Vec<ItemDefinition>,
    by_id: HashMap<ItemId, usize>,
    by_kind: BTreeMap<ItemKind, Vec<usize>>,
    by_slot: BTreeMap<Slot, Vec<usize>>,
    inventory: Option<BTreeSet<ItemId>>,
}

impl CatalogIndex {
    /// Build an index from item definitions.
    ///
    /// Later duplicates of an id replace earlier ones. Returns
    /// [`EngineError::EmptyCatalog`] when no items are supplied.
    pub fn from_items(items: impl IntoIterator<Item = ItemDefinition>) -> Result<Self, EngineError> {
        let map: BTreeMap<ItemId, ItemDefinition> =
            items.into_iter().map(|item| (item.id.clone(), item)).collect();
        Self::from_map(map)
    }

    /// Build an index from an id-keyed map.
    pub fn from_map(map: BTreeMap<ItemId, ItemDefinition>) -> Result<Self, EngineError> {
        if map.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }

        let items: Vec<ItemDefinition> = map.into_values().collect();
        let mut by_id = HashMap::with_capacity(items.len());
        let mut by_kind: BTreeMap<ItemKind, Vec<usize>> = BTreeMap::new();
        let mut by_slot: BTreeMap<Slot, Vec<usize>> = BTreeMap::new();

        for (idx, item) in items.iter().enumerate() {
            by_id.insert(item.id.clone(), idx);
            by_kind.entry(item.kind).or_default().push(idx);
            if let Some(slot) = item.slot {
                by_slot.entry(slot).or_default().push(idx);
            }
        }

        tracing::debug!(items = items.len(), "catalog indexed");
        Ok(Self {
            items,
            by_id,
            by_kind,
            by_slot,
            inventory: None,
        })
    }

    /// Build an index from a raw JSON manifest.
    ///
    /// Records that cannot be normalized are skipped with a warning.
    pub fn from_manifest_json(json: &str) -> Result<Self, EngineError> {
        let manifest = parse_manifest_json(json)?;
        Self::from_items(manifest.items)
    }

    /// Attach the set of owned item ids.
    pub fn with_inventory(mut self, owned: impl IntoIterator<Item = ItemId>) -> Self {
        self.inventory = Some(owned.into_iter().collect());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }

    /// Every item, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    pub fn by_kind(&self, kind: ItemKind) -> impl Iterator<Item = &ItemDefinition> {
        self.indexed(self.by_kind.get(&kind))
    }

    pub fn in_slot(&self, slot: Slot) -> impl Iterator<Item = &ItemDefinition> {
        self.indexed(self.by_slot.get(&slot))
    }

    fn indexed<'a>(
        &'a self,
        indices: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a ItemDefinition> + 'a {
        indices
            .into_iter()
            .flatten()
            .map(move |&idx| &self.items[idx])
    }

    /// Whether the item is usable under the inventory restriction.
    ///
    /// With no inventory attached every item counts as owned.
    pub fn is_owned(&self, id: &ItemId) -> bool {
        self.inventory.as_ref().map_or(true, |owned| owned.contains(id))
    }

    pub fn has_inventory(&self) -> bool {
        self.inventory.is_some()
    }

    /// Items for a slot that the class can use, in id order.
    pub fn candidates(&self, filter: CandidateFilter) -> Vec<&ItemDefinition> {
        self.in_slot(filter.slot)
            .filter(|item| item.class_affinity.accepts(filter.class))
            .filter(|item| !filter.inventory_only || self.is_owned(&item.id))
            .collect()
    }

    /// Subclass components usable by `class`, in id order.
    pub fn subclass_components(&self, class: ClassAffinity) -> Vec<&ItemDefinition> {
        self.by_kind(ItemKind::SubclassComponent)
            .filter(|item| item.class_affinity.accepts(class))
            .collect()
    }

    pub fn mods(&self) -> Vec<&ItemDefinition> {
        self.by_kind(ItemKind::Mod).collect()
    }

    /// Lower-cased item names paired with ids, longest name first.
    ///
    /// Equal-length names keep id order, so the lowest id wins a shared name.
    pub fn names_longest_first(&self) -> Vec<(String, ItemId)> {
        let mut names: Vec<(String, ItemId)> = self
            .items
            .iter()
            .filter(|item| !item.name.trim().is_empty())
            .map(|item| (item.name.to_lowercase(), item.id.clone()))
            .collect();
        names.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        names
    }

    /// Largest single-piece contribution to `channel` among usable items in `slot`.
    pub fn max_contribution(&self, slot: Slot, channel: StatChannel, class: ClassAffinity) -> i32 {
        self.in_slot(slot)
            .filter(|item| item.class_affinity.accepts(class))
            .map(|item| item.stat_contributions.get(&channel).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
            .max(0)
    }

    /// Whether any armor piece in the catalog is masterworked or tuned.
    pub fn has_top_tier_armor(&self) -> bool {
        self.by_kind(ItemKind::Armor)
            .any(|item| item.quality.is_top_tier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CatalogIndex {
        CatalogIndex::from_items(vec![
            ItemDefinition::new("helm_titan", "Titan Helm", ItemKind::Armor)
                .with_slot(Slot::Helmet)
                .with_class(ClassAffinity::Titan)
                .with_stat(StatChannel::Resilience, 20),
            ItemDefinition::new("helm_any", "Plain Helm", ItemKind::Armor)
                .with_slot(Slot::Helmet)
                .with_stat(StatChannel::Resilience, 12),
            ItemDefinition::new("helm_hunter", "Hunter Helm", ItemKind::Armor)
                .with_slot(Slot::Helmet)
                .with_class(ClassAffinity::Hunter)
                .with_stat(StatChannel::Resilience, 30),
            ItemDefinition::new("mod_a", "Recovery Mod", ItemKind::Mod)
                .with_stat(StatChannel::Recovery, 10),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_catalog_is_error() {
        let err = CatalogIndex::from_items(Vec::new()).unwrap_err();
        assert_eq!(err, EngineError::EmptyCatalog);
    }

    #[test]
    fn test_candidates_filter_by_class() {
        let catalog = sample();
        let filter = CandidateFilter {
            slot: Slot::Helmet,
            class: ClassAffinity::Titan,
            inventory_only: false,
        };
        let ids: Vec<_> = catalog
            .candidates(filter)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, ["helm_any", "helm_titan"]);
    }

    #[test]
    fn test_inventory_filter() {
        let catalog = sample().with_inventory([ItemId::new("helm_titan")]);
        let filter = CandidateFilter {
            slot: Slot::Helmet,
            class: ClassAffinity::Any,
            inventory_only: true,
        };
        let ids: Vec<_> = catalog
            .candidates(filter)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, ["helm_titan"]);
    }

    #[test]
    fn test_inventory_only_without_inventory_keeps_everything() {
        let catalog = sample();
        assert!(!catalog.has_inventory());
        let filter = CandidateFilter {
            slot: Slot::Helmet,
            class: ClassAffinity::Any,
            inventory_only: true,
        };
        assert_eq!(catalog.candidates(filter).len(), 3);
    }

    #[test]
    fn test_kind_index_and_lookup() {
        let catalog = sample();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.mods().len(), 1);
        assert_eq!(
            catalog.get(&ItemId::new("mod_a")).map(|i| i.name.as_str()),
            Some("Recovery Mod")
        );
        assert!(catalog.get(&ItemId::new("missing")).is_none());
    }

    #[test]
    fn test_names_longest_first() {
        let catalog = sample();
        let names = catalog.names_longest_first();
        assert_eq!(names[0].0, "recovery mod");
        assert!(names.windows(2).all(|w| w[0].0.len() >= w[1].0.len()));
    }

    #[test]
    fn test_max_contribution_respects_class() {
        let catalog = sample();
        assert_eq!(
            catalog.max_contribution(Slot::Helmet, StatChannel::Resilience, ClassAffinity::Titan),
            20
        );
        assert_eq!(
            catalog.max_contribution(Slot::Helmet, StatChannel::Resilience, ClassAffinity::Any),
            30
        );
        assert_eq!(
            catalog.max_contribution(Slot::Legs, StatChannel::Resilience, ClassAffinity::Any),
            0
        );
    }
}
