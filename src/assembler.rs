//! Build assembler.
//!
//! Fills a build in a fixed order: locked items, subclass, weapons, armor,
//! then mods. Each slot group holds at most one exotic. The group's exotic
//! is placed wherever it raises the group's total score the most, which
//! keeps the greedy per-slot pick from spending the exotic on a weak slot.

use crate::archetype::{score_piece, Archetype, FeasibilityLimits};
use crate::build::{
    Build, CandidateScore, Diagnostic, SlotAssignment, SubclassConfig, SubclassPick,
};
use crate::catalog::{
    CandidateFilter, CatalogIndex, DamageElement, ItemDefinition, ItemKind, Slot, SubclassRole,
};
use crate::config::EngineConfig;
use crate::content::ContentTables;
use crate::intent::BuildIntent;
use crate::mods::select_mods;
use crate::stats::aggregate_resolved;
use crate::synergy::{DetectionInput, SynergyDetector};
use crate::weapon::score_weapon;
use std::collections::BTreeMap;

/// Subclass score for an element the intent asked for.
const ELEMENT_MATCH_SCORE: u32 = 50;
/// Subclass score for an element whose affinity suits the playstyle.
const PLAYSTYLE_MATCH_SCORE: u32 = 20;

/// Ranked candidates: score descending, then rarity descending.
///
/// The input is in catalog id order and the sort is stable, so id order
/// breaks any remaining tie.
fn rank(candidates: &mut [(CandidateScore, &ItemDefinition)]) {
    candidates.sort_by(|a, b| {
        b.0.score
            .total_cmp(&a.0.score)
            .then_with(|| b.1.rarity.cmp(&a.1.rarity))
    });
}

/// Per-request assembler over shared engine data.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    catalog: &'a CatalogIndex,
    content: &'a ContentTables,
    config: &'a EngineConfig,
}

impl<'a> Assembler<'a> {
    pub fn new(catalog: &'a CatalogIndex, content: &'a ContentTables, config: &'a EngineConfig) -> Self {
        Self {
            catalog,
            content,
            config,
        }
    }

    /// Assemble a build for `intent` around `archetype`.
    ///
    /// With `include_runner_ups` each filled slot also keeps the next-best
    /// candidates.
    pub fn assemble(&self, intent: &BuildIntent, archetype: &Archetype, include_runner_ups: bool) -> Build {
        let mut diagnostics = Vec::new();
        if intent.confidence < self.config.low_confidence_threshold {
            diagnostics.push(Diagnostic::LowConfidence {
                confidence: intent.confidence,
            });
        }

        let locked = self.place_locked(intent, &mut diagnostics);
        let subclass = self.choose_subclass(intent);

        let weapons = self.fill_group(
            &Slot::WEAPONS,
            &locked,
            intent,
            include_runner_ups,
            &mut diagnostics,
            |item| {
                let scored = score_weapon(&self.content.weapons, item, intent);
                candidate(item, scored.score, scored.reasons)
            },
        );
        let armor = self.fill_group(
            &Slot::ARMOR,
            &locked,
            intent,
            include_runner_ups,
            &mut diagnostics,
            |item| {
                let score = score_piece(item, intent, archetype);
                candidate(item, score, piece_reasons(item, archetype))
            },
        );

        let mods = select_mods(
            self.catalog,
            &self.content.mods,
            intent,
            intent.target_class,
            self.config.mod_caps,
        );

        let mut equipped: Vec<&ItemDefinition> = weapons
            .iter()
            .chain(armor.iter())
            .filter_map(SlotAssignment::chosen_id)
            .filter_map(|id| self.catalog.get(id))
            .collect();
        equipped.extend(mods.iter().filter_map(|m| self.catalog.get(&m.item_id)));
        let stats = aggregate_resolved(&equipped);

        self.check_constraints(intent, &mut diagnostics);

        equipped.extend(
            subclass
                .components
                .iter()
                .filter_map(|c| self.catalog.get(&c.item_id)),
        );
        let findings = SynergyDetector::new(&self.content.rules, &self.content.activities).detect(
            DetectionInput {
                items: &equipped,
                element: subclass.element,
                intent,
                archetype,
                stats: &stats,
            },
        );

        tracing::debug!(
            archetype = %archetype.name,
            diagnostics = diagnostics.len(),
            "build assembled"
        );

        Build {
            archetype: archetype.name.clone(),
            activity: intent.activity,
            subclass,
            weapons,
            armor,
            mods,
            stats: stats.totals,
            stat_breakdown: stats.breakdown,
            stat_overflow: stats.overflow,
            synergies: findings.synergies,
            conflicts: findings.conflicts,
            diagnostics,
        }
    }

    /// Validate locked items and assign them their slots.
    fn place_locked(
        &self,
        intent: &BuildIntent,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> BTreeMap<Slot, &'a ItemDefinition> {
        let mut locked: BTreeMap<Slot, &'a ItemDefinition> = BTreeMap::new();

        for id in &intent.locked_items {
            let Some(item) = self.catalog.get(id) else {
                tracing::warn!(item = %id, "locked item is not in the catalog");
                diagnostics.push(Diagnostic::UnknownLockedItem {
                    item_id: id.clone(),
                });
                continue;
            };

            let rejection = match item.slot {
                None => Some("item has no equipment slot".to_string()),
                Some(_) if !item.class_affinity.accepts(intent.target_class) => Some(format!(
                    "item is for {} but the build is for {}",
                    item.class_affinity, intent.target_class
                )),
                Some(_) if intent.use_inventory_only && !self.catalog.is_owned(id) => {
                    Some("item is not in the inventory".to_string())
                }
                Some(slot) => {
                    if let Some(other) = locked.get(&slot) {
                        Some(format!("{slot} slot is already locked to {}", other.name))
                    } else if item.is_exotic()
                        && locked
                            .values()
                            .any(|o| o.is_exotic() && o.slot.map(Slot::group) == Some(slot.group()))
                    {
                        Some("a second exotic in the same slot group".to_string())
                    } else {
                        None
                    }
                }
            };

            match (rejection, item.slot) {
                (None, Some(slot)) => {
                    locked.insert(slot, item);
                }
                (reason, _) => {
                    let reason = reason.unwrap_or_default();
                    tracing::warn!(item = %id, reason = %reason, "locked item rejected");
                    diagnostics.push(Diagnostic::LockedItemRejected {
                        item_id: id.clone(),
                        reason,
                    });
                }
            }
        }

        locked
    }

    /// Pick a subclass element and its components.
    fn choose_subclass(&self, intent: &BuildIntent) -> SubclassConfig {
        let components: Vec<&ItemDefinition> = self
            .catalog
            .subclass_components(intent.target_class)
            .into_iter()
            .filter(|c| c.damage_element.is_subclass_element())
            .collect();

        let mut elements: Vec<DamageElement> = components.iter().map(|c| c.damage_element).collect();
        elements.sort();
        elements.dedup();
        if elements.is_empty() {
            return SubclassConfig {
                element: intent.element.filter(|e| e.is_subclass_element()),
                components: Vec::new(),
            };
        }

        let score = |element: DamageElement| -> u32 {
            let mut score = 0;
            if intent.element == Some(element) {
                score += ELEMENT_MATCH_SCORE;
            }
            let suits_playstyle = self
                .content
                .rules
                .affinity(element)
                .is_some_and(|a| a.playstyles.contains(&intent.playstyle));
            if suits_playstyle {
                score += PLAYSTYLE_MATCH_SCORE;
            }
            score
        };
        let best = elements.iter().map(|&e| score(e)).max().unwrap_or(0);
        let tied: Vec<DamageElement> = elements.into_iter().filter(|&e| score(e) == best).collect();
        let canonical = self.config.canonical_element;
        let element = if tied.contains(&canonical) {
            canonical
        } else {
            tied.first().copied().unwrap_or(canonical)
        };

        let mut ranked: Vec<(usize, &ItemDefinition)> = components
            .into_iter()
            .filter(|c| c.damage_element == element)
            .map(|c| {
                let found = self.content.rules.detect_in_text(&c.searchable_text());
                (found.triggers.len() + found.effects.len(), c)
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let caps = self.config.subclass_caps;
        let mut picks = Vec::new();
        for (role, cap) in [
            (SubclassRole::Super, 1),
            (SubclassRole::Aspect, caps.aspects),
            (SubclassRole::Fragment, caps.fragments),
        ] {
            picks.extend(
                ranked
                    .iter()
                    .filter(|(_, c)| c.subclass_role == Some(role))
                    .take(cap)
                    .map(|(_, c)| SubclassPick {
                        item_id: c.id.clone(),
                        name: c.name.clone(),
                        role,
                    }),
            );
        }

        tracing::debug!(element = %element, components = picks.len(), "subclass chosen");
        SubclassConfig {
            element: Some(element),
            components: picks,
        }
    }

    /// Fill one slot group, honoring locked slots and the exotic limit.
    fn fill_group(
        &self,
        slots: &[Slot],
        locked: &BTreeMap<Slot, &'a ItemDefinition>,
        intent: &BuildIntent,
        include_runner_ups: bool,
        diagnostics: &mut Vec<Diagnostic>,
        score: impl Fn(&ItemDefinition) -> CandidateScore,
    ) -> Vec<SlotAssignment> {
        let locked_exotic = slots
            .iter()
            .any(|s| locked.get(s).is_some_and(|item| item.is_exotic()));

        let ranked: BTreeMap<Slot, Vec<(CandidateScore, &ItemDefinition)>> = slots
            .iter()
            .filter(|s| !locked.contains_key(s))
            .map(|&slot| {
                let filter = CandidateFilter {
                    slot,
                    class: intent.target_class,
                    inventory_only: intent.use_inventory_only,
                };
                let mut candidates: Vec<(CandidateScore, &ItemDefinition)> = self
                    .catalog
                    .candidates(filter)
                    .into_iter()
                    .filter(|item| matches!(item.kind, ItemKind::Weapon | ItemKind::Armor))
                    .map(|item| (score(item), item))
                    .collect();
                rank(&mut candidates);
                for (c, _) in &candidates {
                    tracing::debug!(slot = %slot, item = %c.item_id, score = c.score, "candidate scored");
                }
                (slot, candidates)
            })
            .collect();

        let exotic_slot = if locked_exotic {
            None
        } else {
            choose_exotic_slot(&ranked)
        };

        slots
            .iter()
            .map(|&slot| {
                if let Some(&item) = locked.get(&slot) {
                    let mut chosen = score(item);
                    chosen.reasons.insert(0, "locked".to_string());
                    return SlotAssignment {
                        slot,
                        chosen: Some(chosen),
                        reasoning: "locked".to_string(),
                        locked: true,
                        runner_ups: Vec::new(),
                    };
                }

                let allow_exotic = exotic_slot == Some(slot);
                let candidates = ranked.get(&slot).map(Vec::as_slice).unwrap_or_default();

                // the exotic slot takes its best exotic even when a
                // non-exotic scores higher there
                let chosen = candidates
                    .iter()
                    .find(|(_, item)| item.is_exotic() == allow_exotic);

                let Some((chosen, _)) = chosen else {
                    tracing::debug!(slot = %slot, "no candidate for slot");
                    diagnostics.push(Diagnostic::NoCandidateFound { slot });
                    return SlotAssignment {
                        slot,
                        chosen: None,
                        reasoning: "no candidate available".to_string(),
                        locked: false,
                        runner_ups: Vec::new(),
                    };
                };

                let runner_ups = if include_runner_ups {
                    candidates
                        .iter()
                        .filter(|(_, item)| allow_exotic || !item.is_exotic())
                        .filter(|(c, _)| c.item_id != chosen.item_id)
                        .take(self.config.runner_up_count)
                        .map(|(c, _)| c.clone())
                        .collect()
                } else {
                    Vec::new()
                };

                let total = candidates.len();
                let reasoning = if chosen.reasons.is_empty() {
                    format!("best of {total} candidate(s)")
                } else {
                    format!("best of {total} candidate(s): {}", chosen.reasons.join(", "))
                };
                SlotAssignment {
                    slot,
                    chosen: Some(chosen.clone()),
                    reasoning,
                    locked: false,
                    runner_ups,
                }
            })
            .collect()
    }

    /// Report numeric targets the catalog cannot reach.
    fn check_constraints(&self, intent: &BuildIntent, diagnostics: &mut Vec<Diagnostic>) {
        if intent.numeric_constraints.is_empty() {
            return;
        }
        let limits = FeasibilityLimits::from_catalog(
            self.catalog,
            intent.target_class,
            u32::try_from(self.config.mod_caps.stat).unwrap_or(u32::MAX),
        );
        for (&channel, &required) in &intent.numeric_constraints {
            let achievable = limits.max_reachable(channel);
            if required > achievable {
                tracing::warn!(
                    channel = %channel,
                    required,
                    achievable,
                    "numeric constraint cannot be met"
                );
                diagnostics.push(Diagnostic::InfeasibleConstraint {
                    channel,
                    required,
                    achievable,
                });
            }
        }
    }
}

/// Where the group's exotic should go, if anywhere.
///
/// Compares the group total with no exotic against the total with the best
/// exotic in each slot. Ties favor placing the exotic, in slot order.
fn choose_exotic_slot(ranked: &BTreeMap<Slot, Vec<(CandidateScore, &ItemDefinition)>>) -> Option<Slot> {
    let best = |candidates: &[(CandidateScore, &ItemDefinition)], exotic: bool| -> Option<f64> {
        candidates
            .iter()
            .find(|(_, item)| item.is_exotic() == exotic)
            .map(|(c, _)| c.score)
    };
    let plain: BTreeMap<Slot, f64> = ranked
        .iter()
        .map(|(&slot, c)| (slot, best(c, false).unwrap_or(0.0)))
        .collect();
    let plain_total: f64 = plain.values().sum();

    let mut choice: Option<(Slot, f64)> = None;
    for (&slot, candidates) in ranked {
        let Some(exotic_score) = best(candidates, true) else {
            continue;
        };
        let total = plain_total - plain.get(&slot).copied().unwrap_or(0.0) + exotic_score;
        if choice.map_or(true, |(_, best_total)| total > best_total) {
            choice = Some((slot, total));
        }
    }

    match choice {
        Some((slot, total)) if total >= plain_total => Some(slot),
        _ => None,
    }
}

fn candidate(item: &ItemDefinition, score: f64, reasons: Vec<String>) -> CandidateScore {
    CandidateScore {
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        score,
        reasons,
    }
}

/// The piece's contributions to the archetype's focus channels.
fn piece_reasons(item: &ItemDefinition, archetype: &Archetype) -> Vec<String> {
    let mut reasons: Vec<String> = archetype
        .focus_channels()
        .into_iter()
        .filter_map(|ch| {
            let amount = item.stat_contributions.get(&ch).copied().unwrap_or(0);
            (amount > 0).then(|| format!("+{amount} {ch}"))
        })
        .collect();
    if item.quality.is_top_tier() {
        reasons.push("top-tier quality".to_string());
    }
    if item.is_exotic() {
        reasons.push("exotic".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassAffinity, Rarity, SlotGroup, WeaponType};
    use crate::intent::Playstyle;
    use crate::item_id::ItemId;
    use crate::stats::StatChannel;

    fn scored(id: &str, score: f64) -> CandidateScore {
        CandidateScore {
            item_id: ItemId::new(id),
            item_name: id.to_string(),
            score,
            reasons: Vec::new(),
        }
    }

    fn weapon(id: &str, slot: Slot, weapon_type: WeaponType, rarity: Rarity) -> ItemDefinition {
        ItemDefinition::new(id, id, ItemKind::Weapon)
            .with_slot(slot)
            .with_weapon_type(weapon_type)
            .with_rarity(rarity)
    }

    fn component(id: &str, element: DamageElement, role: SubclassRole) -> ItemDefinition {
        ItemDefinition::new(id, id, ItemKind::SubclassComponent)
            .with_element(element)
            .with_role(role)
    }

    fn assemble(catalog: &CatalogIndex, intent: &BuildIntent) -> Build {
        let content = ContentTables::builtin().unwrap();
        let config = EngineConfig::default();
        let archetype = content.archetypes[0].clone();
        Assembler::new(catalog, &content, &config).assemble(intent, &archetype, false)
    }

    #[test]
    fn test_exotic_goes_where_it_gains_most() {
        let a = ItemDefinition::new("a", "a", ItemKind::Armor);
        let exotic = ItemDefinition::new("x", "x", ItemKind::Armor).with_rarity(Rarity::Exotic);
        let mut ranked = BTreeMap::new();
        ranked.insert(Slot::Helmet, vec![(scored("x1", 12.0), &exotic), (scored("a1", 10.0), &a)]);
        ranked.insert(Slot::Arms, vec![(scored("x2", 30.0), &exotic), (scored("a2", 10.0), &a)]);
        assert_eq!(choose_exotic_slot(&ranked), Some(Slot::Arms));
    }

    #[test]
    fn test_exotic_skipped_when_it_lowers_total() {
        let a = ItemDefinition::new("a", "a", ItemKind::Armor);
        let exotic = ItemDefinition::new("x", "x", ItemKind::Armor).with_rarity(Rarity::Exotic);
        let mut ranked = BTreeMap::new();
        ranked.insert(Slot::Helmet, vec![(scored("a1", 20.0), &a), (scored("x1", 5.0), &exotic)]);
        assert_eq!(choose_exotic_slot(&ranked), None);
    }

    #[test]
    fn test_one_exotic_per_group() {
        let catalog = CatalogIndex::from_items(vec![
            weapon("k_exotic", Slot::Kinetic, WeaponType::HandCannon, Rarity::Exotic),
            weapon("k_legend", Slot::Kinetic, WeaponType::HandCannon, Rarity::Legendary),
            weapon("e_exotic", Slot::Energy, WeaponType::SniperRifle, Rarity::Exotic),
            weapon("e_legend", Slot::Energy, WeaponType::SniperRifle, Rarity::Legendary),
            weapon("p_exotic", Slot::Power, WeaponType::RocketLauncher, Rarity::Exotic),
        ])
        .unwrap();
        let build = assemble(&catalog, &BuildIntent::default());

        assert_eq!(build.exotic_count(SlotGroup::Weapon, &catalog), 1);
        let filled = build.weapons.iter().filter(|a| a.chosen.is_some()).count();
        let empty = build
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::NoCandidateFound { .. }))
            .count();
        assert_eq!(filled + empty, 3);
    }

    #[test]
    fn test_empty_slot_is_reported() {
        let catalog = CatalogIndex::from_items(vec![ItemDefinition::new("helm", "Helm", ItemKind::Armor)
            .with_slot(Slot::Helmet)
            .with_stat(StatChannel::Resilience, 10)])
        .unwrap();
        let build = assemble(&catalog, &BuildIntent::default());

        assert_eq!(build.chosen(Slot::Helmet), Some(&ItemId::new("helm")));
        let arms = build.assignment(Slot::Arms).unwrap();
        assert!(arms.chosen.is_none());
        assert_eq!(arms.reasoning, "no candidate available");
        assert!(build
            .diagnostics
            .contains(&Diagnostic::NoCandidateFound { slot: Slot::Arms }));
    }

    #[test]
    fn test_locked_items_validated() {
        let catalog = CatalogIndex::from_items(vec![
            ItemDefinition::new("titan_helm", "Titan Helm", ItemKind::Armor)
                .with_slot(Slot::Helmet)
                .with_class(ClassAffinity::Titan),
            ItemDefinition::new("plain_helm", "Plain Helm", ItemKind::Armor).with_slot(Slot::Helmet),
            ItemDefinition::new("stock_arms", "Stock Arms", ItemKind::Armor).with_slot(Slot::Arms),
        ])
        .unwrap();
        let intent = BuildIntent {
            target_class: ClassAffinity::Hunter,
            locked_items: vec![
                ItemId::new("titan_helm"),
                ItemId::new("missing"),
                ItemId::new("stock_arms"),
            ],
            ..BuildIntent::default()
        };
        let build = assemble(&catalog, &intent);

        assert!(build.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::LockedItemRejected { item_id, .. } if item_id.as_str() == "titan_helm"
        )));
        assert!(build.diagnostics.contains(&Diagnostic::UnknownLockedItem {
            item_id: ItemId::new("missing")
        }));
        let arms = build.assignment(Slot::Arms).unwrap();
        assert!(arms.locked);
        assert_eq!(arms.reasoning, "locked");
        assert_eq!(build.chosen(Slot::Helmet), Some(&ItemId::new("plain_helm")));
    }

    #[test]
    fn test_subclass_follows_playstyle_and_caps() {
        let mut items = vec![
            component("arc_super", DamageElement::Arc, SubclassRole::Super),
            component("solar_super", DamageElement::Solar, SubclassRole::Super),
            component("solar_super_2", DamageElement::Solar, SubclassRole::Super),
        ];
        for i in 0..4 {
            items.push(component(&format!("solar_aspect_{i}"), DamageElement::Solar, SubclassRole::Aspect));
        }
        let catalog = CatalogIndex::from_items(items).unwrap();
        let intent = BuildIntent {
            playstyle: Playstyle::Dps,
            ..BuildIntent::default()
        };
        let build = assemble(&catalog, &intent);

        assert_eq!(build.subclass.element, Some(DamageElement::Solar));
        let supers = build
            .subclass
            .components
            .iter()
            .filter(|c| c.role == SubclassRole::Super)
            .count();
        let aspects = build
            .subclass
            .components
            .iter()
            .filter(|c| c.role == SubclassRole::Aspect)
            .count();
        assert_eq!(supers, 1);
        assert_eq!(aspects, 2);
    }

    #[test]
    fn test_requested_element_beats_playstyle() {
        let catalog = CatalogIndex::from_items(vec![
            component("arc_super", DamageElement::Arc, SubclassRole::Super),
            component("solar_super", DamageElement::Solar, SubclassRole::Super),
        ])
        .unwrap();
        let intent = BuildIntent {
            element: Some(DamageElement::Arc),
            playstyle: Playstyle::Dps,
            ..BuildIntent::default()
        };
        let build = assemble(&catalog, &intent);
        assert_eq!(build.subclass.element, Some(DamageElement::Arc));
    }
}
