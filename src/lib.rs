//! # buildsmith - Deterministic, Explainable Build Recommendation Engine
//!
//! A recommendation and scoring engine for looter RPG loadouts that provides:
//! - **Deterministic** output (same catalog, content and request → byte-identical JSON)
//! - **Data-driven** rules (triggers, effects, patterns and conflicts live in RON tables)
//! - **Explainable** results (every slot pick carries reasons, every score a breakdown)
//! - **Thread-safe** sharing (an [`Engine`] is immutable once built)
//!
//! ## Core Concepts
//!
//! ### Recommendation Pipeline
//!
//! A request flows through a fixed pipeline:
//!
//! ```text
//! [free text] → [BuildIntent] → [Archetype] → [Build] → [ScoreReport]
//! ```
//!
//! 1. **Intent** reads class, element, activity, playstyle and stat targets from text
//! 2. **Archetypes** rank stat profiles against the intent
//! 3. **Assembly** fills every slot, honoring locks and one exotic per slot group
//! 4. **Scoring** rates the build on six axes and explains strengths and weaknesses
//!
//! ### Key Features
//!
//! - **Stat Breakpoints**: tiers, efficiency and unlocked effects per channel
//! - **Trigger Chains**: effects that feed triggers, with loop detection
//! - **Conflict Resolution**: overlapping effects resolve by declared rules
//! - **Diagnostics**: missing candidates and unreachable targets are reported, not fatal
//!
//! ## Example
//!
//! ```rust
//! use buildsmith::*;
//!
//! let engine = Engine::from_items(vec![
//!     ItemDefinition::new("sunshot", "Sunshot", ItemKind::Weapon)
//!         .with_slot(Slot::Energy)
//!         .with_weapon_type(WeaponType::HandCannon)
//!         .with_element(DamageElement::Solar),
//!     ItemDefinition::new("sturdy_helm", "Sturdy Helm", ItemKind::Armor)
//!         .with_slot(Slot::Helmet)
//!         .with_stat(StatChannel::Resilience, 20),
//! ])
//! .unwrap();
//!
//! let result = engine.recommend(&BuildRequest::new("solar titan for raids"));
//! assert_eq!(result.intent.activity, Activity::Raid);
//! assert_eq!(result.build.chosen(Slot::Helmet).map(|id| id.as_str()), Some("sturdy_helm"));
//! assert!(result.score.overall_score <= 100);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Item definitions, manifest normalization and the catalog index
//! - [`stats`] - Stat channels, aggregation and breakpoints
//! - [`intent`] - Free-text intent parsing
//! - [`rules`] - Trigger/effect rule base, stacking, conflicts and chains
//! - [`archetype`] - Stat archetypes, piece scoring and feasibility
//! - [`weapon`], [`activity`], [`mods`] - Weapon, activity and mod tables
//! - [`assembler`] - Slot-by-slot build assembly
//! - [`synergy`] - Synergy and conflict detection
//! - [`scorer`] - Composite scoring
//! - [`engine`] - The request façade
//! - [`content`], [`config`] - Content tables and tuning configuration
//! - [`error`] - Error types

pub mod activity;
pub mod archetype;
pub mod assembler;
pub mod build;
pub mod catalog;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod intent;
pub mod item_id;
pub mod mods;
pub mod rules;
pub mod scorer;
pub mod stats;
pub mod synergy;
pub mod weapon;

// Re-export main types for convenience
pub use build::{Build, Diagnostic, SlotAssignment, Synergy, SynergyKind};
pub use config::EngineConfig;
pub use content::ContentTables;
pub use engine::{BuildRequest, Engine, RecommendationResult, ScoredBuild};
pub use error::EngineError;
pub use item_id::ItemId;
pub use scorer::ScoreReport;

// Re-export catalog and intent vocabulary
pub use catalog::{
    CatalogIndex, ClassAffinity, DamageElement, ItemDefinition, ItemKind, Rarity, Slot, SlotGroup,
    WeaponType,
};
pub use intent::{Activity, BuildIntent, Playstyle, RequestOptions};
pub use stats::{StatChannel, StatTotals};
