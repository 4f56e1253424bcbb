//! The engine façade.
//!
//! An [`Engine`] owns the catalog, content tables and configuration, all
//! immutable once built. Each request runs `parse → assemble → score`
//! without touching shared state, so one engine can serve many threads.

use crate::archetype::{feasibility, recommend, Archetype, FeasibilityLimits};
use crate::assembler::Assembler;
use crate::build::Build;
use crate::catalog::{CatalogIndex, ItemDefinition};
use crate::config::EngineConfig;
use crate::content::ContentTables;
use crate::error::EngineError;
use crate::intent::{BuildIntent, IntentParser, RequestOptions};
use crate::scorer::{CompositeScorer, ScoreReport};
use serde::{Deserialize, Serialize};

/// A build request: free text plus explicit options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub text: String,
    #[serde(default)]
    pub options: RequestOptions,
}

impl BuildRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// A build with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBuild {
    pub build: Build,
    pub score: ScoreReport,
}

/// Everything returned for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub intent: BuildIntent,
    pub build: Build,
    pub score: ScoreReport,
    /// One build per alternative archetype, when requested.
    pub alternatives: Vec<ScoredBuild>,
}

/// Build recommendation engine.
///
/// # Examples
///
/// ```rust
/// use buildsmith::catalog::CatalogIndex;
/// use buildsmith::{BuildRequest, Engine, ItemDefinition, ItemKind, Rarity, Slot, WeaponType};
///
/// let catalog = CatalogIndex::from_items(vec![
///     ItemDefinition::new("gjallarhorn", "Gjallarhorn", ItemKind::Weapon)
///         .with_slot(Slot::Power)
///         .with_weapon_type(WeaponType::RocketLauncher)
///         .with_rarity(Rarity::Exotic),
/// ])
/// .unwrap();
/// let engine = Engine::with_defaults(catalog).unwrap();
///
/// let result = engine.recommend(&BuildRequest::new("raid dps build"));
/// assert_eq!(result.build.chosen(Slot::Power).map(|id| id.as_str()), Some("gjallarhorn"));
/// assert!(result.score.overall_score <= 100);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: CatalogIndex,
    content: ContentTables,
    config: EngineConfig,
    parser: IntentParser,
    /// Used when ranking yields nothing; the content tables always hold one.
    default_archetype: Archetype,
}

impl Engine {
    /// Build an engine from explicit parts.
    pub fn new(
        catalog: CatalogIndex,
        content: ContentTables,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        config.validate()?;
        let default_archetype = content.archetypes.first().cloned().ok_or_else(|| {
            EngineError::Configuration("at least one archetype is required".to_string())
        })?;
        let parser = IntentParser::new(&catalog);

        tracing::info!(
            items = catalog.len(),
            rules_version = content.rules.version(),
            archetypes = content.archetypes.len(),
            "engine ready"
        );
        Ok(Self {
            catalog,
            content,
            config,
            parser,
            default_archetype,
        })
    }

    /// Engine with the embedded content tables and default configuration.
    pub fn with_defaults(catalog: CatalogIndex) -> Result<Self, EngineError> {
        Self::new(catalog, ContentTables::builtin()?, EngineConfig::default())
    }

    /// Engine over plain item definitions.
    pub fn from_items(items: impl IntoIterator<Item = ItemDefinition>) -> Result<Self, EngineError> {
        Self::with_defaults(CatalogIndex::from_items(items)?)
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read a request into an intent.
    pub fn parse(&self, request: &BuildRequest) -> BuildIntent {
        self.parser.parse(&request.text, &request.options)
    }

    /// Archetypes ranked for `intent`, best first.
    fn ranked_archetypes(&self, intent: &BuildIntent) -> Vec<&Archetype> {
        match recommend(&self.content.archetypes, intent, self.content.archetypes.len()) {
            Some(rec) => std::iter::once(rec.primary).chain(rec.alternatives).collect(),
            None => vec![&self.default_archetype],
        }
    }

    /// The best-ranked archetype the catalog can support, else the best-ranked one.
    fn choose_archetype<'a>(&'a self, ranked: &[&'a Archetype], intent: &BuildIntent) -> &'a Archetype {
        let limits = FeasibilityLimits::from_catalog(
            &self.catalog,
            intent.target_class,
            u32::try_from(self.config.mod_caps.stat).unwrap_or(u32::MAX),
        );
        let chosen = ranked
            .iter()
            .copied()
            .find(|a| {
                let result = feasibility(a, &limits);
                if !result.feasible {
                    tracing::debug!(
                        archetype = %a.name,
                        unmet = ?result.unmet_channels,
                        "archetype not reachable with this catalog"
                    );
                }
                result.feasible
            })
            .or_else(|| ranked.first().copied());
        chosen.unwrap_or(&self.default_archetype)
    }

    /// Assemble a build for an intent and archetype.
    pub fn assemble(&self, intent: &BuildIntent, archetype: &Archetype, include_runner_ups: bool) -> Build {
        Assembler::new(&self.catalog, &self.content, &self.config).assemble(intent, archetype, include_runner_ups)
    }

    /// Score a build for an intent.
    pub fn score(&self, build: &Build, intent: &BuildIntent) -> ScoreReport {
        CompositeScorer::new(&self.catalog, &self.content, &self.config).score(build, intent)
    }

    /// Parse, assemble and score.
    pub fn recommend(&self, request: &BuildRequest) -> RecommendationResult {
        let intent = self.parse(request);
        let ranked = self.ranked_archetypes(&intent);
        let archetype = self.choose_archetype(&ranked, &intent);
        let include_alternatives = request.options.include_alternatives;

        let build = self.assemble(&intent, archetype, include_alternatives);
        let score = self.score(&build, &intent);

        let alternatives = if include_alternatives {
            ranked
                .iter()
                .filter(|a| a.name != archetype.name)
                .take(self.config.alternative_count)
                .map(|a| {
                    let build = self.assemble(&intent, a, false);
                    let score = self.score(&build, &intent);
                    ScoredBuild { build, score }
                })
                .collect()
        } else {
            Vec::new()
        };

        tracing::info!(
            archetype = %archetype.name,
            overall = score.overall_score,
            diagnostics = build.diagnostics.len(),
            alternatives = alternatives.len(),
            "recommendation ready"
        );

        RecommendationResult {
            intent,
            build,
            score,
            alternatives,
        }
    }
}
