//! Ordered strategy pipeline
//!
//! Provides [`StrategyPipeline`]: strategies run strictly in insertion
//! order, each consuming the previous one's output.

use crate::biosphere::{DropUnspecifiedSubcategories, SetBiosphereType};
use crate::dataset::MethodDataset;
use crate::link::{LinkField, LinkIterableByFields};
use crate::strategy::{Strategy, StrategyError};
use crate::units::NormalizeUnits;
use lcia_store::FlowDatabase;
use std::time::Instant;

/// Ordered list of strategies
#[derive(Debug, Default)]
pub struct StrategyPipeline {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyPipeline {
    /// Create empty pipeline
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Fixed LCIA pipeline: normalize units, set biosphere type, drop
    /// unspecified subcategories, link against `database` by `fields`
    ///
    /// # Errors
    /// Failures building the link candidate table.
    pub fn lcia(
        db: &dyn FlowDatabase,
        database: &str,
        fields: &[LinkField],
        relink: bool,
    ) -> Result<Self, StrategyError> {
        let link = LinkIterableByFields::from_database(db, database, fields)?.with_relink(relink);
        Ok(Self::new()
            .with(NormalizeUnits::new())
            .with(SetBiosphereType)
            .with(DropUnspecifiedSubcategories)
            .with(link))
    }

    /// Append a strategy
    #[inline]
    #[must_use]
    pub fn with(mut self, strategy: impl Strategy + 'static) -> Self {
        self.push(strategy);
        self
    }

    /// Append a strategy
    pub fn push(&mut self, strategy: impl Strategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Strategy names in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Number of strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if pipeline is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run all strategies in order
    ///
    /// Each successfully applied strategy name is appended to `applied`.
    ///
    /// # Errors
    /// The first strategy failure; later strategies do not run.
    pub fn run(
        &self,
        mut data: Vec<MethodDataset>,
        applied: &mut Vec<String>,
    ) -> Result<Vec<MethodDataset>, StrategyError> {
        for strategy in &self.strategies {
            let start = Instant::now();
            data = strategy.apply(data).map_err(|e| {
                tracing::error!(strategy = strategy.name(), error = %e, "strategy failed");
                e
            })?;
            tracing::info!(
                strategy = strategy.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "applied strategy"
            );
            applied.push(strategy.name().to_string());
        }
        Ok(data)
    }
}
