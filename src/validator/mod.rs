//! Species validation
//!
//! `GbifValidator` turns the two lookup calls into a status; every failure
//! becomes `LOOKUP_ERROR` with the message kept. `MemoizedValidator` makes
//! sure a name is looked up at most once per run.

mod memo;

pub use memo::{MemoizedValidator, ValidationRun};

use crate::config::GbifConfig;
use crate::error::Result;
use crate::gbif::{OccurrenceQuery, SpeciesLookup};
use species_map_common::SpeciesValidationResult;
use std::future::Future;
use tracing::{debug, warn};

/// Given a name, report status, taxon key and regional occurrence count.
/// Never fails; errors are part of the result.
pub trait SpeciesValidator: Send + Sync {
    fn validate(
        &self,
        scientific_name: &str,
    ) -> impl Future<Output = SpeciesValidationResult> + Send;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorConfig {
    /// Country filter for the occurrence count; global when `None`
    pub region: Option<String>,
    /// Records requested with the count query (0 = count only)
    pub record_limit: u32,
}

impl ValidatorConfig {
    pub fn from_gbif(config: &GbifConfig) -> Self {
        Self {
            region: config.region.clone(),
            record_limit: 0,
        }
    }
}

pub struct GbifValidator<L> {
    lookup: L,
    config: ValidatorConfig,
}

impl<L: SpeciesLookup> GbifValidator<L> {
    pub fn new(lookup: L, config: ValidatorConfig) -> Self {
        Self { lookup, config }
    }

    async fn try_validate(&self, name: &str) -> Result<SpeciesValidationResult> {
        let matched = self.lookup.match_name(name).await?;
        let Some(taxon_key) = matched.accepted_key() else {
            debug!(
                species = name,
                status = ?matched.status,
                match_type = ?matched.match_type,
                "name not accepted"
            );
            return Ok(SpeciesValidationResult::not_found(name));
        };

        let query = OccurrenceQuery {
            taxon_key,
            country: self.config.region.clone(),
            limit: self.config.record_limit,
            ..Default::default()
        };
        let page = self.lookup.search_occurrences(&query).await?;

        Ok(SpeciesValidationResult::accepted(name, taxon_key, page.count))
    }
}

impl<L: SpeciesLookup> SpeciesValidator for GbifValidator<L> {
    async fn validate(&self, scientific_name: &str) -> SpeciesValidationResult {
        match self.try_validate(scientific_name).await {
            Ok(result) => result,
            Err(e) => {
                warn!(species = scientific_name, error = %e, "species lookup failed");
                SpeciesValidationResult::lookup_error(scientific_name, e.to_string())
            }
        }
    }
}
