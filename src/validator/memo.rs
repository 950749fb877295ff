//! Per-run memoization and the sequential validation loop

use super::SpeciesValidator;
use species_map_common::SpeciesValidationResult;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Results of a validation loop; `cancelled` when it stopped early
#[derive(Debug, Clone, Default)]
pub struct ValidationRun {
    pub results: Vec<SpeciesValidationResult>,
    pub cancelled: bool,
}

pub struct MemoizedValidator<V> {
    inner: V,
    cache: HashMap<String, SpeciesValidationResult>,
}

impl<V: SpeciesValidator> MemoizedValidator<V> {
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// Cached result, or one call to the inner validator
    pub async fn validate(&mut self, name: &str) -> SpeciesValidationResult {
        if let Some(hit) = self.cache.get(name) {
            return hit.clone();
        }
        let result = self.inner.validate(name).await;
        self.cache.insert(name.to_string(), result.clone());
        result
    }

    /// Validate names in order, one result per distinct name.
    ///
    /// Stops before the next name, or abandons the call in flight, once
    /// `cancel` fires; results completed so far are kept.
    pub async fn validate_all<F>(
        &mut self,
        names: &[String],
        cancel: &CancellationToken,
        mut on_result: F,
    ) -> ValidationRun
    where
        F: FnMut(&SpeciesValidationResult),
    {
        let mut run = ValidationRun::default();
        let mut seen = std::collections::HashSet::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            if cancel.is_cancelled() {
                run.cancelled = true;
                break;
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.validate(name) => Some(result),
            };

            match result {
                Some(result) => {
                    on_result(&result);
                    run.results.push(result);
                }
                None => {
                    run.cancelled = true;
                    break;
                }
            }
        }

        run
    }

    /// Number of distinct names looked up
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}
