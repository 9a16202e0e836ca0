//! Parallel validation of many notation strings.
//!
//! Every input is decoded and replayed independently on the rayon pool; the per-input
//! outcomes are merged only after all of them have finished, so one failure never stops
//! the others.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::GameResult;
use crate::game::Game;
use crate::notation;
use crate::variants::VariantTemplates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the input in the batch.
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub total: usize,
    pub valid: usize,
    /// Sorted by `index`.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn all_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decodes one record and replays all of its moves, `config` filling unset rules.
pub fn validate_one<T: VariantTemplates>(
    text: &str,
    templates: &T,
    config: &EngineConfig,
) -> GameResult<Game> {
    notation::decode(text)?.to_game_with(templates, config)
}

/// A panic while replaying one record fails that record only.
fn outcome<T: VariantTemplates>(
    index: usize,
    text: &str,
    templates: &T,
    config: &EngineConfig,
) -> Option<String> {
    match panic::catch_unwind(AssertUnwindSafe(|| validate_one(text, templates, config))) {
        Ok(Ok(game)) => {
            debug!(index, plies = game.history().len(), "record valid");
            None
        }
        Ok(Err(e)) => Some(e.to_string()),
        Err(_) => {
            warn!(index, "replay aborted");
            Some("internal error while replaying the record".to_string())
        }
    }
}

/// Validates every input on the current rayon pool.
pub fn validate_batch<T>(inputs: &[String], templates: &T, config: &EngineConfig) -> BatchReport
where
    T: VariantTemplates + Sync,
{
    let outcomes: Vec<(usize, Option<String>)> = inputs
        .par_iter()
        .enumerate()
        .map(|(index, text)| (index, outcome(index, text, templates, config)))
        .collect();

    let mut report = BatchReport {
        total: inputs.len(),
        ..BatchReport::default()
    };
    for (index, outcome) in outcomes {
        match outcome {
            None => report.valid += 1,
            Some(error) => report.failures.push(BatchFailure { index, error }),
        }
    }
    info!(
        total = report.total,
        valid = report.valid,
        failed = report.failures.len(),
        "batch validated"
    );
    report
}

/// Like [`validate_batch`], on a dedicated pool of `threads` workers (`0` lets rayon decide).
pub fn validate_batch_with_threads<T>(
    inputs: &[String],
    templates: &T,
    config: &EngineConfig,
    threads: usize,
) -> Result<BatchReport, rayon::ThreadPoolBuildError>
where
    T: VariantTemplates + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    Ok(pool.install(|| validate_batch(inputs, templates, config)))
}
