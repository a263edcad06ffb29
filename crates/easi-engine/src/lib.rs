use easi_core::{enumerate_paths, evaluate, EvaluatedPath, EvaluatedStep, Facility, Path, Ranking, StructureError, Task, F};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub parallel: bool,        // Evaluate paths on the rayon pool
    pub label_separator: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            label_separator: easi_core::LABEL_SEPARATOR.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn sequential() -> Self {
        Self { parallel: false, ..Self::default() }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.label_separator = separator.into();
        self
    }
}

/// One line of the ranking
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedPath {
    pub rank: usize, // 1-based
    pub label: String,
    pub overall_interruption: F,
}

/// Most vulnerable path with every intermediate value
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MvpDetail {
    pub label: String,
    pub overall_interruption: F,
    pub steps: Vec<EvaluatedStep>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub n_layers: usize,
    pub ranked_paths: Vec<RankedPath>,
    pub mvp: MvpDetail,
}

/// Result of assessing a whole facility
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assessment {
    Ranked(Report),
    /// The facility has no layers
    NoPath,
    Invalid { reason: StructureError },
}

impl Assessment {
    pub fn report(&self) -> Option<&Report> {
        match self {
            Assessment::Ranked(report) => Some(report),
            _ => None,
        }
    }
}

/// Why a hand-picked path could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncompleteSelection {
    #[error("facility has no layers")]
    NoLayers,
    #[error("invalid facility: {reason}")]
    Invalid { reason: StructureError },
    #[error("expected one choice per layer ({expected}), got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("no task chosen for layer {layer}")]
    MissingChoice { layer: usize },
    #[error("layer {layer} has no task with id {id:?}")]
    UnknownTask { layer: usize, id: String },
}

/// Result of evaluating one explicit choice of tasks
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Selection {
    Complete { label: String, path: EvaluatedPath },
    Incomplete { reason: IncompleteSelection },
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        matches!(self, Selection::Complete { .. })
    }
}

/// Scores and ranks adversary paths through a facility
#[derive(Clone, Debug, Default)]
pub struct Engine {
    pub config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate every path, in enumeration order.
    pub fn run_paths(&self, facility: &Facility) -> Vec<EvaluatedPath> {
        let globals = &facility.globals;
        let paths: Vec<Path> = enumerate_paths(&facility.layers).collect();

        let evaluated: Vec<EvaluatedPath> = if self.config.parallel {
            // collect() on an indexed parallel iterator keeps input order
            paths.par_iter().map(|p| evaluate(&p.tasks, globals)).collect()
        } else {
            paths.iter().map(|p| evaluate(&p.tasks, globals)).collect()
        };

        for path in &evaluated {
            debug!(
                path = %path.label(&self.config.label_separator),
                p_interrupt = path.overall_interruption,
                "evaluated path"
            );
        }
        evaluated
    }

    /// Enumerate, evaluate and rank every path through `facility`.
    pub fn assess(&self, facility: &Facility) -> Assessment {
        if let Err(reason) = facility.validate() {
            return Assessment::Invalid { reason };
        }
        if facility.layers.is_empty() {
            return Assessment::NoPath;
        }

        let ranking = Ranking::new(self.run_paths(facility));
        let separator = &self.config.label_separator;

        let Some(mvp) = ranking.mvp() else {
            return Assessment::NoPath;
        };
        let mvp = MvpDetail {
            label: mvp.label(separator),
            overall_interruption: mvp.overall_interruption,
            steps: mvp.steps.clone(),
        };
        info!(
            layers = facility.n_layers(),
            paths = ranking.len(),
            mvp = %mvp.label,
            p_interrupt = mvp.overall_interruption,
            "assessment complete"
        );

        let ranked_paths = ranking
            .paths
            .iter()
            .enumerate()
            .map(|(i, p)| RankedPath {
                rank: i + 1,
                label: p.label(separator),
                overall_interruption: p.overall_interruption,
            })
            .collect();

        Assessment::Ranked(Report {
            n_layers: facility.n_layers(),
            ranked_paths,
            mvp,
        })
    }

    /// Evaluate one task id per layer without enumerating the rest.
    pub fn evaluate_selection<S: AsRef<str>>(&self, facility: &Facility, selected: &[S]) -> Selection {
        match resolve_selection(facility, selected) {
            Ok(tasks) => {
                let path = evaluate(&tasks, &facility.globals);
                Selection::Complete {
                    label: path.label(&self.config.label_separator),
                    path,
                }
            }
            Err(reason) => {
                debug!(%reason, "incomplete selection");
                Selection::Incomplete { reason }
            }
        }
    }
}

fn resolve_selection<'a, S: AsRef<str>>(
    facility: &'a Facility,
    selected: &[S],
) -> Result<Vec<&'a Task>, IncompleteSelection> {
    if facility.layers.is_empty() {
        return Err(IncompleteSelection::NoLayers);
    }
    facility
        .validate()
        .map_err(|reason| IncompleteSelection::Invalid { reason })?;
    if selected.len() != facility.layers.len() {
        return Err(IncompleteSelection::WrongLength {
            expected: facility.layers.len(),
            got: selected.len(),
        });
    }

    facility
        .layers
        .iter()
        .zip(selected)
        .enumerate()
        .map(|(i, (layer, id))| {
            let id: &str = id.as_ref();
            let id = id.trim();
            if id.is_empty() {
                return Err(IncompleteSelection::MissingChoice { layer: i + 1 });
            }
            layer.find(id).ok_or_else(|| IncompleteSelection::UnknownTask {
                layer: i + 1,
                id: id.to_string(),
            })
        })
        .collect()
}

/// Assess with a one-off engine.
pub fn assess(facility: &Facility, config: &EngineConfig) -> Assessment {
    Engine::new(config.clone()).assess(facility)
}

/// Evaluate a selection with a one-off engine.
pub fn evaluate_selection<S: AsRef<str>>(facility: &Facility, selected: &[S], config: &EngineConfig) -> Selection {
    Engine::new(config.clone()).evaluate_selection(facility, selected)
}
