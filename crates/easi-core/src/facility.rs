use crate::task::{GlobalParameters, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Candidate tasks for one stage of the intrusion. Exactly one is taken per path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layer {
    pub tasks: Vec<Task>,
}

impl Layer {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

impl From<Vec<Task>> for Layer {
    fn from(tasks: Vec<Task>) -> Self {
        Layer::new(tasks)
    }
}

/// Structural problems that leave no computable path.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureError {
    #[error("layer {layer} has no tasks")]
    EmptyLayer { layer: usize },
    #[error("layer {layer} has more than one task with id {id:?}")]
    DuplicateId { layer: usize, id: String },
}

/// Input snapshot: global parameters plus the ordered layers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default)]
    pub globals: GlobalParameters,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Facility {
    pub fn new(globals: GlobalParameters, layers: Vec<Layer>) -> Self {
        Self { globals, layers }
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of distinct paths, saturating on overflow.
    pub fn n_paths(&self) -> usize {
        if self.layers.is_empty() {
            return 0;
        }
        self.layers
            .iter()
            .fold(1usize, |acc, layer| acc.saturating_mul(layer.len()))
    }

    /// Give unnamed tasks an id from their position: `"L"` in a single-task
    /// layer, `"L.i"` otherwise (both 1-based). A positional id already taken
    /// in the layer gets a `-2`, `-3`, ... suffix.
    pub fn assign_missing_ids(&mut self) {
        for (layer_index, layer) in self.layers.iter_mut().enumerate() {
            let shared = layer.len() > 1;
            let mut taken: HashSet<String> = layer
                .tasks
                .iter()
                .map(|t| t.id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();

            for (task_index, task) in layer.tasks.iter_mut().enumerate() {
                if !task.id.trim().is_empty() {
                    continue;
                }
                let base = if shared {
                    format!("{}.{}", layer_index + 1, task_index + 1)
                } else {
                    format!("{}", layer_index + 1)
                };
                let mut id = base.clone();
                let mut n = 2;
                while taken.contains(&id) {
                    id = format!("{}-{}", base, n);
                    n += 1;
                }
                if id != base {
                    tracing::warn!(layer = layer_index + 1, %base, %id, "positional id already in use");
                }
                taken.insert(id.clone());
                task.id = id;
            }
        }
    }

    /// Reject layers without candidates and repeated ids within a layer.
    /// Blank ids are not compared. Layer numbers are 1-based.
    pub fn validate(&self) -> Result<(), StructureError> {
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(StructureError::EmptyLayer { layer: i + 1 });
            }
            let mut seen = HashSet::new();
            for task in &layer.tasks {
                let id = task.id.trim();
                if !id.is_empty() && !seen.insert(id) {
                    return Err(StructureError::DuplicateId {
                        layer: i + 1,
                        id: id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TimingLocation;

    fn unnamed() -> Task {
        Task::new("", 0.5, TimingLocation::Beginning, 1.0, 0.0)
    }

    #[test]
    fn test_assign_missing_ids() {
        let mut facility = Facility::new(
            GlobalParameters::default(),
            vec![
                Layer::new(vec![unnamed(), unnamed()]),
                Layer::new(vec![unnamed()]),
                Layer::new(vec![unnamed(), Task::new("gate", 0.1, TimingLocation::End, 1.0, 0.0)]),
            ],
        );
        facility.assign_missing_ids();

        let ids: Vec<Vec<&str>> = facility
            .layers
            .iter()
            .map(|l| l.tasks.iter().map(|t| t.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["1.1", "1.2"], vec!["2"], vec!["3.1", "gate"]]);
    }

    #[test]
    fn test_path_count() {
        let facility = Facility::new(
            GlobalParameters::default(),
            vec![
                Layer::new(vec![unnamed(), unnamed(), unnamed()]),
                Layer::new(vec![unnamed(), unnamed()]),
            ],
        );
        assert_eq!(facility.n_paths(), 6);
        assert_eq!(Facility::default().n_paths(), 0);
    }

    #[test]
    fn test_validate_empty_layer() {
        let facility = Facility::new(
            GlobalParameters::default(),
            vec![Layer::new(vec![unnamed()]), Layer::default()],
        );
        assert_eq!(facility.validate(), Err(StructureError::EmptyLayer { layer: 2 }));
    }

    #[test]
    fn test_generated_ids_avoid_explicit_ones() {
        let mut facility = Facility::new(
            GlobalParameters::default(),
            vec![Layer::new(vec![
                Task::new("1.2", 0.9, TimingLocation::Beginning, 1.0, 0.0),
                unnamed(),
                Task::new("1.2-2", 0.3, TimingLocation::Beginning, 1.0, 0.0),
            ])],
        );
        facility.assign_missing_ids();

        let ids: Vec<&str> = facility.layers[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1.2", "1.2-3", "1.2-2"]);
        assert_eq!(facility.validate(), Ok(()));
        assert_eq!(facility.layers[0].find("1.2-3").unwrap().detection_probability, 0.5);
    }

    #[test]
    fn test_validate_duplicate_id() {
        let task = |id: &str| Task::new(id, 0.5, TimingLocation::Beginning, 1.0, 0.0);
        let facility = Facility::new(
            GlobalParameters::default(),
            vec![
                Layer::new(vec![task("a"), task("b")]),
                Layer::new(vec![task("c"), task(" c ")]),
            ],
        );
        assert_eq!(
            facility.validate(),
            Err(StructureError::DuplicateId { layer: 2, id: "c".to_string() })
        );
    }
}
