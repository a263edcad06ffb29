use crate::facility::Layer;
use crate::task::Task;

/// Default separator between task ids in a path label.
pub const LABEL_SEPARATOR: &str = " → ";

/// One task per layer, in layer order. Borrows from the facility.
#[derive(Clone, Debug, PartialEq)]
pub struct Path<'a> {
    pub tasks: Vec<&'a Task>,
    /// Index of the chosen task within each layer
    pub choices: Vec<usize>,
}

impl<'a> Path<'a> {
    pub fn new(tasks: Vec<&'a Task>, choices: Vec<usize>) -> Self {
        Self { tasks, choices }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn label(&self, separator: &str) -> String {
        self.tasks
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Cartesian product over layers.
///
/// Yields paths in nested-loop order: the first layer is the outermost loop
/// and the last layer varies fastest. A clone continues from the same
/// position; call [`enumerate_paths`] again for a fresh pass.
#[derive(Clone, Debug)]
pub struct PathEnumerator<'a> {
    layers: &'a [Layer],
    cursor: Option<Vec<usize>>,
    remaining: usize,
}

impl<'a> PathEnumerator<'a> {
    pub fn new(layers: &'a [Layer]) -> Self {
        let exhausted = layers.is_empty() || layers.iter().any(Layer::is_empty);
        let remaining = if exhausted {
            0
        } else {
            layers.iter().fold(1usize, |acc, l| acc.saturating_mul(l.len()))
        };
        Self {
            layers,
            cursor: if exhausted { None } else { Some(vec![0; layers.len()]) },
            remaining,
        }
    }

    fn advance(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        for layer in (0..cursor.len()).rev() {
            cursor[layer] += 1;
            if cursor[layer] < self.layers[layer].len() {
                return;
            }
            cursor[layer] = 0;
        }
        // Every digit rolled over
        self.cursor = None;
    }
}

impl<'a> Iterator for PathEnumerator<'a> {
    type Item = Path<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let choices = self.cursor.clone()?;
        let tasks = choices
            .iter()
            .zip(self.layers)
            .map(|(&i, layer)| &layer.tasks[i])
            .collect();
        self.advance();
        self.remaining = self.remaining.saturating_sub(1);
        Some(Path::new(tasks, choices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// All paths through `layers`. Empty when there are no layers or a layer is empty.
pub fn enumerate_paths(layers: &[Layer]) -> PathEnumerator<'_> {
    PathEnumerator::new(layers)
}
