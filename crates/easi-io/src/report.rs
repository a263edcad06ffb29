//! Plain-text rendering of assessments and selections.

use easi_core::EvaluatedStep;
use easi_engine::{Assessment, Report, Selection};

pub fn percentage(p: f64) -> String {
    format!("{:.6}%", p * 100.0)
}

/// Ranked path list, MVP marked on the first line.
pub fn render_ranking(report: &Report) -> String {
    report
        .ranked_paths
        .iter()
        .map(|path| {
            let marker = if path.rank == 1 { " [MVP]" } else { "" };
            format!(
                "path {} p(i) = {}{}  {}\n",
                path.rank,
                percentage(path.overall_interruption),
                marker,
                path.label
            )
        })
        .collect()
}

fn render_step(layer: usize, s: &EvaluatedStep) -> String {
    [
        format!("Layer {}:", layer),
        format!("    - Task: {}: {}", s.task_id, s.description),
        format!(
            "    - P(d): {}, Location: {}, Delay Mean: {}, Delay SDev: {}",
            s.detection_probability, s.timing, s.delay_mean, s.delay_sdev
        ),
        format!(
            "    - Adjusted P(d): {}, Missed Detection: {}, First Detection: {}",
            s.adjusted_detection, s.missed_detection, s.first_detection
        ),
        format!(
            "    - Cumulative Delay(s): {}, Cumulative Var: {}, True Mean: {}, True Var: {}",
            s.cumulative_delay, s.cumulative_variance, s.true_mean, s.true_variance
        ),
        format!(
            "    - Z-Value: {}, Normal Value: {}, Task Interruption Probability: {}",
            s.z_value, s.cdf_probability, s.task_interruption
        ),
    ]
    .join("\n")
}

/// Every intermediate value of each step, one block per layer.
pub fn render_steps(steps: &[EvaluatedStep]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| render_step(i + 1, s) + "\n\n")
        .collect()
}

fn overall_line(p: f64) -> String {
    format!("Overall Probability of Interruption: {}\n", percentage(p))
}

pub fn render_assessment(assessment: &Assessment) -> String {
    match assessment {
        Assessment::Ranked(report) => {
            let mut out = render_ranking(report);
            out.push_str("\n----------- MVP Path Details -----------\n");
            out.push_str(&format!("MVP: {}\n\n", report.mvp.label));
            out.push_str(&render_steps(&report.mvp.steps));
            out.push_str(&overall_line(report.mvp.overall_interruption));
            out
        }
        Assessment::NoPath => "No computable path: the facility has no layers.\n".to_string(),
        Assessment::Invalid { reason } => format!("Invalid facility: {}\n", reason),
    }
}

pub fn render_selection(selection: &Selection) -> String {
    match selection {
        Selection::Complete { label, path } => {
            let mut out = format!("Selected path: {}\n\n", label);
            out.push_str(&render_steps(&path.steps));
            out.push_str(&overall_line(path.overall_interruption));
            out
        }
        Selection::Incomplete { reason } => format!("Incomplete selection: {}\n", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easi_core::{Facility, GlobalParameters, Layer, StructureError, Task, TimingLocation};
    use easi_engine::{Engine, EngineConfig, IncompleteSelection};

    fn facility() -> Facility {
        Facility::new(
            GlobalParameters::new(0.9, 8.0, 2.0),
            vec![
                Layer::new(vec![Task::new("1", 0.5, TimingLocation::Beginning, 10.0, 2.0).with_description("Fence")]),
                Layer::new(vec![Task::new("2", 0.5, TimingLocation::Middle, 5.0, 1.0)]),
            ],
        )
    }

    #[test]
    fn test_render_assessment() {
        let text = render_assessment(&Engine::new(EngineConfig::sequential()).assess(&facility()));

        assert!(text.starts_with("path 1 p(i) = 22.855818% [MVP]  1 → 2"));
        assert!(text.contains("Layer 1:\n    - Task: 1: Fence"));
        assert!(text.contains("Layer 2:\n    - Task: 2: -"));
        assert!(text.contains("Location: M"));
        assert!(text.trim_end().ends_with("Overall Probability of Interruption: 22.855818%"));
    }

    #[test]
    fn test_render_failures() {
        assert!(render_assessment(&Assessment::NoPath).contains("no layers"));
        let invalid = Assessment::Invalid { reason: StructureError::EmptyLayer { layer: 4 } };
        assert_eq!(render_assessment(&invalid), "Invalid facility: layer 4 has no tasks\n");
        let incomplete = Selection::Incomplete { reason: IncompleteSelection::MissingChoice { layer: 2 } };
        assert_eq!(render_selection(&incomplete), "Incomplete selection: no task chosen for layer 2\n");
    }

    #[test]
    fn test_render_selection() {
        let selection = Engine::new(EngineConfig::sequential()).evaluate_selection(&facility(), &["1", "2"]);
        let text = render_selection(&selection);

        assert!(text.starts_with("Selected path: 1 → 2\n\nLayer 1:\n"));
        assert!(text.contains("Normal Value: 0.00981530"));
        assert!(text.contains("\n\nLayer 2:\n"));
        assert_eq!(text.matches("Layer ").count(), 2);
        assert!(text.ends_with("Overall Probability of Interruption: 22.855818%\n"));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0.5), "50.000000%");
        assert_eq!(percentage(0.0), "0.000000%");
    }
}
