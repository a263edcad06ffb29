use approx::{assert_abs_diff_eq, assert_relative_eq};
use easi_core::{enumerate_paths, evaluate, GlobalParameters, Layer, Task, TimingLocation};

fn single_task(detection: f64, delay_mean: f64, globals: &GlobalParameters) -> f64 {
    let task = Task::new("1", detection, TimingLocation::Beginning, delay_mean, 1.0);
    evaluate(&[&task], globals).overall_interruption
}

#[test]
fn certain_detection_with_ample_margin() {
    let globals = GlobalParameters::new(1.0, 1000.0, 1.0);
    let p = single_task(1.0, 10.0, &globals);

    println!("Overall interruption: {:.9}", p);
    assert_abs_diff_eq!(p, 1.0, epsilon = 1e-6);
}

#[test]
fn no_detection_never_interrupts() {
    for (comms, mean, sdev) in [(1.0, 1000.0, 1.0), (0.5, 0.0, 0.0), (0.9, 8.0, 2.0)] {
        let globals = GlobalParameters::new(comms, mean, sdev);
        assert_eq!(single_task(0.0, 10.0, &globals), 0.0);
    }
}

#[test]
fn guard_communication_scales_result() {
    let full = single_task(0.8, 30.0, &GlobalParameters::new(1.0, 40.0, 5.0));
    let half = single_task(0.8, 30.0, &GlobalParameters::new(0.5, 40.0, 5.0));
    assert_relative_eq!(half, full * 0.5, max_relative = 1e-12);
}

#[test]
fn reliability_factors_reduce_detection() {
    let task = Task::new("1", 0.8, TimingLocation::Beginning, 30.0, 5.0);
    let globals = GlobalParameters::new(1.0, 40.0, 5.0).with_reliability(0.5, 0.5);
    let result = evaluate(&[&task], &globals);
    assert_relative_eq!(result.steps[0].adjusted_detection, 0.2);
    assert_relative_eq!(result.steps[0].missed_detection, 0.8);
}

#[test]
fn two_layer_regression() {
    let layers = vec![
        Layer::new(vec![Task::new("1", 0.5, TimingLocation::Beginning, 10.0, 2.0)]),
        Layer::new(vec![Task::new("2", 0.5, TimingLocation::Middle, 5.0, 1.0)]),
    ];
    let globals = GlobalParameters::new(0.9, 8.0, 2.0);

    let paths: Vec<_> = enumerate_paths(&layers).collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].label("→"), "1→2");

    let result = evaluate(&paths[0].tasks, &globals);
    assert_eq!(result.steps.len(), layers.len());

    let s = &result.steps;
    assert_eq!(s[0].cumulative_delay, 15.0);
    assert_eq!(s[0].cumulative_variance, 5.0);
    assert_relative_eq!(s[0].z_value, -2.3333333333333335, max_relative = 1e-12);
    assert_relative_eq!(s[0].cdf_probability, 0.009815307243531024, max_relative = 1e-9);
    assert_relative_eq!(s[1].z_value, 2.6678918753996625, max_relative = 1e-12);
    assert_relative_eq!(s[1].cdf_probability, 0.9961835142088057, max_relative = 1e-9);
    assert_relative_eq!(s[1].task_interruption, 0.24904587855220142, max_relative = 1e-9);
    assert_relative_eq!(result.overall_interruption, 0.22855817895657024, max_relative = 1e-9);
}

#[test]
fn evaluation_is_repeatable() {
    let a = Task::new("a", 0.3, TimingLocation::End, 12.0, 3.0);
    let b = Task::new("b", 0.7, TimingLocation::Middle, 40.0, 9.0);
    let globals = GlobalParameters::new(0.95, 30.0, 6.0);

    let first = evaluate(&[&a, &b], &globals);
    let second = evaluate(&[&a, &b], &globals);
    assert_eq!(first.overall_interruption.to_bits(), second.overall_interruption.to_bits());
    assert_eq!(first, second);
}
