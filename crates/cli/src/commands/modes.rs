//! List supported report modes.

use ct_metrics_core::{MetricMode, ModeClass};

/// Print every mode with the way it is evaluated.
#[allow(clippy::print_stdout)]
pub fn list() {
    for mode in MetricMode::ALL {
        println!("{}", describe(mode));
    }
}

fn describe(mode: MetricMode) -> String {
    let evaluation = match (mode.class(), mode.interval_step_hours()) {
        (ModeClass::IntervalSplittable, Some(hours)) => format!("{hours}h intervals, adaptive split"),
        _ => "full range".to_string(),
    };
    format!("{:<20} {evaluation}", mode.as_str())
}
