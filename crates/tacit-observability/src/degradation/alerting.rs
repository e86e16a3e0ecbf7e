//! Alerts over the degradation history. A burst of failures from one
//! component in the last hour warns; an outage past a day is critical.

use std::collections::BTreeSet;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// Events per hour above which a component warns.
const BURST_LIMIT: usize = 3;
const BURST_WINDOW_SECS: i64 = 3600;
const OUTAGE_LIMIT_HOURS: i64 = 24;

/// At most one alert per component, ordered by component name.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let components: BTreeSet<&str> = tracker
        .events()
        .map(|t| t.event.component.as_str())
        .collect();
    components
        .into_iter()
        .filter_map(|component| alert_for(tracker, component))
        .collect()
}

fn alert_for(tracker: &DegradationTracker, component: &str) -> Option<DegradationAlert> {
    let outage = tracker
        .degraded_duration(component)
        .filter(|d| *d > Duration::hours(OUTAGE_LIMIT_HOURS));
    if let Some(outage) = outage {
        return Some(DegradationAlert {
            level: AlertLevel::Critical,
            component: component.to_string(),
            message: format!(
                "{component} degraded for {}h without recovering",
                outage.num_hours()
            ),
        });
    }

    let burst = tracker.count_recent(component, BURST_WINDOW_SECS);
    (burst > BURST_LIMIT).then(|| DegradationAlert {
        level: AlertLevel::Warning,
        component: component.to_string(),
        message: format!("{component} fell back {burst} times within the hour"),
    })
}
