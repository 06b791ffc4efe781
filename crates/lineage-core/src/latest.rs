//! Time windows for latest-dataset-of-type queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restricts the source modification time of candidate datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TimeWindow {
    /// No restriction.
    #[default]
    Any,
    /// Strictly after the instant.
    After { time: DateTime<Utc> },
    /// Strictly before the instant.
    Before { time: DateTime<Utc> },
    /// Inclusive on both ends.
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Exactly at the instant.
    At { time: DateTime<Utc> },
}

impl TimeWindow {
    /// Returns true when a dataset modified at `modified` falls in the window.
    ///
    /// Datasets without a modification time only match [`TimeWindow::Any`].
    pub fn contains(&self, modified: Option<DateTime<Utc>>) -> bool {
        match (self, modified) {
            (TimeWindow::Any, _) => true,
            (_, None) => false,
            (TimeWindow::After { time }, Some(m)) => m > *time,
            (TimeWindow::Before { time }, Some(m)) => m < *time,
            (TimeWindow::Between { start, end }, Some(m)) => *start <= m && m <= *end,
            (TimeWindow::At { time }, Some(m)) => m == *time,
        }
    }
}
