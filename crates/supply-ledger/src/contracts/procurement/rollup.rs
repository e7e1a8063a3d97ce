use chrono::NaiveDate;

use super::resolver::{DeliveryState, MaterialResolution};

/// One material line as the aggregator sees it.
#[derive(Debug, Clone, Copy)]
pub struct MaterialObservation<'a> {
    pub expected: Option<NaiveDate>,
    pub expected_raw: &'a str,
    pub actual: Option<NaiveDate>,
    pub actual_raw: &'a str,
    pub resolution: &'a MaterialResolution,
}

/// Running order-level aggregation across one order's material lines.
///
/// The representative status follows latest-actual-date-wins: the held best
/// is replaced whenever a line's actual date is the same or later, so the
/// chosen date is always the maximum actual date in the order no matter what
/// order the store enumerated the lines in.
#[derive(Debug, Default)]
pub struct OrderRollup {
    total_parts: usize,
    total_delivered: usize,
    parent_expected_date: Option<String>,
    best: Option<BestLine>,
}

#[derive(Debug)]
struct BestLine {
    actual: NaiveDate,
    actual_raw: String,
    status: String,
    state: DeliveryState,
    delay_reason: String,
}

impl OrderRollup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, line: MaterialObservation<'_>) {
        self.total_parts += 1;

        if self.parent_expected_date.is_none() && !line.expected_raw.is_empty() {
            self.parent_expected_date = Some(line.expected_raw.to_string());
        }

        let (Some(_), Some(actual)) = (line.expected, line.actual) else {
            return;
        };
        self.total_delivered += 1;

        let replace = match &self.best {
            Some(best) => actual >= best.actual,
            None => true,
        };
        if replace {
            self.best = Some(BestLine {
                actual,
                actual_raw: line.actual_raw.to_string(),
                status: line.resolution.status.clone(),
                state: line.resolution.state,
                delay_reason: line.resolution.delay_reason.clone(),
            });
        }
    }

    pub fn finish(self) -> OrderRollupSummary {
        let shipment_percent = if self.total_parts == 0 {
            // An order with no material lines ships nothing; defined rather
            // than a division by zero.
            "0.00".to_string()
        } else {
            let percent = 100.0 * self.total_delivered as f64 / self.total_parts as f64;
            format!("{percent:.2}")
        };

        let parent_expected_date = self.parent_expected_date.unwrap_or_default();

        match self.best {
            Some(best) => OrderRollupSummary {
                total_parts: self.total_parts,
                total_delivered: self.total_delivered,
                shipment_percent,
                parent_status: best.status,
                parent_state: best.state,
                parent_actual_date: Some(best.actual_raw),
                parent_delay_reason: best.delay_reason,
                parent_expected_date,
            },
            None => OrderRollupSummary {
                total_parts: self.total_parts,
                total_delivered: self.total_delivered,
                shipment_percent,
                parent_status: "On-Time".to_string(),
                parent_state: DeliveryState::Success,
                parent_actual_date: None,
                parent_delay_reason: "No delay".to_string(),
                parent_expected_date,
            },
        }
    }
}

/// Order-level rollup as exposed in the response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRollupSummary {
    pub total_parts: usize,
    pub total_delivered: usize,
    pub shipment_percent: String,
    pub parent_status: String,
    pub parent_state: DeliveryState,
    /// `None` when no material in the order has an actual date yet.
    pub parent_actual_date: Option<String>,
    pub parent_delay_reason: String,
    pub parent_expected_date: String,
}
