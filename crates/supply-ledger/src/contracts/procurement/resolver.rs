//! Pure mapping from (expected date, actual date, reconciliation date,
//! invoice amount) to a per-material delivery status, state, delay reason,
//! and penalty. Deterministic and side-effect-free: the reconciliation date
//! is an explicit input, never the wall clock.

use chrono::NaiveDate;

use crate::contracts::invoice::InvoiceLookup;

/// Delivery state label attached to each material line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Success,
    Error,
    None,
}

impl DeliveryState {
    pub const fn label(self) -> &'static str {
        match self {
            DeliveryState::Success => "Success",
            DeliveryState::Error => "Error",
            DeliveryState::None => "None",
        }
    }
}

/// Penalty column of a material line.
#[derive(Debug, Clone, PartialEq)]
pub enum Penalty {
    /// No penalty applies (on time, early, or no basis to assess one).
    None,
    /// Delivery is overdue but not yet made; a running penalty is never
    /// computed before actual delivery.
    Pending,
    /// Late delivery against a known invoice amount.
    Assessed(f64),
    /// Late delivery, but the invoice lookup failed; the amount cannot be
    /// assessed and must not silently read as zero.
    Unavailable,
}

impl Penalty {
    pub fn render(&self) -> String {
        match self {
            Penalty::None => "0.00".to_string(),
            Penalty::Pending => "-".to_string(),
            Penalty::Assessed(amount) => format!("{amount:.2}"),
            Penalty::Unavailable => "unavailable".to_string(),
        }
    }
}

/// Resolved status of one material line.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialResolution {
    pub status: String,
    pub state: DeliveryState,
    pub delay_reason: String,
    pub penalty: Penalty,
}

/// Delay-bucket percentage: 5% up to two days late, 10% up to seven, 20%
/// beyond that.
pub(crate) fn tier(days_late: i64) -> u32 {
    if days_late <= 2 {
        5
    } else if days_late <= 7 {
        10
    } else {
        20
    }
}

/// The four-case state machine, evaluated in priority order.
pub fn resolve(
    expected: Option<NaiveDate>,
    actual: Option<NaiveDate>,
    today: NaiveDate,
    delay_reason: &str,
    invoice: &InvoiceLookup,
) -> MaterialResolution {
    let Some(expected) = expected else {
        // Not yet applicable: no expectation recorded.
        return MaterialResolution {
            status: "On-Time".to_string(),
            state: DeliveryState::Success,
            delay_reason: String::new(),
            penalty: Penalty::None,
        };
    };

    let Some(actual) = actual else {
        let overdue = (today - expected).num_days();
        if overdue > 0 {
            return MaterialResolution {
                status: format!("Delayed+{overdue}"),
                state: DeliveryState::Error,
                delay_reason: String::new(),
                penalty: Penalty::Pending,
            };
        }
        return MaterialResolution {
            status: "On-Time".to_string(),
            state: DeliveryState::Success,
            delay_reason: String::new(),
            penalty: Penalty::None,
        };
    };

    let days = (actual - expected).num_days();
    if days <= 0 {
        // On or before the expected date; early delivery carries no penalty.
        return MaterialResolution {
            status: "Delivered".to_string(),
            state: DeliveryState::None,
            delay_reason: delay_reason.to_string(),
            penalty: Penalty::None,
        };
    }

    let penalty = match invoice {
        InvoiceLookup::Amount(amount) => {
            Penalty::Assessed(amount * f64::from(tier(days)) / 100.0)
        }
        InvoiceLookup::NotFound => Penalty::None,
        InvoiceLookup::Unavailable(_) => Penalty::Unavailable,
    };

    MaterialResolution {
        status: format!("Delivered+{days}"),
        state: DeliveryState::Error,
        delay_reason: delay_reason.to_string(),
        penalty,
    }
}
