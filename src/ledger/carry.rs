//! Carry-forward resolution.
//!
//! An unpaid balance from the month immediately before is added to the
//! month's amount due. Only debts carry; an overpayment never becomes a
//! credit. Resolution looks exactly one month back and never recurses.

use log::debug;

use super::month::MonthKey;
use super::record::{
    ElectricityRecord, ElectricityStatus, MonthRecord, MonthlyData, RentRecord, RentStatus,
};
use crate::config::Settings;

/// Amounts carried into a month from its predecessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarryForward {
    pub rent: f64,
    pub rent_from: Option<String>,
    pub electricity: f64,
    pub electricity_from: Option<String>,
    /// Meter reading at the end of the previous month
    pub previous_reading: f64,
}

impl CarryForward {
    /// Reuse what was stored when `record` was first materialized.
    pub fn stored(record: &MonthRecord) -> Self {
        let rent = record.rent.as_ref();
        let electricity = record.electricity.as_ref();
        Self {
            rent: rent.map_or(0.0, |r| r.carry_forward),
            rent_from: rent.and_then(|r| r.carry_forward_from.clone()),
            electricity: electricity.map_or(0.0, |e| e.carry_forward),
            electricity_from: electricity.and_then(|e| e.carry_forward_from.clone()),
            previous_reading: electricity.map_or(0.0, |e| e.previous_reading),
        }
    }
}

/// Derive what `month` inherits from the month before it, if that month exists.
pub fn carry_forward_from(monthly: &MonthlyData, month: MonthKey) -> Option<CarryForward> {
    let previous = month.previous();
    let record = monthly.get(&previous)?;

    let rent = record.rent_balance().max(0.0);
    let electricity = record.electricity_balance().max(0.0);
    let label = |amount: f64| (amount > 0.0).then(|| previous.label());

    Some(CarryForward {
        rent,
        rent_from: label(rent),
        electricity,
        electricity_from: label(electricity),
        previous_reading: record
            .electricity
            .as_ref()
            .map_or(0.0, |e| e.current_reading),
    })
}

/// Outcome of [`resolve_month`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub record: MonthRecord,
    /// True when the record was computed now and inserted into the history;
    /// the caller owes the store exactly one write.
    pub materialized: bool,
}

/// Produce the record to show for `month`, materializing it from the
/// previous month's balances when it does not exist yet.
pub fn resolve_month(monthly: &mut MonthlyData, month: MonthKey, settings: &Settings) -> Resolved {
    if let Some(record) = monthly.get(&month) {
        return Resolved {
            record: record.clone(),
            materialized: false,
        };
    }

    let Some(carry) = carry_forward_from(monthly, month) else {
        return Resolved {
            record: MonthRecord::default(),
            materialized: false,
        };
    };

    let record = opening_record(&carry, settings);
    debug!(
        "Materialized {month}: rent carry {:.2}, electricity carry {:.2}",
        carry.rent, carry.electricity
    );
    monthly.insert(month, record.clone());

    Resolved {
        record,
        materialized: true,
    }
}

/// A month with nothing paid and no readings yet, seeded from `carry`.
fn opening_record(carry: &CarryForward, settings: &Settings) -> MonthRecord {
    let rent_due = settings.base_rent + carry.rent;

    MonthRecord {
        rent: Some(RentRecord {
            amount_due: rent_due,
            amount_paid: 0.0,
            balance: rent_due,
            carry_forward: carry.rent,
            carry_forward_from: carry.rent_from.clone(),
            date: None,
            notes: None,
            status: RentStatus::Pending,
        }),
        electricity: Some(ElectricityRecord {
            previous_reading: carry.previous_reading,
            current_reading: 0.0,
            units_consumed: 0.0,
            amount_due: carry.electricity,
            amount_paid: 0.0,
            balance: carry.electricity,
            carry_forward: carry.electricity,
            carry_forward_from: carry.electricity_from.clone(),
            date: None,
            notes: None,
            status: ElectricityStatus::Pending,
        }),
    }
}
