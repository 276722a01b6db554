mod export;

pub use export::{write_csv, CSV_HEADERS};

use serde::Serialize;

use crate::ledger::{ElectricityStatus, MonthRecord, RentStatus, Room, RoomId};

/// One room's month, flattened for tables and exports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub id: RoomId,
    pub room_number: String,
    pub tenant_name: String,
    pub rent_status: RentStatus,
    pub rent_due: f64,
    pub rent_paid: f64,
    pub rent_balance: f64,
    pub units_consumed: f64,
    pub electricity_due: f64,
    pub electricity_paid: f64,
    pub electricity_balance: f64,
    pub electricity_status: ElectricityStatus,
    pub notes: String,
}

impl OverviewRow {
    pub fn new(room: &Room, record: &MonthRecord) -> Self {
        let rent = record.rent.as_ref();
        let electricity = record.electricity.as_ref();
        let rent_notes = rent.and_then(|r| r.notes.as_deref()).unwrap_or("");
        let electricity_notes = electricity.and_then(|e| e.notes.as_deref()).unwrap_or("");

        Self {
            id: room.id,
            room_number: room.room_number.clone(),
            tenant_name: room.tenant_name.clone(),
            rent_status: record.rent_status(),
            rent_due: rent.map_or(0.0, |r| r.amount_due),
            rent_paid: rent.map_or(0.0, |r| r.amount_paid),
            rent_balance: record.rent_balance(),
            units_consumed: electricity.map_or(0.0, |e| e.units_consumed),
            electricity_due: electricity.map_or(0.0, |e| e.amount_due),
            electricity_paid: electricity.map_or(0.0, |e| e.amount_paid),
            electricity_balance: record.electricity_balance(),
            electricity_status: record.electricity_status(),
            notes: format!("{rent_notes} | {electricity_notes}").trim().to_string(),
        }
    }
}

pub fn overview<'a>(view: impl IntoIterator<Item = (&'a Room, &'a MonthRecord)>) -> Vec<OverviewRow> {
    view.into_iter()
        .map(|(room, record)| OverviewRow::new(room, record))
        .collect()
}

/// Sums over a month's rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthTotals {
    pub rooms: usize,
    pub rent_due: f64,
    pub rent_paid: f64,
    pub rent_outstanding: f64,
    pub electricity_due: f64,
    pub electricity_paid: f64,
    pub electricity_outstanding: f64,
    pub rent_paid_rooms: usize,
    pub electricity_paid_rooms: usize,
}

impl MonthTotals {
    /// Outstanding sums only count positive balances; an overpaid room does
    /// not offset another room's debt.
    pub fn from_rows(rows: &[OverviewRow]) -> Self {
        rows.iter().fold(Self::default(), |mut t, row| {
            t.rooms += 1;
            t.rent_due += row.rent_due;
            t.rent_paid += row.rent_paid;
            t.rent_outstanding += row.rent_balance.max(0.0);
            t.electricity_due += row.electricity_due;
            t.electricity_paid += row.electricity_paid;
            t.electricity_outstanding += row.electricity_balance.max(0.0);
            if row.rent_status == RentStatus::Paid {
                t.rent_paid_rooms += 1;
            }
            if row.electricity_status == ElectricityStatus::Paid && row.electricity_due > 0.0 {
                t.electricity_paid_rooms += 1;
            }
            t
        })
    }

    pub fn total_due(&self) -> f64 {
        self.rent_due + self.electricity_due
    }

    pub fn total_outstanding(&self) -> f64 {
        self.rent_outstanding + self.electricity_outstanding
    }
}
