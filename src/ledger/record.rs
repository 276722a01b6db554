use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::month::MonthKey;

pub type RoomId = u32;

/// Per-month records of a room, oldest first. Months without activity have no entry.
pub type MonthlyData = BTreeMap<MonthKey, MonthRecord>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub room_number: String,
    pub tenant_name: String,
    #[serde(default)]
    pub monthly_data: MonthlyData,
}

impl Room {
    pub fn new(id: RoomId, room_number: impl Into<String>, tenant_name: impl Into<String>) -> Self {
        Self {
            id,
            room_number: room_number.into(),
            tenant_name: tenant_name.into(),
            monthly_data: MonthlyData::new(),
        }
    }

    /// Room `id` as first seeded: `Room 01` let to `Tenant 01`.
    pub fn numbered(id: RoomId) -> Self {
        Self::new(id, format!("Room {id:02}"), format!("Tenant {id:02}"))
    }

    /// Stored record for a month, without materializing anything
    pub fn month(&self, month: MonthKey) -> Option<&MonthRecord> {
        self.monthly_data.get(&month)
    }
}

/// One month of billing for a room. Either half may be absent until entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent: Option<RentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<ElectricityRecord>,
}

impl MonthRecord {
    pub fn is_empty(&self) -> bool {
        self.rent.is_none() && self.electricity.is_none()
    }

    pub fn rent_status(&self) -> RentStatus {
        self.rent.as_ref().map_or(RentStatus::Pending, |r| r.status)
    }

    pub fn electricity_status(&self) -> ElectricityStatus {
        self.electricity
            .as_ref()
            .map_or(ElectricityStatus::Pending, |e| e.status)
    }

    pub fn rent_balance(&self) -> f64 {
        self.rent.as_ref().map_or(0.0, |r| r.balance)
    }

    pub fn electricity_balance(&self) -> f64 {
        self.electricity.as_ref().map_or(0.0, |e| e.balance)
    }

    /// Rent plus electricity owed for the month
    pub fn total_due(&self) -> f64 {
        self.rent.as_ref().map_or(0.0, |r| r.amount_due)
            + self.electricity.as_ref().map_or(0.0, |e| e.amount_due)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentRecord {
    pub amount_due: f64,
    pub amount_paid: f64,
    pub balance: f64,
    #[serde(default)]
    pub carry_forward: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry_forward_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: RentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityRecord {
    pub previous_reading: f64,
    pub current_reading: f64,
    pub units_consumed: f64,
    pub amount_due: f64,
    pub amount_paid: f64,
    pub balance: f64,
    #[serde(default)]
    pub carry_forward: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry_forward_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ElectricityStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentStatus {
    Paid,
    Partial,
    #[default]
    Pending,
}

impl RentStatus {
    /// Nothing paid is always pending, even against a zero amount due.
    pub fn derive(amount_paid: f64, amount_due: f64) -> Self {
        if amount_paid == 0.0 {
            RentStatus::Pending
        } else if amount_paid >= amount_due {
            RentStatus::Paid
        } else {
            RentStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RentStatus::Paid => "paid",
            RentStatus::Partial => "partial",
            RentStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for RentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Electricity has no partial state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectricityStatus {
    Paid,
    #[default]
    Pending,
}

impl ElectricityStatus {
    pub fn derive(amount_paid: f64, amount_due: f64) -> Self {
        if amount_paid >= amount_due {
            ElectricityStatus::Paid
        } else {
            ElectricityStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElectricityStatus::Paid => "paid",
            ElectricityStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for ElectricityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}
