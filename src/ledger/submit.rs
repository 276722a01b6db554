use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::carry::{carry_forward_from, CarryForward};
use super::month::MonthKey;
use super::record::{
    ElectricityRecord, ElectricityStatus, MonthRecord, RentRecord, RentStatus, Room,
};
use crate::config::Settings;
use crate::error::{RentError, Result};

/// A tenant's payment and meter reading for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub tenant_name: String,
    pub rent_paid: f64,
    #[serde(default)]
    pub rent_date: Option<NaiveDate>,
    #[serde(default)]
    pub rent_notes: Option<String>,
    pub previous_reading: f64,
    pub current_reading: f64,
    pub electricity_paid: f64,
    #[serde(default)]
    pub electricity_date: Option<NaiveDate>,
    #[serde(default)]
    pub electricity_notes: Option<String>,
}

impl Submission {
    /// Reject input the engine must never see. Reports the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.tenant_name.trim().is_empty() {
            return Err(RentError::validation("tenantName", "Tenant name is required"));
        }

        let amounts = [
            ("rentPaid", self.rent_paid, "Rent paid must not be negative"),
            ("previousReading", self.previous_reading, "Previous reading must not be negative"),
            ("currentReading", self.current_reading, "Current reading must not be negative"),
            ("electricityPaid", self.electricity_paid, "Electricity paid must not be negative"),
        ];
        for (field, value, message) in amounts {
            if !value.is_finite() {
                return Err(RentError::validation(field, "must be a number"));
            }
            if value < 0.0 {
                return Err(RentError::validation(field, message));
            }
        }

        Ok(())
    }
}

/// Consumption between two readings; a meter that went backwards counts as zero.
pub fn units_consumed(previous_reading: f64, current_reading: f64) -> f64 {
    (current_reading - previous_reading).max(0.0)
}

/// Replace `month` of `room` with the record implied by `submission`.
///
/// Carry-forward is taken from the month's stored record when one exists,
/// otherwise derived from the previous month. The tenant name on the room
/// is overwritten.
pub fn submit_month(
    room: &mut Room,
    month: MonthKey,
    settings: &Settings,
    submission: &Submission,
) -> MonthRecord {
    let carry = match room.monthly_data.get(&month) {
        Some(existing) if !existing.is_empty() => CarryForward::stored(existing),
        _ => carry_forward_from(&room.monthly_data, month).unwrap_or_default(),
    };

    let units = units_consumed(submission.previous_reading, submission.current_reading);
    let electricity_due = units * settings.unit_rate + carry.electricity;
    let rent_due = settings.base_rent + carry.rent;

    let record = MonthRecord {
        rent: Some(RentRecord {
            amount_due: rent_due,
            amount_paid: submission.rent_paid,
            balance: rent_due - submission.rent_paid,
            carry_forward: carry.rent,
            carry_forward_from: carry.rent_from,
            date: submission.rent_date,
            notes: non_blank(&submission.rent_notes),
            status: RentStatus::derive(submission.rent_paid, rent_due),
        }),
        electricity: Some(ElectricityRecord {
            previous_reading: submission.previous_reading,
            current_reading: submission.current_reading,
            units_consumed: units,
            amount_due: electricity_due,
            amount_paid: submission.electricity_paid,
            balance: electricity_due - submission.electricity_paid,
            carry_forward: carry.electricity,
            carry_forward_from: carry.electricity_from,
            date: submission.electricity_date,
            notes: non_blank(&submission.electricity_notes),
            status: ElectricityStatus::derive(submission.electricity_paid, electricity_due),
        }),
    };

    debug!(
        "Room {} {month}: rent {:.2}/{:.2}, electricity {:.2}/{:.2}",
        room.id, submission.rent_paid, rent_due, submission.electricity_paid, electricity_due
    );

    room.tenant_name = submission.tenant_name.trim().to_string();
    room.monthly_data.insert(month, record.clone());
    record
}

fn non_blank(notes: &Option<String>) -> Option<String> {
    notes
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::carry::resolve_month;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn submission() -> Submission {
        Submission {
            tenant_name: "Asha Rao".to_string(),
            rent_paid: 3000.0,
            rent_date: None,
            rent_notes: None,
            previous_reading: 100.0,
            current_reading: 150.0,
            electricity_paid: 500.0,
            electricity_date: None,
            electricity_notes: None,
        }
    }

    fn room() -> Room {
        Room::new(1, "Room 01", "Vacant")
    }

    #[test]
    fn test_electricity_overpayment_is_paid_with_negative_balance() {
        let mut room = room();
        let sub = Submission {
            electricity_paid: 600.0,
            ..submission()
        };

        let record = submit_month(&mut room, key("2024-05"), &Settings::default(), &sub);
        let electricity = record.electricity.unwrap();

        assert_eq!(electricity.units_consumed, 50.0);
        assert_eq!(electricity.amount_due, 500.0);
        assert_eq!(electricity.amount_paid, 600.0);
        assert_eq!(electricity.balance, -100.0);
        assert_eq!(electricity.status, ElectricityStatus::Paid);
    }

    #[test]
    fn test_zero_rent_paid_is_always_pending() {
        for base_rent in [0.0, 1.0, 3000.0] {
            let mut room = room();
            let settings = Settings {
                base_rent,
                unit_rate: 10.0,
            };
            let sub = Submission {
                rent_paid: 0.0,
                ..submission()
            };
            let record = submit_month(&mut room, key("2024-05"), &settings, &sub);
            assert_eq!(record.rent.unwrap().status, RentStatus::Pending);
        }
    }

    #[test]
    fn test_partial_rent() {
        let mut room = room();
        let sub = Submission {
            rent_paid: 1000.0,
            ..submission()
        };
        let rent = submit_month(&mut room, key("2024-05"), &Settings::default(), &sub)
            .rent
            .unwrap();
        assert_eq!(rent.balance, 2000.0);
        assert_eq!(rent.status, RentStatus::Partial);
    }

    #[test]
    fn test_meter_running_backwards_consumes_nothing() {
        assert_eq!(units_consumed(150.0, 100.0), 0.0);
        assert_eq!(units_consumed(100.0, 100.0), 0.0);

        let mut room = room();
        let sub = Submission {
            previous_reading: 900.0,
            current_reading: 10.0,
            electricity_paid: 0.0,
            ..submission()
        };
        let electricity = submit_month(&mut room, key("2024-05"), &Settings::default(), &sub)
            .electricity
            .unwrap();
        assert_eq!(electricity.units_consumed, 0.0);
        assert_eq!(electricity.amount_due, 0.0);
        assert_eq!(electricity.status, ElectricityStatus::Paid);
    }

    #[test]
    fn test_first_submission_derives_carry_from_previous_month() {
        let mut room = room();
        let unpaid = Submission {
            rent_paid: 2500.0,
            electricity_paid: 300.0,
            ..submission()
        };
        submit_month(&mut room, key("2024-04"), &Settings::default(), &unpaid);

        let record = submit_month(&mut room, key("2024-05"), &Settings::default(), &submission());
        let rent = record.rent.unwrap();
        let electricity = record.electricity.unwrap();

        assert_eq!(rent.carry_forward, 500.0);
        assert_eq!(rent.amount_due, 3500.0);
        assert_eq!(rent.status, RentStatus::Partial);
        assert_eq!(rent.carry_forward_from.as_deref(), Some("April 2024"));
        assert_eq!(electricity.carry_forward, 200.0);
        assert_eq!(electricity.amount_due, 700.0);
        assert_eq!(electricity.status, ElectricityStatus::Pending);
    }

    #[test]
    fn test_resubmission_keeps_stored_carry_forward() {
        let mut room = room();
        let settings = Settings::default();
        let unpaid = Submission {
            rent_paid: 2500.0,
            ..submission()
        };
        submit_month(&mut room, key("2024-04"), &settings, &unpaid);
        resolve_month(&mut room.monthly_data, key("2024-05"), &settings);

        // Settling April afterwards must not change what May already carries.
        submit_month(&mut room, key("2024-04"), &settings, &submission());
        let record = submit_month(&mut room, key("2024-05"), &settings, &submission());

        assert_eq!(record.rent.unwrap().carry_forward, 500.0);
    }

    #[test]
    fn test_submission_replaces_month_and_renames_tenant() {
        let mut room = room();
        let first = Submission {
            rent_notes: Some("late".to_string()),
            ..submission()
        };
        submit_month(&mut room, key("2024-05"), &Settings::default(), &first);

        let second = Submission {
            tenant_name: "  Dev Patel ".to_string(),
            rent_paid: 100.0,
            ..submission()
        };
        submit_month(&mut room, key("2024-05"), &Settings::default(), &second);

        let rent = room.month(key("2024-05")).unwrap().rent.clone().unwrap();
        assert_eq!(room.tenant_name, "Dev Patel");
        assert_eq!(rent.amount_paid, 100.0);
        assert_eq!(rent.notes, None);
        assert_eq!(room.monthly_data.len(), 1);
    }

    #[test]
    fn test_validation_names_the_bad_field() {
        let cases = [
            (
                Submission {
                    tenant_name: "   ".to_string(),
                    ..submission()
                },
                "tenantName",
            ),
            (
                Submission {
                    rent_paid: -1.0,
                    ..submission()
                },
                "rentPaid",
            ),
            (
                Submission {
                    previous_reading: -5.0,
                    ..submission()
                },
                "previousReading",
            ),
            (
                Submission {
                    current_reading: f64::NAN,
                    ..submission()
                },
                "currentReading",
            ),
            (
                Submission {
                    electricity_paid: -0.5,
                    ..submission()
                },
                "electricityPaid",
            ),
        ];

        for (sub, expected) in cases {
            match sub.validate() {
                Err(RentError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error for {expected}, got {other:?}"),
            }
        }
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_zero_amounts_pass_and_negative_message_says_so() {
        let zeros = Submission {
            rent_paid: 0.0,
            previous_reading: 0.0,
            current_reading: 0.0,
            electricity_paid: 0.0,
            ..submission()
        };
        assert!(zeros.validate().is_ok());

        let err = Submission {
            rent_paid: -1.0,
            ..submission()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid rentPaid: Rent paid must not be negative");
    }
}
