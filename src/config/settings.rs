use serde::{Deserialize, Serialize};

use crate::error::{RentError, Result};

const DEFAULT_BASE_RENT: f64 = 3000.0;
const DEFAULT_UNIT_RATE: f64 = 10.0;

/// Billing rates applied when a month is computed.
///
/// Records keep the amounts computed under the rates in effect at the time;
/// changing settings never rewrites them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_rent: f64,
    pub unit_rate: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_rent: DEFAULT_BASE_RENT,
            unit_rate: DEFAULT_UNIT_RATE,
        }
    }
}

impl Settings {
    pub fn merge(&self, update: &SettingsUpdate) -> Self {
        Self {
            base_rent: update.base_rent.unwrap_or(self.base_rent),
            unit_rate: update.unit_rate.unwrap_or(self.unit_rate),
        }
    }
}

/// Partial settings change; unset fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_rent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_rate: Option<f64>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.base_rent.is_none() && self.unit_rate.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        check_rate("baseRent", self.base_rent)?;
        check_rate("unitRate", self.unit_rate)
    }
}

fn check_rate(field: &'static str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => Err(RentError::validation(field, "must be a number")),
        Some(v) if v < 0.0 => Err(RentError::validation(field, "must not be negative")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_rent, 3000.0);
        assert_eq!(settings.unit_rate, 10.0);
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let settings = Settings::default();
        let merged = settings.merge(&SettingsUpdate {
            base_rent: None,
            unit_rate: Some(12.5),
        });
        assert_eq!(merged.base_rent, 3000.0);
        assert_eq!(merged.unit_rate, 12.5);
    }

    #[test]
    fn test_rejects_negative_rates() {
        let update = SettingsUpdate {
            base_rent: Some(-1.0),
            unit_rate: None,
        };
        let err = update.validate().unwrap_err();
        assert!(matches!(err, RentError::Validation { field: "baseRent", .. }));
    }
}
