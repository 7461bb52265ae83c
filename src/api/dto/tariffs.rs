use serde::Deserialize;

use crate::services::backend::Tariff;

#[derive(Debug, Default, Deserialize)]
pub struct TariffForm {
    #[serde(default)]
    pub daily_rent_fee: String,
    #[serde(default)]
    pub daily_late_fee: String,
    #[serde(default)]
    pub repair_fee: String,
}

fn positive(raw: &str, what: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0)
        .ok_or_else(|| format!("{what} must be greater than 0"))
}

impl TariffForm {
    pub fn validate(&self, id: i64) -> Result<Tariff, String> {
        let repair_fee = match self.repair_fee.trim() {
            "" => None,
            raw => Some(
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| *v >= 0.0)
                    .ok_or("repair fee must not be negative")?,
            ),
        };

        Ok(Tariff {
            id: Some(id),
            daily_rent_fee: positive(&self.daily_rent_fee, "daily rent fee")?,
            daily_late_fee: positive(&self.daily_late_fee, "daily late fee")?,
            repair_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fees_must_be_positive() {
        let form = TariffForm {
            daily_rent_fee: "0".into(),
            daily_late_fee: "500".into(),
            repair_fee: "".into(),
        };
        assert_eq!(
            form.validate(1).unwrap_err(),
            "daily rent fee must be greater than 0"
        );
    }

    #[test]
    fn repair_fee_is_optional() {
        let tariff = TariffForm {
            daily_rent_fee: "2500".into(),
            daily_late_fee: "1000".into(),
            repair_fee: "".into(),
        }
        .validate(2)
        .unwrap();
        assert_eq!(tariff.id, Some(2));
        assert_eq!(tariff.repair_fee, None);
    }
}
