use serde::Deserialize;

use super::required;
use crate::services::backend::NewTool;

#[derive(Debug, Default, Deserialize)]
pub struct ToolForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub replacement_value: String,
}

impl ToolForm {
    pub fn validate(&self) -> Result<NewTool, String> {
        let name = required(&self.name, "name")?;
        let category = required(&self.category, "category")?;

        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or("stock must be greater than 0")?;
        let replacement_value = self
            .replacement_value
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or("replacement value must be greater than 0")?;

        Ok(NewTool {
            name,
            category,
            stock,
            replacement_value,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StockForm {
    #[serde(default)]
    pub delta: String,
}

impl StockForm {
    pub fn validate(&self) -> Result<i64, String> {
        match self.delta.trim().parse::<i64>() {
            Ok(0) => Err("stock change must not be 0".to_string()),
            Ok(d) => Ok(d),
            Err(_) => Err("stock change must be a whole number".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, category: &str, stock: &str, value: &str) -> ToolForm {
        ToolForm {
            name: name.into(),
            category: category.into(),
            stock: stock.into(),
            replacement_value: value.into(),
        }
    }

    #[test]
    fn accepts_positive_stock_and_value() {
        let tool = form(" Drill ", "Power", "3", "45000").validate().unwrap();
        assert_eq!(tool.name, "Drill");
        assert_eq!(tool.stock, 3);
        assert_eq!(tool.replacement_value, 45000);
    }

    #[test]
    fn rejects_non_positive_numbers() {
        assert_eq!(
            form("Drill", "Power", "0", "10").validate().unwrap_err(),
            "stock must be greater than 0"
        );
        assert_eq!(
            form("Drill", "Power", "1", "-5").validate().unwrap_err(),
            "replacement value must be greater than 0"
        );
        assert!(form("", "Power", "1", "1").validate().is_err());
    }

    #[test]
    fn stock_delta_is_signed_and_non_zero() {
        let parse = |d: &str| StockForm { delta: d.into() }.validate();
        assert_eq!(parse("-2"), Ok(-2));
        assert_eq!(parse("5"), Ok(5));
        assert!(parse("0").is_err());
        assert!(parse("two").is_err());
    }
}
