use chrono::NaiveDate;
use serde::Deserialize;

use crate::services::backend::{NewLoan, ReturnLoan};

fn parse_id(raw: &str, what: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("select a {what}"))
}

fn parse_date(raw: &str, what: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| format!("{what} is required"))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub tool_id: String,
    #[serde(default)]
    pub due_date: String,
}

impl LoanForm {
    pub fn validate(&self) -> Result<NewLoan, String> {
        Ok(NewLoan {
            client_id: parse_id(&self.client_id, "client")?,
            tool_id: parse_id(&self.tool_id, "tool")?,
            due_date: parse_date(&self.due_date, "due date")?,
        })
    }
}

/// Unchecked boxes are simply absent from the form body.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub return_date: String,
    #[serde(default)]
    pub damaged: Option<String>,
    #[serde(default)]
    pub irreparable: Option<String>,
}

impl ReturnForm {
    pub fn damaged(&self) -> bool {
        self.damaged.is_some()
    }

    pub fn irreparable(&self) -> bool {
        self.irreparable.is_some()
    }

    pub fn validate(&self) -> Result<ReturnLoan, String> {
        Ok(ReturnLoan {
            return_date: parse_date(&self.return_date, "return date")?,
            damaged: self.damaged(),
            irreparable: self.irreparable(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_form_requires_selection_and_date() {
        let ok = LoanForm {
            client_id: "3".into(),
            tool_id: "9".into(),
            due_date: "2025-04-01".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.client_id, 3);
        assert_eq!(ok.due_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

        let missing_tool = LoanForm {
            client_id: "3".into(),
            tool_id: "".into(),
            due_date: "2025-04-01".into(),
        };
        assert_eq!(missing_tool.validate().unwrap_err(), "select a tool");
    }

    #[test]
    fn checkboxes_map_to_flags() {
        let form = ReturnForm {
            return_date: "2025-04-02".into(),
            damaged: Some("true".into()),
            irreparable: None,
        };
        let ret = form.validate().unwrap();
        assert!(ret.damaged);
        assert!(!ret.irreparable);
    }

    #[test]
    fn return_date_is_required() {
        assert_eq!(
            ReturnForm::default().validate().unwrap_err(),
            "return date is required"
        );
    }
}
