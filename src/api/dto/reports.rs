use chrono::NaiveDate;
use serde::Deserialize;

/// Report kinds offered by the report viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    #[default]
    LateClients,
    ActiveLoans,
    LateLoans,
    TopTools,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::LateClients,
        ReportKind::ActiveLoans,
        ReportKind::LateLoans,
        ReportKind::TopTools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::LateClients => "LATE_CLIENTS",
            ReportKind::ActiveLoans => "ACTIVE_LOANS",
            ReportKind::LateLoans => "LATE_LOANS",
            ReportKind::TopTools => "TOP_TOOLS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::LateClients => "Clients with late loans",
            ReportKind::ActiveLoans => "Active loans",
            ReportKind::LateLoans => "Late loans",
            ReportKind::TopTools => "Most loaned tools",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub kind: ReportKind,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl ReportQuery {
    /// Both bounds of the ranking range, or `None` when either is missing or
    /// not a date.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        };
        Some((parse(&self.from)?, parse(&self.to)?))
    }
}
