use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LaunchpadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    IncorrectInfo,
    OutdatedInfo,
    Other,
}

impl ReportCategory {
    pub const ALL: &[ReportCategory] = &[
        ReportCategory::IncorrectInfo,
        ReportCategory::OutdatedInfo,
        ReportCategory::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportCategory::IncorrectInfo => "Incorrect information",
            ReportCategory::OutdatedInfo => "Outdated information",
            ReportCategory::Other => "Other",
        }
    }

    /// Cycle through categories, starting from "none selected".
    pub fn next(current: Option<Self>) -> Option<Self> {
        match current {
            None => Self::ALL.first().copied(),
            Some(c) => Self::ALL.iter().skip_while(|x| **x != c).nth(1).copied(),
        }
    }

    pub fn prev(current: Option<Self>) -> Option<Self> {
        match current {
            None => Self::ALL.last().copied(),
            Some(c) => Self::ALL.iter().rev().skip_while(|x| **x != c).nth(1).copied(),
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Report form contents while the user is filling it in.
///
/// Any edit binds the draft to the scheme being viewed; `reset` drops the
/// binding along with the field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    pub scheme_id: Option<i64>,
    pub category: Option<ReportCategory>,
    pub description: String,
}

/// Request body for `POST /api/feedback/scheme-reports/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSchemeReport {
    pub scheme_id: i64,
    pub description: String,
    pub report_category: ReportCategory,
}

impl ReportDraft {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.description.is_empty()
    }

    pub fn set_category(&mut self, scheme_id: i64, category: Option<ReportCategory>) {
        self.scheme_id = Some(scheme_id);
        self.category = category;
    }

    pub fn set_description(&mut self, scheme_id: i64, description: impl Into<String>) {
        self.scheme_id = Some(scheme_id);
        self.description = description.into();
    }

    pub fn push_char(&mut self, scheme_id: i64, c: char) {
        self.scheme_id = Some(scheme_id);
        self.description.push(c);
    }

    pub fn pop_char(&mut self, scheme_id: i64) {
        self.scheme_id = Some(scheme_id);
        self.description.pop();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check required fields and build the request body.
    pub fn validate(&self) -> Result<CreateSchemeReport, LaunchpadError> {
        let scheme_id = self.scheme_id.ok_or(LaunchpadError::InvalidScheme)?;
        let report_category = self
            .category
            .ok_or_else(|| LaunchpadError::InvalidInput("category is required".into()))?;
        if self.description.trim().is_empty() {
            return Err(LaunchpadError::InvalidInput(
                "description is required".into(),
            ));
        }
        Ok(CreateSchemeReport {
            scheme_id,
            description: self.description.clone(),
            report_category,
        })
    }
}
