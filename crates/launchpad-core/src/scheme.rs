use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A government assistance scheme as served by `/api/schemes`.
///
/// Only `id` is load-bearing: a scheme without one cannot have its
/// criteria or documents fetched. Everything else is display data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub department: Option<Department>,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub scheme_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    #[serde(default)]
    pub beneficiary_type: Option<String>,
}

/// An eligibility rule attached to a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: i64,
    #[serde(default)]
    pub scheme: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A document an applicant needs to provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default)]
    pub scheme: Option<i64>,
    #[serde(default)]
    pub document_name: String,
}

impl Scheme {
    pub fn state(&self) -> Option<&str> {
        self.department
            .as_ref()
            .and_then(|d| d.state.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department
            .as_ref()
            .and_then(|d| d.department_name.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Beneficiary type of the first listed beneficiary.
    pub fn primary_beneficiary(&self) -> Option<&str> {
        self.beneficiaries
            .first()
            .and_then(|b| b.beneficiary_type.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn apply_link(&self) -> Option<&str> {
        self.scheme_link.as_deref().filter(|s| !s.is_empty())
    }

    pub fn pdf(&self) -> Option<&str> {
        self.pdf_url.as_deref().filter(|s| !s.is_empty())
    }

    /// Date part of `created_at`, for the "Last updated on" badge.
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS`, RFC 3339, or anything with a leading
    /// date token.
    pub fn last_updated(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive().to_string());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date().to_string());
        }
        raw.split_whitespace().next().map(String::from)
    }
}
