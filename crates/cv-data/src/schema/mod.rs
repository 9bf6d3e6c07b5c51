//! Wire format of the Covid Act Now `states.json` endpoint
//!
//! Only the fields the dashboard uses are modeled; everything else in the
//! payload is ignored. Most fields are nullable upstream.

use chrono::NaiveDate;
use cv_core::{Actuals, RiskLevel, RiskLevels};
use serde::Deserialize;

use crate::DataError;

/// One element of the endpoint's top-level array
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStateRecord {
    /// Two-letter state code
    pub state: String,
    pub fips: ApiFips,
    pub population: Option<u64>,
    pub metrics: Option<ApiMetrics>,
    pub risk_levels: Option<ApiRiskLevels>,
    pub actuals: Option<ApiActuals>,
    pub last_updated_date: Option<NaiveDate>,
}

/// FIPS codes arrive as zero-padded strings (`"06"`), older snapshots use numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiFips {
    Text(String),
    Number(u32),
}

impl ApiFips {
    pub fn parse(&self) -> Option<u32> {
        match self {
            ApiFips::Text(text) => text.trim().parse().ok(),
            ApiFips::Number(n) => Some(*n),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    pub case_density: Option<f64>,
    pub infection_rate: Option<f64>,
    pub test_positivity_ratio: Option<f64>,
    pub contact_tracer_capacity_ratio: Option<f64>,
    pub icu_headroom_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRiskLevels {
    pub overall: Option<i64>,
    pub test_positivity_ratio: Option<i64>,
    pub case_density: Option<i64>,
    pub infection_rate: Option<i64>,
    pub contact_tracer_capacity_ratio: Option<i64>,
    pub icu_headroom_ratio: Option<i64>,
}

impl From<&ApiRiskLevels> for RiskLevels {
    fn from(raw: &ApiRiskLevels) -> Self {
        let level = |code: Option<i64>| code.map_or(RiskLevel::Unknown, RiskLevel::from_code);
        RiskLevels {
            overall: level(raw.overall),
            test_positivity_ratio: level(raw.test_positivity_ratio),
            case_density: level(raw.case_density),
            infection_rate: level(raw.infection_rate),
            contact_tracer_capacity_ratio: level(raw.contact_tracer_capacity_ratio),
            icu_headroom_ratio: level(raw.icu_headroom_ratio),
        }
    }
}

/// Counts can be null, and daily counts occasionally go negative after
/// upstream corrections
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiActuals {
    pub cases: Option<i64>,
    pub deaths: Option<i64>,
    pub new_cases: Option<i64>,
}

impl From<&ApiActuals> for Actuals {
    fn from(raw: &ApiActuals) -> Self {
        let count = |value: Option<i64>| value.map_or(0, |v| v.max(0) as u64);
        Actuals {
            cases: count(raw.cases),
            deaths: count(raw.deaths),
            new_cases: count(raw.new_cases),
        }
    }
}

/// Parse a `states.json` payload
pub fn parse_states(text: &str, origin: &str) -> Result<Vec<ApiStateRecord>, DataError> {
    serde_json::from_str(text).map_err(|e| DataError::json(origin, e))
}
