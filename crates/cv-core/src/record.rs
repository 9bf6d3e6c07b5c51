//! Per-state records and the value types they carry

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::projection::{self, ProjectedDensity, ProjectionError};

/// Numeric FIPS code identifying a state-level region
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fips(pub u32);

impl fmt::Display for Fips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Categorical risk severity as published upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    Unknown,
    Extreme,
}

impl RiskLevel {
    /// Decode an upstream severity code. Codes outside 0..=5 are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Low,
            1 => Self::Medium,
            2 => Self::High,
            3 => Self::Critical,
            5 => Self::Extreme,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
            Self::Unknown => 4,
            Self::Extreme => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
            Self::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current metrics for a state
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Cases per 100k population
    pub case_density: f64,
    pub infection_rate: f64,
    pub test_positivity_ratio: Option<f64>,
    pub contact_tracer_capacity_ratio: Option<f64>,
    pub icu_headroom_ratio: Option<f64>,
}

/// Risk levels for the overall picture and each contributing metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskLevels {
    pub overall: RiskLevel,
    pub test_positivity_ratio: RiskLevel,
    pub case_density: RiskLevel,
    pub infection_rate: RiskLevel,
    pub contact_tracer_capacity_ratio: RiskLevel,
    pub icu_headroom_ratio: RiskLevel,
}

impl RiskLevels {
    /// Labeled rows in display order
    pub fn rows(&self) -> [(&'static str, RiskLevel); 6] {
        [
            ("Overall", self.overall),
            ("Test positivity ratio", self.test_positivity_ratio),
            ("Case density", self.case_density),
            ("Infection rate", self.infection_rate),
            ("Contact tracer capacity ratio", self.contact_tracer_capacity_ratio),
            ("ICU headroom ratio", self.icu_headroom_ratio),
        ]
    }
}

/// Cumulative and daily case counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actuals {
    pub cases: u64,
    pub deaths: u64,
    pub new_cases: u64,
}

impl Actuals {
    pub fn get(&self, metric: BarMetric) -> u64 {
        match metric {
            BarMetric::Cases => self.cases,
            BarMetric::Deaths => self.deaths,
            BarMetric::NewCases => self.new_cases,
        }
    }
}

/// Field of [`Actuals`] the bar chart ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarMetric {
    #[default]
    Cases,
    Deaths,
    NewCases,
}

impl BarMetric {
    pub const ALL: [BarMetric; 3] = [BarMetric::Cases, BarMetric::Deaths, BarMetric::NewCases];

    /// Upstream field name
    pub fn key(self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::Deaths => "deaths",
            Self::NewCases => "newCases",
        }
    }
}

impl fmt::Display for BarMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One state's metrics, joined with its display name and enriched with the
/// 14-day projection.
///
/// The projection is computed once in [`StateRecord::new`] from
/// `(case_density, population, infection_rate)` and is not recomputed;
/// records are treated as immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub fips: Fips,
    /// Two-letter state code
    pub code: String,
    /// Display name from the state code lookup
    pub name: String,
    pub population: u64,
    pub metrics: Metrics,
    pub risk_levels: RiskLevels,
    pub actuals: Actuals,
    pub last_updated: Option<NaiveDate>,
    projected_density: ProjectedDensity,
}

impl StateRecord {
    pub fn new(
        fips: Fips,
        code: impl Into<String>,
        name: impl Into<String>,
        population: u64,
        metrics: Metrics,
        risk_levels: RiskLevels,
        actuals: Actuals,
    ) -> Result<Self, ProjectionError> {
        let projected_density =
            projection::project(metrics.case_density, population, metrics.infection_rate)?;

        Ok(Self {
            fips,
            code: code.into(),
            name: name.into(),
            population,
            metrics,
            risk_levels,
            actuals,
            last_updated: None,
            projected_density,
        })
    }

    pub fn with_last_updated(mut self, date: Option<NaiveDate>) -> Self {
        self.last_updated = date;
        self
    }

    /// Index 0 is the current density, index `i` the density after `i` days
    pub fn projected_density(&self) -> &ProjectedDensity {
        &self.projected_density
    }

    /// Run the projection engine on this record's own density, population and rate
    pub fn project(&self) -> Result<ProjectedDensity, ProjectionError> {
        projection::project(self.metrics.case_density, self.population, self.metrics.infection_rate)
    }

    pub fn actual(&self, metric: BarMetric) -> u64 {
        self.actuals.get(metric)
    }
}
