//! Join raw API records with the state lookup and enrich them with projections

use std::fmt;

use cv_core::{Actuals, Fips, Metrics, ProjectionError, RiskLevels, StateRecord};
use tracing::{debug, info, warn};

use crate::lookup::StateCodeLookup;
use crate::schema::ApiStateRecord;

/// Why a raw record did not make it into the working set
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// The state code has no lookup entry (territories, aggregate rows)
    UnknownStateCode,
    /// Case density or infection rate is missing
    MissingMetrics,
    /// The FIPS code is not numeric
    InvalidFips,
    InvalidProjection(ProjectionError),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::UnknownStateCode => f.write_str("state code not in lookup"),
            DropReason::MissingMetrics => f.write_str("missing case density or infection rate"),
            DropReason::InvalidFips => f.write_str("invalid FIPS code"),
            DropReason::InvalidProjection(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRecord {
    pub code: String,
    pub reason: DropReason,
}

/// Records that joined cleanly, in input order, plus everything filtered out
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    pub records: Vec<StateRecord>,
    pub dropped: Vec<DroppedRecord>,
}

/// Turn raw records into enriched [`StateRecord`]s.
///
/// Records whose state code is missing from the lookup are filtered out
/// without failing the load, as are records without usable metrics or with
/// a population the projection rejects.
pub fn join_records(raw: Vec<ApiStateRecord>, lookup: &StateCodeLookup) -> JoinOutcome {
    let mut outcome = JoinOutcome::default();

    for record in raw {
        let code = record.state.clone();
        match join_one(record, lookup) {
            Ok(joined) => outcome.records.push(joined),
            Err(reason) => {
                match &reason {
                    DropReason::InvalidProjection(_) | DropReason::InvalidFips => {
                        warn!(%code, %reason, "Dropping record")
                    }
                    _ => debug!(%code, %reason, "Dropping record"),
                }
                outcome.dropped.push(DroppedRecord { code, reason });
            }
        }
    }

    info!(
        joined = outcome.records.len(),
        dropped = outcome.dropped.len(),
        "Joined state metrics with lookup"
    );
    outcome
}

fn join_one(record: ApiStateRecord, lookup: &StateCodeLookup) -> Result<StateRecord, DropReason> {
    let name = lookup
        .name(&record.state)
        .ok_or(DropReason::UnknownStateCode)?
        .to_string();

    let raw_metrics = record.metrics.as_ref().ok_or(DropReason::MissingMetrics)?;
    let (Some(case_density), Some(infection_rate)) =
        (raw_metrics.case_density, raw_metrics.infection_rate)
    else {
        return Err(DropReason::MissingMetrics);
    };

    let fips = record.fips.parse().map(Fips).ok_or(DropReason::InvalidFips)?;

    let metrics = Metrics {
        case_density,
        infection_rate,
        test_positivity_ratio: raw_metrics.test_positivity_ratio,
        contact_tracer_capacity_ratio: raw_metrics.contact_tracer_capacity_ratio,
        icu_headroom_ratio: raw_metrics.icu_headroom_ratio,
    };
    let risk_levels = record
        .risk_levels
        .as_ref()
        .map(RiskLevels::from)
        .unwrap_or_default();
    let actuals = record.actuals.as_ref().map(Actuals::from).unwrap_or_default();

    StateRecord::new(
        fips,
        record.state,
        name,
        record.population.unwrap_or(0),
        metrics,
        risk_levels,
        actuals,
    )
    .map(|joined| joined.with_last_updated(record.last_updated_date))
    .map_err(DropReason::InvalidProjection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_states;

    fn lookup() -> StateCodeLookup {
        [("AL", "Alabama"), ("AK", "Alaska"), ("AZ", "Arizona")]
            .into_iter()
            .collect()
    }

    fn raw(json: &str) -> Vec<ApiStateRecord> {
        parse_states(json, "test").unwrap()
    }

    #[test]
    fn test_unknown_code_is_excluded() {
        let input = raw(r#"[
            {"fips": "01", "state": "AL", "population": 4903185,
             "metrics": {"caseDensity": 20.0, "infectionRate": 1.0},
             "actuals": {"cases": 100, "deaths": 5, "newCases": 2}},
            {"fips": "99", "state": "ZZ", "population": 1000,
             "metrics": {"caseDensity": 1.0, "infectionRate": 1.0}},
            {"fips": "02", "state": "AK", "population": 731545,
             "metrics": {"caseDensity": 3.0, "infectionRate": 0.8}}
        ]"#);
        let input_count = input.len();

        let outcome = join_records(input, &lookup());

        assert_eq!(outcome.dropped.len(), 1);
        assert_eq!(outcome.dropped[0].code, "ZZ");
        assert_eq!(outcome.dropped[0].reason, DropReason::UnknownStateCode);
        assert_eq!(outcome.records.len(), input_count - outcome.dropped.len());

        let codes: Vec<&str> = outcome.records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AL", "AK"]);
        assert_eq!(outcome.records[0].name, "Alabama");
        assert_eq!(outcome.records[0].fips, Fips(1));
        assert_eq!(outcome.records[0].actuals.cases, 100);
        assert_eq!(outcome.records[0].projected_density()[0], 20.0);
    }

    #[test]
    fn test_missing_metrics_are_excluded() {
        let outcome = join_records(
            raw(r#"[
                {"fips": "01", "state": "AL", "population": 10, "metrics": null},
                {"fips": "02", "state": "AK", "population": 10, "metrics": {"caseDensity": 1.0}}
            ]"#),
            &lookup(),
        );
        assert!(outcome.records.is_empty());
        assert!(outcome
            .dropped
            .iter()
            .all(|d| d.reason == DropReason::MissingMetrics));
    }

    #[test]
    fn test_zero_population_is_invalid_projection() {
        let outcome = join_records(
            raw(r#"[{"fips": "04", "state": "AZ", "population": 0,
                     "metrics": {"caseDensity": 1.0, "infectionRate": 1.0}}]"#),
            &lookup(),
        );
        assert!(outcome.records.is_empty());
        assert!(matches!(
            outcome.dropped[0].reason,
            DropReason::InvalidProjection(ProjectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_fips() {
        let outcome = join_records(
            raw(r#"[{"fips": "AL", "state": "AL", "population": 10,
                     "metrics": {"caseDensity": 1.0, "infectionRate": 1.0}}]"#),
            &lookup(),
        );
        assert_eq!(outcome.dropped[0].reason, DropReason::InvalidFips);
    }

    #[test]
    fn test_missing_risk_levels_default_to_unknown() {
        let outcome = join_records(
            raw(r#"[{"fips": "01", "state": "al", "population": 10,
                     "metrics": {"caseDensity": 1.0, "infectionRate": 1.0}}]"#),
            &lookup(),
        );
        let record = &outcome.records[0];
        assert_eq!(record.risk_levels, RiskLevels::default());
        assert_eq!(record.actuals, Actuals::default());
        assert_eq!(record.name, "Alabama");
    }
}
