//! 14-day case density projection
//!
//! Each day every infected person infects `infection_rate / 14` new people
//! and `1 / 14` of the infected recover. Densities are per 100k population.

use thiserror::Error;

/// Number of projected days after the current one
pub const PROJECTION_DAYS: usize = 14;

/// Days an infection lasts; also the divisor for the daily infection rate
const INFECTIOUS_DAYS: f64 = 14.0;

const PER_CAPITA: f64 = 100_000.0;

/// Current density followed by one value per projected day
pub type ProjectedDensity = [f64; PROJECTION_DAYS + 1];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("invalid projection input: {0}")]
    InvalidInput(&'static str),
}

/// Project case density over the next [`PROJECTION_DAYS`] days.
///
/// Requires `current >= 0`, `population > 0` and `infection_rate >= 0`, all
/// finite. The result starts with `current` unchanged.
pub fn project(
    current: f64,
    population: u64,
    infection_rate: f64,
) -> Result<ProjectedDensity, ProjectionError> {
    if population == 0 {
        return Err(ProjectionError::InvalidInput("population must be positive"));
    }
    if !current.is_finite() || current < 0.0 {
        return Err(ProjectionError::InvalidInput("case density must be finite and non-negative"));
    }
    if !infection_rate.is_finite() || infection_rate < 0.0 {
        return Err(ProjectionError::InvalidInput("infection rate must be finite and non-negative"));
    }

    let scale = population as f64 / PER_CAPITA;
    let mut series = [0.0; PROJECTION_DAYS + 1];
    series[0] = current;

    let mut infected = current * scale;
    for day in series.iter_mut().skip(1) {
        let recovered = infected / INFECTIOUS_DAYS;
        let new_infected = infected * (infection_rate / INFECTIOUS_DAYS);
        infected = infected + new_infected - recovered;
        *day = infected / scale;
    }

    if series.iter().any(|v| !v.is_finite()) {
        return Err(ProjectionError::InvalidInput("projection overflowed"));
    }

    Ok(series)
}
