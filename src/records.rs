use std::{collections::BTreeMap, num::NonZeroU64};

use chrono::NaiveDate;
use serde::Serialize;

/// Bump whenever a key is added, removed or renamed in an `attributes()`
/// projection below.
pub const ATTRIBUTE_SCHEMA_VERSION: u32 = 1;

/// One value of the flat key/value view handed to the host for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(u64),
    Float(f64),
}

pub type Attributes = BTreeMap<&'static str, AttributeValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidenceRecord {
    pub location: String,
    pub date: NaiveDate,
    /// New cases per 100,000 inhabitants.
    pub incidence: f64,
    pub total_cases: u64,
    pub num_infected: u64,
    pub num_recovered: u64,
    pub num_dead: u64,
}

impl IncidenceRecord {
    /// Headline value shown as the sensor state.
    pub fn state(&self) -> f64 {
        self.incidence
    }

    pub fn attributes(&self) -> Attributes {
        BTreeMap::from([
            ("location", AttributeValue::Text(self.location.clone())),
            ("date", AttributeValue::Text(iso_date(self.date))),
            ("incidence", AttributeValue::Float(self.incidence)),
            ("total_cases", AttributeValue::Integer(self.total_cases)),
            ("num_infected", AttributeValue::Integer(self.num_infected)),
            ("num_recovered", AttributeValue::Integer(self.num_recovered)),
            ("num_dead", AttributeValue::Integer(self.num_dead)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccinationRecord {
    pub date: NaiveDate,
    pub total_vaccinations: u64,
    pub num_vaccinated_once: u64,
    pub num_vaccinated_full: u64,
    pub num_vaccinated_booster: u64,
    pub ratio_vaccinated_once: f64,
    pub ratio_vaccinated_full: f64,
    pub ratio_vaccinated_total: f64,
    pub ratio_vaccinated_booster: f64,
}

/// Absolute counts as scraped, before ratios are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaccinationCounts {
    pub total_vaccinations: u64,
    /// `None` when the page only reports totals and full vaccinations.
    pub num_vaccinated_once: Option<u64>,
    pub num_vaccinated_full: u64,
    pub num_vaccinated_booster: u64,
}

impl VaccinationRecord {
    /// Derives the once-vaccinated count if needed and every ratio against
    /// `population`.
    pub fn build(date: NaiveDate, counts: VaccinationCounts, population: NonZeroU64) -> Self {
        let num_vaccinated_once = counts.num_vaccinated_once.unwrap_or_else(|| {
            if counts.num_vaccinated_full > counts.total_vaccinations {
                log::warn!(
                    "full vaccinations ({}) exceed total ({}), once-vaccinated count set to 0",
                    counts.num_vaccinated_full,
                    counts.total_vaccinations
                );
            }
            counts
                .total_vaccinations
                .saturating_sub(counts.num_vaccinated_full)
        });

        let ratio_vaccinated_once = ratio(num_vaccinated_once, population);
        let ratio_vaccinated_full = ratio(counts.num_vaccinated_full, population);
        Self {
            date,
            total_vaccinations: counts.total_vaccinations,
            num_vaccinated_once,
            num_vaccinated_full: counts.num_vaccinated_full,
            num_vaccinated_booster: counts.num_vaccinated_booster,
            ratio_vaccinated_once,
            ratio_vaccinated_full,
            ratio_vaccinated_total: ratio_vaccinated_once + ratio_vaccinated_full,
            ratio_vaccinated_booster: ratio(counts.num_vaccinated_booster, population),
        }
    }

    pub fn state(&self) -> u64 {
        self.total_vaccinations
    }

    pub fn attributes(&self) -> Attributes {
        BTreeMap::from([
            ("date", AttributeValue::Text(iso_date(self.date))),
            ("total_vaccinations", AttributeValue::Integer(self.total_vaccinations)),
            ("num_vaccinated_once", AttributeValue::Integer(self.num_vaccinated_once)),
            ("num_vaccinated_full", AttributeValue::Integer(self.num_vaccinated_full)),
            ("num_vaccinated_booster", AttributeValue::Integer(self.num_vaccinated_booster)),
            ("ratio_vaccinated_once", AttributeValue::Float(self.ratio_vaccinated_once)),
            ("ratio_vaccinated_full", AttributeValue::Float(self.ratio_vaccinated_full)),
            ("ratio_vaccinated_total", AttributeValue::Float(self.ratio_vaccinated_total)),
            ("ratio_vaccinated_booster", AttributeValue::Float(self.ratio_vaccinated_booster)),
        ])
    }
}

/// Percentage of `population`.
fn ratio(count: u64, population: NonZeroU64) -> f64 {
    count as f64 / population.get() as f64 * 100.0
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
