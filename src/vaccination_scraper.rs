use std::num::NonZeroU64;

use log::debug;

use crate::{
    config::CrawlerConfig,
    dates::resolve_date_fields,
    error::CrawlError,
    extractor::{Fields, PatternSet},
    numbers::GERMAN,
    page::{Locator, Page},
    pipeline::{Pipeline, PipelineState},
    records::{VaccinationCounts, VaccinationRecord},
    text_manipulators::extract_text,
};

const PATTERNS: &[&str] = &[
    r"(?P<total_vaccinations>\d[\d.]*)\s+Impfungen",
    r"(?P<num_vaccinated_full>\d[\d.]*)\s+Personen\s+(?:sind\s+)?(?:bereits\s+)?vollständig",
    r"(?P<num_vaccinated_once>\d[\d.]*)\s+Personen\s+(?:sind\s+)?(?:bereits\s+)?(?:einmal|erstmals)",
    r"(?P<num_vaccinated_booster>\d[\d.]*)\s+Auffrischungsimpfungen",
    r"Stand:?\s*(?P<day>\d{1,2})\.\s*(?P<month>\p{L}+)\s+(?P<year>\d{4})",
];

const REQUIRED: &[&str] = &[
    "total_vaccinations",
    "num_vaccinated_full",
    "num_vaccinated_booster",
    "day",
    "month",
    "year",
];

/// Reads the vaccination page, where every figure sits in one container.
#[derive(Debug)]
pub struct VaccinationScraper {
    container: Locator,
    population: NonZeroU64,
    patterns: PatternSet,
}

impl VaccinationScraper {
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            container: Locator::Id(config.vaccination_container_id.clone()),
            population: NonZeroU64::new(config.population).ok_or_else(|| {
                CrawlError::InvalidConfig {
                    reason: "population must be greater than zero".to_string(),
                }
            })?,
            patterns: PatternSet::new(PATTERNS, REQUIRED)?,
        })
    }

    pub fn scrape(
        &self,
        html: &str,
        default_year: i32,
        pipeline: &mut Pipeline,
    ) -> Result<VaccinationRecord, CrawlError> {
        let page = Page::parse(html);
        let container = page.locate(&self.container)?;
        pipeline.advance(PipelineState::Located);

        let text = extract_text(container);
        debug!("Vaccination data text: {text}");

        pipeline.advance(PipelineState::Extracting);
        let fields = self.patterns.extract(&text)?;
        self.build(&fields, default_year)
    }

    fn build(&self, fields: &Fields, default_year: i32) -> Result<VaccinationRecord, CrawlError> {
        let date = resolve_date_fields(fields, &GERMAN, default_year)?;
        let num_vaccinated_once = if fields.contains("num_vaccinated_once") {
            Some(fields.integer("num_vaccinated_once", &GERMAN)?)
        } else {
            None
        };
        let counts = VaccinationCounts {
            total_vaccinations: fields.integer("total_vaccinations", &GERMAN)?,
            num_vaccinated_once,
            num_vaccinated_full: fields.integer("num_vaccinated_full", &GERMAN)?,
            num_vaccinated_booster: fields.integer("num_vaccinated_booster", &GERMAN)?,
        };
        Ok(VaccinationRecord::build(date, counts, self.population))
    }
}
