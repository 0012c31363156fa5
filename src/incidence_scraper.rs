use log::debug;

use crate::{
    config::CrawlerConfig,
    dates::resolve_date_fields,
    error::CrawlError,
    extractor::{Fields, PatternSet},
    numbers::GERMAN,
    page::{Locator, Page, next_sibling_with_class},
    pipeline::{Pipeline, PipelineState},
    records::IncidenceRecord,
    text_manipulators::extract_text,
};

// "1.234,5" must match as a whole, not from "234,5".
const INCIDENCE_PATTERNS: &[&str] =
    &[r"(?P<incidence>\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?)\s*Neuinfektion"];

// The headline used to read "Fallzahlen (17. August)" before the "Stand:" form.
const DATE_PATTERNS: &[&str] = &[
    r"Stand:?\s*(?P<day>\d{1,2})\.\s*(?P<month>\p{L}+)(?:\s+(?P<year>\d{4}))?",
    r"\((?P<day>\d{1,2})\.\s*(?P<month>\p{L}+)(?:\s+(?P<year>\d{4}))?\)",
];

const CASE_PATTERNS: &[&str] = &[
    r"Insgesamt:\s*(?P<total_cases>\d[\d.]*)",
    r"genesen:\s*(?P<num_recovered>\d[\d.]*)",
    r"infiziert:\s*(?P<num_infected>\d[\d.]*)",
    r"verstorben:\s*(?P<num_dead>\d[\d.]*)",
];

/// Reads the incidence page: a headline container holding the incidence
/// (`<p>`) and the reporting date (`<h2>`), followed by a sibling block with
/// the case counts.
#[derive(Debug)]
pub struct IncidenceScraper {
    location: String,
    container: Locator,
    cases_class: String,
    incidence_patterns: PatternSet,
    date_patterns: PatternSet,
    case_patterns: PatternSet,
}

impl IncidenceScraper {
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            location: config.location.clone(),
            container: Locator::Id(config.incidence_container_id.clone()),
            cases_class: config.cases_container_class.clone(),
            incidence_patterns: PatternSet::new(INCIDENCE_PATTERNS, &["incidence"])?,
            date_patterns: PatternSet::new(DATE_PATTERNS, &["day", "month"])?,
            case_patterns: PatternSet::new(CASE_PATTERNS, &[])?,
        })
    }

    pub fn scrape(
        &self,
        html: &str,
        default_year: i32,
        pipeline: &mut Pipeline,
    ) -> Result<IncidenceRecord, CrawlError> {
        let page = Page::parse(html);
        let container = page.locate(&self.container)?;
        let incidence_block = page.locate_within(container, &Locator::Tag("p".to_string()))?;
        let headline = page.locate_within(container, &Locator::Tag("h2".to_string()))?;
        let cases_block = next_sibling_with_class(container, &self.cases_class)?;
        pipeline.advance(PipelineState::Located);

        let incidence_text = extract_text(incidence_block);
        let date_text = extract_text(headline);
        let cases_text = extract_text(cases_block);
        debug!("Infection data text: {incidence_text}");
        debug!("Date text: {date_text}");
        debug!("Infection counts text: {cases_text}");

        pipeline.advance(PipelineState::Extracting);
        let mut fields = self.incidence_patterns.extract(&incidence_text)?;
        fields.merge(self.date_patterns.extract(&date_text)?);
        fields.merge(self.case_patterns.extract(&cases_text)?);

        self.build(&fields, default_year)
    }

    fn build(&self, fields: &Fields, default_year: i32) -> Result<IncidenceRecord, CrawlError> {
        Ok(IncidenceRecord {
            location: self.location.clone(),
            date: resolve_date_fields(fields, &GERMAN, default_year)?,
            incidence: fields.float("incidence", &GERMAN)?,
            total_cases: fields.integer("total_cases", &GERMAN)?,
            num_infected: fields.integer("num_infected", &GERMAN)?,
            num_recovered: fields.integer("num_recovered", &GERMAN)?,
            num_dead: fields.integer("num_dead", &GERMAN)?,
        })
    }
}
