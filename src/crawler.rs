use std::collections::BTreeMap;

use log::info;
use serde::Serialize;

use crate::{
    config::CrawlerConfig,
    dates::current_year,
    error::CrawlError,
    incidence_scraper::IncidenceScraper,
    pipeline::{Pipeline, PipelineState},
    records::{ATTRIBUTE_SCHEMA_VERSION, Attributes, IncidenceRecord, VaccinationRecord},
    requests::{Transport, fetch_page},
    vaccination_scraper::VaccinationScraper,
};

/// Host-facing entry point: owns the settings, the compiled page patterns and
/// the transport used for every fetch.
pub struct Crawler<T: Transport> {
    config: CrawlerConfig,
    transport: T,
    incidence_scraper: IncidenceScraper,
    vaccination_scraper: VaccinationScraper,
}

impl<T: Transport> Crawler<T> {
    pub fn new(config: CrawlerConfig, transport: T) -> Result<Self, CrawlError> {
        let incidence_scraper = IncidenceScraper::new(&config)?;
        let vaccination_scraper = VaccinationScraper::new(&config)?;
        Ok(Self {
            config,
            transport,
            incidence_scraper,
            vaccination_scraper,
        })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub async fn crawl_incidence(&self) -> Result<IncidenceRecord, CrawlError> {
        self.incidence_outcome().await.0
    }

    pub async fn crawl_vaccination(&self) -> Result<VaccinationRecord, CrawlError> {
        self.vaccination_outcome().await.0
    }

    /// Runs both pipelines concurrently. A failure in one leaves the other
    /// untouched.
    pub async fn crawl_all(&self) -> CrawlReport {
        let ((incidence, incidence_state), (vaccination, vaccination_state)) =
            futures::join!(self.incidence_outcome(), self.vaccination_outcome());
        CrawlReport {
            incidence,
            incidence_state,
            vaccination,
            vaccination_state,
        }
    }

    async fn incidence_outcome(&self) -> (Result<IncidenceRecord, CrawlError>, PipelineState) {
        info!("Fetching COVID-19 incidence update");
        let mut pipeline = Pipeline::new("incidence");
        let result = self.run_incidence(&mut pipeline).await;
        let result = pipeline.finish(result);
        (result, pipeline.state())
    }

    async fn vaccination_outcome(
        &self,
    ) -> (Result<VaccinationRecord, CrawlError>, PipelineState) {
        info!("Fetching COVID-19 vaccination update");
        let mut pipeline = Pipeline::new("vaccination");
        let result = self.run_vaccination(&mut pipeline).await;
        let result = pipeline.finish(result);
        (result, pipeline.state())
    }

    async fn run_incidence(&self, pipeline: &mut Pipeline) -> Result<IncidenceRecord, CrawlError> {
        pipeline.advance(PipelineState::Fetching);
        let html = fetch_page(
            &self.transport,
            &self.config.incidence_url,
            self.config.request_timeout,
        )
        .await?;
        self.incidence_scraper.scrape(&html, current_year(), pipeline)
    }

    async fn run_vaccination(
        &self,
        pipeline: &mut Pipeline,
    ) -> Result<VaccinationRecord, CrawlError> {
        pipeline.advance(PipelineState::Fetching);
        let html = fetch_page(
            &self.transport,
            &self.config.vaccination_url,
            self.config.request_timeout,
        )
        .await?;
        self.vaccination_scraper.scrape(&html, current_year(), pipeline)
    }
}

/// Independent outcome of each statistic pipeline, with the state each
/// pipeline ended in (`Built` or `Failed`).
#[derive(Debug)]
pub struct CrawlReport {
    pub incidence: Result<IncidenceRecord, CrawlError>,
    pub incidence_state: PipelineState,
    pub vaccination: Result<VaccinationRecord, CrawlError>,
    pub vaccination_state: PipelineState,
}

/// The `{"incidence": {...}, "vaccination": {...}}` view handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeReport {
    pub schema_version: u32,
    #[serde(flatten)]
    pub records: BTreeMap<&'static str, Attributes>,
}

impl CrawlReport {
    /// Attributes of the records that were built; failed pipelines are left
    /// out so the host keeps whatever it showed before.
    pub fn attributes(&self) -> AttributeReport {
        let mut records = BTreeMap::new();
        if let Ok(record) = &self.incidence {
            records.insert("incidence", record.attributes());
        }
        if let Ok(record) = &self.vaccination {
            records.insert("vaccination", record.attributes());
        }
        AttributeReport {
            schema_version: ATTRIBUTE_SCHEMA_VERSION,
            records,
        }
    }

    pub fn errors(&self) -> Vec<&CrawlError> {
        [self.incidence.as_ref().err(), self.vaccination.as_ref().err()]
            .into_iter()
            .flatten()
            .collect()
    }
}
