mod crawler;
mod error;
mod extractor;
mod incidence_scraper;
mod pipeline;
mod text_manipulators;
mod vaccination_scraper;

pub mod config;
pub mod dates;
pub mod numbers;
pub mod page;
pub mod records;
pub mod requests;

pub use config::CrawlerConfig;
pub use crawler::{AttributeReport, CrawlReport, Crawler};
pub use error::{CrawlError, ErrorKind};
pub use extractor::{Fields, PatternSet};
pub use incidence_scraper::IncidenceScraper;
pub use pipeline::{Pipeline, PipelineState};
pub use records::{IncidenceRecord, VaccinationRecord};
pub use requests::{RequestClient, Transport, TransportResponse};
pub use vaccination_scraper::VaccinationScraper;
