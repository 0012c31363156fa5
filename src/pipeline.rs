use std::fmt;

use log::{debug, error, info};

use crate::error::{CrawlError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Fetching,
    Located,
    Extracting,
    Built,
    Failed(ErrorKind),
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Failed(kind) => write!(f, "Failed({kind:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Tracks one run of a statistic pipeline and logs its transitions.
///
/// `Idle -> Fetching -> Located -> Extracting -> Built`, or `Failed` from
/// wherever the first error happened. Nothing is retried.
#[derive(Debug)]
pub struct Pipeline {
    name: &'static str,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn advance(&mut self, next: PipelineState) {
        debug!("{} pipeline: {} -> {}", self.name, self.state, next);
        self.state = next;
    }

    /// Moves into the terminal state matching `result`.
    pub fn finish<T: fmt::Debug>(&mut self, result: Result<T, CrawlError>) -> Result<T, CrawlError> {
        match &result {
            Ok(record) => {
                self.advance(PipelineState::Built);
                info!("{} pipeline built {record:?}", self.name);
            }
            Err(e) => {
                error!("{} pipeline failed while {}: {e}", self.name, self.state);
                self.state = PipelineState::Failed(e.kind());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_ends_built() {
        let mut pipeline = Pipeline::new("test");
        assert_eq!(pipeline.state(), PipelineState::Idle);
        pipeline.advance(PipelineState::Fetching);
        pipeline.advance(PipelineState::Located);
        pipeline.advance(PipelineState::Extracting);
        assert_eq!(pipeline.finish(Ok(1)).unwrap(), 1);
        assert_eq!(pipeline.state(), PipelineState::Built);
    }

    #[test]
    fn test_failure_records_kind() {
        let mut pipeline = Pipeline::new("test");
        pipeline.advance(PipelineState::Fetching);
        let result: Result<(), _> = pipeline.finish(Err(CrawlError::ContainerNotFound {
            selector: "#c1".to_string(),
        }));
        assert!(result.is_err());
        assert_eq!(
            pipeline.state(),
            PipelineState::Failed(ErrorKind::ContainerNotFound)
        );
        assert_eq!(pipeline.state().to_string(), "Failed(ContainerNotFound)");
    }
}
