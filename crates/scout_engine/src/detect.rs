use scout_core::{FirstSeen, Identified};
use scout_logging::scout_debug;

use crate::Document;

/// One independent heuristic producing candidate records.
pub trait Detector<R> {
    fn name(&self) -> &'static str;
    fn detect(&self, doc: &Document) -> Vec<R>;
}

/// Ordered detectors whose outputs are merged first-seen-wins by identity.
pub struct DetectorPipeline<R> {
    detectors: Vec<Box<dyn Detector<R>>>,
}

impl<R> Default for DetectorPipeline<R> {
    fn default() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }
}

impl<R: Identified> DetectorPipeline<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, detector: impl Detector<R> + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn run(&self, doc: &Document) -> Vec<R> {
        let mut merged = FirstSeen::new();
        for detector in &self.detectors {
            let candidates = detector.detect(doc);
            let found = candidates.len();
            let kept = merged.extend(candidates);
            scout_debug!(
                "detector {} found {} candidates, kept {}",
                detector.name(),
                found,
                kept
            );
        }
        merged.into_vec()
    }
}
