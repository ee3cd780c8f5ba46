//! "What is this city?" lookups
//!
//! The real lookup is an external service. The engine only relies on the
//! contract: text or a failure, and a failure is never a game error.

use crate::error::FactError;
use crate::game::cheat::fabricate_fact;
use crate::game::random::{RandomSource, ThreadRandom};
use std::sync::Arc;

/// External provider of short city descriptions.
pub trait FactProvider: Send + Sync {
    /// A fact about a real city.
    fn fetch_fact(&self, city: &str) -> Result<String, FactError>;

    /// An invented fact backing up a fake city.
    fn fabricate_fact(&self, city: &str) -> Result<String, FactError>;
}

/// Provider with no network access: real lookups are unavailable, invented
/// facts come from fixed templates.
pub struct OfflineFacts {
    rng: Arc<dyn RandomSource>,
}

impl OfflineFacts {
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }
}

impl Default for OfflineFacts {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl FactProvider for OfflineFacts {
    fn fetch_fact(&self, _city: &str) -> Result<String, FactError> {
        Err(FactError::Unavailable)
    }

    fn fabricate_fact(&self, city: &str) -> Result<String, FactError> {
        Ok(fabricate_fact(city, self.rng.as_ref()))
    }
}
