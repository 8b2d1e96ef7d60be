use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        reveal::{PacingError, RevealEngine},
        RevealController, SeededPerturbation,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RevealController>,
}

impl AppState {
    pub fn new(controller: RevealController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }

    /// Wires a controller from configuration
    pub fn from_config(config: &Config) -> Result<Self, PacingError> {
        let options = config.script_options();
        let engine = RevealEngine::new(config.pacing()?, &options.assistant_name);
        let perturbation = SeededPerturbation::new(config.rng_seed);
        Ok(Self::new(RevealController::new(
            engine,
            options,
            Box::new(perturbation),
        )))
    }
}
