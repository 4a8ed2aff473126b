//! Configuration for training and inference.
//!
//! Every field has a default, so a config file only needs to name the values
//! it changes:
//!
//! ```json
//! { "training": { "epochs": 200, "seed": 42 }, "predictor": { "threshold": 0.3 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::token_filter::DEFAULT_IGNORE_TOKENS;
use crate::error::{IntentlyError, Result};
use crate::ml::optimizer::SgdConfig;

/// Reply used when no intent clears the threshold.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, I didn't understand that. Could you rephrase?";

/// Reply used when the predicted tag has no intent in the corpus.
pub const DEFAULT_ERROR_MESSAGE: &str = "Sorry, something went wrong.";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentlyConfig {
    pub training: TrainingConfig,
    pub predictor: PredictorConfig,
}

impl IntentlyConfig {
    /// Load and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: IntentlyConfig = serde_json::from_str(&content).map_err(|e| {
            IntentlyError::invalid_config(format!("{}: {e}", path.as_ref().display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;
        self.predictor.validate()
    }
}

/// Hyper-parameters of the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Passes over the training slice.
    pub epochs: usize,
    /// Examples per gradient step.
    pub batch_size: usize,
    pub learning_rate: f32,
    pub momentum: f32,
    pub nesterov: bool,
    /// Trailing fraction of the shuffled set held out for validation.
    pub validation_split: f64,
    /// Dropout rate after each hidden layer.
    pub dropout: f32,
    /// Seed for initialization, shuffling and dropout. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Tokens dropped by the normalizer and excluded from the vocabulary.
    pub ignore_tokens: Vec<String>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let sgd = SgdConfig::default();
        TrainingConfig {
            epochs: 150,
            batch_size: 8,
            learning_rate: sgd.learning_rate,
            momentum: sgd.momentum,
            nesterov: sgd.nesterov,
            validation_split: 0.1,
            dropout: 0.5,
            seed: None,
            ignore_tokens: DEFAULT_IGNORE_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TrainingConfig {
    /// Optimizer settings.
    pub fn sgd(&self) -> SgdConfig {
        SgdConfig {
            learning_rate: self.learning_rate,
            momentum: self.momentum,
            nesterov: self.nesterov,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(IntentlyError::invalid_config("epochs must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(IntentlyError::invalid_config("batch_size must be at least 1"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(IntentlyError::invalid_config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(IntentlyError::invalid_config(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(IntentlyError::invalid_config(format!(
                "validation_split must be in [0, 1), got {}",
                self.validation_split
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(IntentlyError::invalid_config(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        Ok(())
    }
}

/// Settings of the predictor and responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Intents must score strictly above this probability.
    pub threshold: f32,
    /// Return no intents for input that shares no token with the vocabulary.
    pub reject_unknown_input: bool,
    pub fallback_message: String,
    pub error_message: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig {
            threshold: 0.5,
            reject_unknown_input: true,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(IntentlyError::invalid_config(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
