//! # Intently
//!
//! A small intent-classification chatbot: a bag-of-words feed-forward
//! network trained on labeled example phrases, and an inference layer that
//! maps the predicted intent to a canned response.
//!
//! ## Pipeline
//!
//! - [`analysis`]: tokenize, lowercase, drop punctuation, lemmatize
//! - [`vocabulary`]: sorted vocabulary and label set from a [`corpus`]
//! - [`ml`]: encoding, the network, training and the persisted artifact
//! - [`chatbot`]: ranked intents and responses at inference time
//!
//! ```no_run
//! use intently::config::TrainingConfig;
//! use intently::corpus::Corpus;
//! use intently::ml::{Trainer, rng_from_seed};
//!
//! let corpus = Corpus::from_file("intents.json").unwrap();
//! let trainer = Trainer::new(TrainingConfig::default()).unwrap();
//! trainer.train_to(&corpus, "model", &mut rng_from_seed(Some(42))).unwrap();
//! ```

pub mod analysis;
pub mod chatbot;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod ml;
pub mod vocabulary;

pub mod prelude {
    pub use crate::chatbot::{ChatReply, Chatbot, Predictor, RankedIntent, Responder};
    pub use crate::config::{IntentlyConfig, PredictorConfig, TrainingConfig};
    pub use crate::corpus::{Corpus, Intent};
    pub use crate::error::{IntentlyError, Result};
    pub use crate::ml::{ModelArtifact, Trainer, rng_from_seed};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
