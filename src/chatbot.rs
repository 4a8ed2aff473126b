//! Inference boundary: text in, ranked intents and a reply out.
//!
//! [`Predictor`] and [`Responder`] can be used on their own; [`Chatbot`]
//! pairs them over one artifact and one corpus.
//!
//! # Examples
//!
//! ```no_run
//! use intently::chatbot::Chatbot;
//! use intently::config::PredictorConfig;
//!
//! let bot = Chatbot::load("model", "intents.json", PredictorConfig::default()).unwrap();
//! let reply = bot.reply("Hello!").unwrap();
//! println!("{} ({} intents)", reply.response, reply.intents.len());
//! ```

pub mod predictor;
pub mod responder;

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PredictorConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::ml::artifact::ModelArtifact;

pub use predictor::{Predictor, RankedIntent};
pub use responder::Responder;

/// Everything produced for one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub response: String,
    pub intents: Vec<RankedIntent>,
}

/// A predictor and a responder sharing one artifact and corpus.
#[derive(Debug, Clone)]
pub struct Chatbot {
    predictor: Predictor,
    responder: Responder,
}

impl Chatbot {
    /// Pair an artifact with a corpus.
    ///
    /// Drift between the two (a different corpus checksum, labels without
    /// an intent) is logged, not rejected.
    pub fn new(
        artifact: Arc<ModelArtifact>,
        corpus: Arc<Corpus>,
        config: PredictorConfig,
    ) -> Result<Self> {
        config.validate()?;
        check_drift(&artifact, &corpus);

        Ok(Chatbot {
            predictor: Predictor::with_config(artifact, &config),
            responder: Responder::with_config(corpus, &config),
        })
    }

    /// Load the artifact directory and the intents file.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        model_dir: P,
        intents_path: Q,
        config: PredictorConfig,
    ) -> Result<Self> {
        let artifact = ModelArtifact::load(model_dir)?;
        let corpus = Corpus::from_file(intents_path)?;
        Self::new(Arc::new(artifact), Arc::new(corpus), config)
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Classify `text` and pick a response.
    pub fn reply(&self, text: &str) -> Result<ChatReply> {
        self.reply_with(text, &mut rand::rng())
    }

    pub fn reply_with<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<ChatReply> {
        let intents = self.predictor.predict_intent(text)?;
        let response = self.responder.respond_with(&intents, rng);
        Ok(ChatReply {
            message: text.to_string(),
            response,
            intents,
        })
    }
}

fn check_drift(artifact: &ModelArtifact, corpus: &Corpus) {
    if let (Some(trained), Some(current)) = (&artifact.manifest().corpus, corpus.identity()) {
        if trained.checksum != current.checksum {
            log::warn!(
                "intents file {} differs from the one the model was trained on ({}); \
                 consider retraining",
                current.path,
                trained.path
            );
        }
    }

    for tag in artifact.labels().tags() {
        if !corpus.contains(tag) {
            log::warn!("label '{tag}' has no intent in the corpus");
        }
    }
}
