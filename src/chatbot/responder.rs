//! Ranked intents → reply text.

use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::chatbot::predictor::RankedIntent;
use crate::config::PredictorConfig;
use crate::corpus::Corpus;

/// Picks a canned response for the top-ranked intent.
#[derive(Debug, Clone)]
pub struct Responder {
    corpus: Arc<Corpus>,
    fallback_message: String,
    error_message: String,
}

impl Responder {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self::with_config(corpus, &PredictorConfig::default())
    }

    pub fn with_config(corpus: Arc<Corpus>, config: &PredictorConfig) -> Self {
        Responder {
            corpus,
            fallback_message: config.fallback_message.clone(),
            error_message: config.error_message.clone(),
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Reply using the thread-local RNG.
    pub fn respond(&self, ranked: &[RankedIntent]) -> String {
        self.respond_with(ranked, &mut rand::rng())
    }

    /// Reply using the given RNG to choose among the intent's responses.
    ///
    /// An empty ranking gets the fallback message; a top tag missing from
    /// the corpus gets the error message.
    pub fn respond_with<R: Rng + ?Sized>(&self, ranked: &[RankedIntent], rng: &mut R) -> String {
        let Some(top) = ranked.first() else {
            return self.fallback_message.clone();
        };

        match self
            .corpus
            .get(&top.intent)
            .and_then(|intent| intent.responses.choose(rng))
        {
            Some(response) => response.clone(),
            None => {
                log::warn!("no response available for intent '{}'", top.intent);
                self.error_message.clone()
            }
        }
    }
}
