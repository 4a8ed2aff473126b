//! Free text → ranked intents.

use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::ml::artifact::ModelArtifact;
use crate::ml::features::encode_input;

/// One entry of a prediction: an intent tag and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIntent {
    pub intent: String,
    pub probability: f32,
}

/// Runs the trained network over user input.
///
/// Cloning is cheap; the artifact is shared.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: Arc<ModelArtifact>,
    normalizer: TextNormalizer,
    threshold: f32,
    reject_unknown_input: bool,
}

impl Predictor {
    /// Predictor with default settings (threshold 0.5).
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self::with_config(artifact, &PredictorConfig::default())
    }

    pub fn with_config(artifact: Arc<ModelArtifact>, config: &PredictorConfig) -> Self {
        let normalizer = artifact.normalizer();
        Predictor {
            artifact,
            normalizer,
            threshold: config.threshold,
            reject_unknown_input: config.reject_unknown_input,
        }
    }

    pub fn artifact(&self) -> &Arc<ModelArtifact> {
        &self.artifact
    }

    /// Default threshold used by [`Predictor::predict_intent`].
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Bag-of-words vector of `text` against the artifact vocabulary.
    pub fn encode(&self, text: &str) -> Result<Array1<f32>> {
        let tokens = self.normalizer.normalize(text)?;
        Ok(encode_input(tokens.as_slice(), self.artifact.vocabulary()))
    }

    /// Intents scoring above the configured threshold, most probable first.
    pub fn predict_intent(&self, text: &str) -> Result<Vec<RankedIntent>> {
        self.predict_intent_with_threshold(text, self.threshold)
    }

    /// Intents scoring strictly above `threshold`, most probable first.
    ///
    /// Equal probabilities keep label-set order. An input sharing no token
    /// with the vocabulary yields an empty list when unknown input is
    /// rejected.
    pub fn predict_intent_with_threshold(
        &self,
        text: &str,
        threshold: f32,
    ) -> Result<Vec<RankedIntent>> {
        let bag = self.encode(text)?;
        if self.reject_unknown_input && bag.iter().all(|&v| v == 0.0) {
            log::debug!("no known token in {text:?}");
            return Ok(Vec::new());
        }

        let mut ranked = self.rank(&bag)?;
        ranked.retain(|entry| entry.probability > threshold);
        Ok(ranked)
    }

    /// The full distribution over every label, most probable first.
    pub fn distribution(&self, text: &str) -> Result<Vec<RankedIntent>> {
        let bag = self.encode(text)?;
        self.rank(&bag)
    }

    fn rank(&self, bag: &Array1<f32>) -> Result<Vec<RankedIntent>> {
        let probabilities = self.artifact.network().predict(bag)?;
        let mut ranked: Vec<RankedIntent> = self
            .artifact
            .labels()
            .tags()
            .iter()
            .zip(probabilities.iter())
            .map(|(tag, &probability)| RankedIntent {
                intent: tag.clone(),
                probability,
            })
            .collect();
        // stable: ties keep label order
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::artifact::ArtifactManifest;
    use crate::ml::network::{Activation, DenseLayer, HIDDEN_UNITS, Network};
    use crate::vocabulary::{LabelSet, Vocabulary};
    use ndarray::{Array2, array};

    /// `scale` on the diagonal of a `rows × cols` matrix, zero elsewhere.
    fn routing(rows: usize, cols: usize, scale: f32) -> Array2<f32> {
        Array2::from_shape_fn((rows, cols), |(r, c)| if r == c { scale } else { 0.0 })
    }

    /// A network that scores `[bye, hello, thanks] → [goodbye, greeting, thanks]`
    /// almost deterministically: each token is routed through the first
    /// hidden units straight to its label.
    fn artifact() -> Arc<ModelArtifact> {
        let vocabulary = Vocabulary::from_tokens(vec!["bye", "hello", "thanks"]);
        let labels = LabelSet::from_tags(vec!["goodbye", "greeting", "thanks"]);

        let [first, second] = HIDDEN_UNITS;
        let layers = vec![
            DenseLayer::new(routing(3, first, 1.0), Array1::zeros(first), Activation::Relu),
            DenseLayer::new(routing(first, second, 1.0), Array1::zeros(second), Activation::Relu),
            DenseLayer::new(routing(second, 3, 10.0), Array1::zeros(3), Activation::Softmax),
        ];
        let layers = layers.into_iter().collect::<Result<Vec<_>>>().unwrap();
        let network = Network::from_layers(layers).unwrap();

        let manifest =
            ArtifactManifest::new(&vocabulary, &labels, &TextNormalizer::new(), None);
        Arc::new(ModelArtifact::new(vocabulary, labels, network, manifest).unwrap())
    }

    #[test]
    fn test_predict_intent_ranks_above_threshold() {
        let predictor = Predictor::new(artifact());
        let ranked = predictor.predict_intent("Hello!").unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].intent, "greeting");
        assert!(ranked[0].probability > 0.99);
    }

    #[test]
    fn test_unknown_input_is_rejected() {
        let predictor = Predictor::new(artifact());
        assert!(predictor.predict_intent("asdkjalksdj").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_input_can_reach_the_network() {
        let config = PredictorConfig {
            reject_unknown_input: false,
            ..PredictorConfig::default()
        };
        let predictor = Predictor::with_config(artifact(), &config);

        // all-zero input: uniform distribution of 1/3
        assert!(predictor.predict_intent_with_threshold("zzz", 0.34).unwrap().is_empty());
        assert_eq!(predictor.predict_intent_with_threshold("zzz", 0.3).unwrap().len(), 3);
    }

    #[test]
    fn test_ties_keep_label_order() {
        let predictor = Predictor::new(artifact());
        let ranked = predictor.distribution("hello bye").unwrap();

        assert_eq!(ranked[0].intent, "goodbye");
        assert_eq!(ranked[1].intent, "greeting");
        assert_eq!(ranked[0].probability, ranked[1].probability);
        assert_eq!(ranked[2].intent, "thanks");
    }

    #[test]
    fn test_threshold_monotonicity() {
        let predictor = Predictor::new(artifact());
        let text = "hello bye thanks";
        let mut previous = usize::MAX;
        for threshold in [0.0f32, 0.1, 0.2, 0.3, 0.34, 0.5, 0.9] {
            let count = predictor.predict_intent_with_threshold(text, threshold).unwrap().len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let predictor = Predictor::new(artifact());
        let ranked = predictor.distribution("thanks").unwrap();
        let total: f32 = ranked.iter().map(|r| r.probability).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert_eq!(predictor.encode("Thanks!").unwrap(), array![0.0f32, 0.0, 1.0]);
    }
}
