//! Training pipeline: corpus → vocabulary, labels and fitted network.

use std::fmt;
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::config::TrainingConfig;
use crate::corpus::Corpus;
use crate::error::{IntentlyError, Result};
use crate::ml::artifact::{ArtifactManifest, ModelArtifact, write_json};
use crate::ml::features::TrainingSet;
use crate::ml::network::Network;
use crate::ml::optimizer::Sgd;
use crate::vocabulary::{self, BuildOutput};

pub const HISTORY_FILE: &str = "training_history.json";
pub const REPORT_FILE: &str = "training_report.txt";

/// Seeded RNG when a seed is given, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Metrics of a single epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    pub loss: f32,
    pub accuracy: f32,
    /// `None` when the validation slice is empty.
    pub val_loss: Option<f32>,
    pub val_accuracy: Option<f32>,
}

/// Per-epoch metric series.
///
/// Validation series stay empty when there was nothing to validate on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub accuracy: Vec<f32>,
    pub loss: Vec<f32>,
    pub val_accuracy: Vec<f32>,
    pub val_loss: Vec<f32>,
}

impl TrainingHistory {
    pub fn record(&mut self, metrics: EpochMetrics) {
        self.accuracy.push(metrics.accuracy);
        self.loss.push(metrics.loss);
        if let Some(val_accuracy) = metrics.val_accuracy {
            self.val_accuracy.push(val_accuracy);
        }
        if let Some(val_loss) = metrics.val_loss {
            self.val_loss.push(val_loss);
        }
    }

    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    pub fn final_accuracy(&self) -> Option<f32> {
        self.accuracy.last().copied()
    }

    pub fn final_val_accuracy(&self) -> Option<f32> {
        self.val_accuracy.last().copied()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub history: TrainingHistory,
}

impl TrainingOutcome {
    pub fn report(&self) -> TrainingReport {
        TrainingReport::new(&self.artifact, &self.history)
    }
}

/// Human-readable summary written next to the artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub date: String,
    pub epochs: usize,
    pub final_accuracy: Option<f32>,
    pub final_val_accuracy: Option<f32>,
    pub vocabulary_size: usize,
    pub intent_count: usize,
}

impl TrainingReport {
    pub fn new(artifact: &ModelArtifact, history: &TrainingHistory) -> Self {
        TrainingReport {
            date: artifact
                .manifest()
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            epochs: history.epochs(),
            final_accuracy: history.final_accuracy(),
            final_val_accuracy: history.final_val_accuracy(),
            vocabulary_size: artifact.vocabulary().len(),
            intent_count: artifact.labels().len(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

fn fmt_accuracy(value: Option<f32>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CHATBOT TRAINING REPORT")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Epochs: {}", self.epochs)?;
        writeln!(f, "Final Training Accuracy: {}", fmt_accuracy(self.final_accuracy))?;
        writeln!(
            f,
            "Final Validation Accuracy: {}",
            fmt_accuracy(self.final_val_accuracy)
        )?;
        writeln!(f, "Vocabulary Size: {}", self.vocabulary_size)?;
        writeln!(f, "Number of Intents: {}", self.intent_count)
    }
}

/// Fits the classifier on a corpus.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    normalizer: TextNormalizer,
}

impl Trainer {
    /// Create a trainer; the configuration is validated here.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = TextNormalizer::with_ignore_tokens(config.ignore_tokens.iter().cloned());
        Ok(Trainer { config, normalizer })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Train a model in memory.
    ///
    /// Fails before fitting when the vocabulary is empty or fewer than two
    /// labels have patterns.
    pub fn train<R: Rng>(&self, corpus: &Corpus, rng: &mut R) -> Result<TrainingOutcome> {
        let BuildOutput {
            vocabulary,
            labels,
            documents,
        } = vocabulary::build(corpus, &self.normalizer)?;

        if vocabulary.is_empty() {
            return Err(IntentlyError::training(
                "vocabulary is empty: no pattern contains a usable token",
            ));
        }
        if labels.len() < 2 {
            return Err(IntentlyError::training(format!(
                "at least 2 intents with patterns are required, found {}",
                labels.len()
            )));
        }

        let mut examples = TrainingSet::encode(&documents, &vocabulary, &labels)?;
        examples.shuffle(rng);
        let (mut train_set, validation_set) = examples.split(self.config.validation_split);
        let (val_x, val_y) = validation_set.to_matrices();

        log::info!(
            "Training on {} examples ({} held out): {} tokens, {} intents, {} epochs",
            train_set.len(),
            validation_set.len(),
            vocabulary.len(),
            labels.len(),
            self.config.epochs
        );

        let mut network = Network::new(vocabulary.len(), labels.len(), rng);
        let mut optimizer = Sgd::new(self.config.sgd());
        let mut history = TrainingHistory::default();

        for epoch in 1..=self.config.epochs {
            train_set.shuffle(rng);

            let mut loss_sum = 0.0f32;
            let mut correct = 0usize;
            for (x, y) in train_set.batches(self.config.batch_size) {
                let batch =
                    network.train_batch(&x, &y, self.config.dropout, &mut optimizer, rng)?;
                loss_sum += batch.loss * batch.size as f32;
                correct += batch.correct;
            }

            let seen = train_set.len().max(1) as f32;
            let mut metrics = EpochMetrics {
                loss: loss_sum / seen,
                accuracy: correct as f32 / seen,
                val_loss: None,
                val_accuracy: None,
            };
            if !validation_set.is_empty() {
                let val = network.evaluate(&val_x, &val_y)?;
                metrics.val_loss = Some(val.loss);
                metrics.val_accuracy = Some(val.correct as f32 / val.size as f32);
            }

            log::debug!(
                "epoch {epoch}/{}: loss {:.4}, accuracy {:.4}, val_loss {}, val_accuracy {}",
                self.config.epochs,
                metrics.loss,
                metrics.accuracy,
                metrics.val_loss.map_or("n/a".to_string(), |v| format!("{v:.4}")),
                fmt_accuracy(metrics.val_accuracy)
            );
            history.record(metrics);
        }

        let manifest = ArtifactManifest::new(
            &vocabulary,
            &labels,
            &self.normalizer,
            corpus.identity().cloned(),
        );
        let artifact = ModelArtifact::new(vocabulary, labels, network, manifest)?;

        log::info!(
            "Training finished: accuracy {}, val_accuracy {}",
            fmt_accuracy(history.final_accuracy()),
            fmt_accuracy(history.final_val_accuracy())
        );

        Ok(TrainingOutcome { artifact, history })
    }

    /// Train and write the artifact, history and report into `output_dir`.
    pub fn train_to<R: Rng, P: AsRef<Path>>(
        &self,
        corpus: &Corpus,
        output_dir: P,
        rng: &mut R,
    ) -> Result<TrainingOutcome> {
        let output_dir = output_dir.as_ref();
        let outcome = self.train(corpus, rng)?;

        outcome.artifact.save(output_dir)?;
        outcome.history.save(output_dir.join(HISTORY_FILE))?;
        outcome.report().save(output_dir.join(REPORT_FILE))?;

        Ok(outcome)
    }
}
