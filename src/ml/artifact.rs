//! The trained model artifact and its on-disk layout.
//!
//! An artifact directory holds four files that are only meaningful together:
//!
//! | file            | content                                   |
//! |-----------------|-------------------------------------------|
//! | `words.json`    | sorted vocabulary                         |
//! | `classes.json`  | sorted label set                          |
//! | `model.bin`     | layer weights and biases (bincode)        |
//! | `manifest.json` | version, sizes, checksums, corpus identity |
//!
//! [`ModelArtifact::load`] checks that they agree with each other before
//! anything is served from them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::corpus::CorpusIdentity;
use crate::error::{IntentlyError, Result};
use crate::ml::network::{DenseLayer, LayerRecord, Network};
use crate::vocabulary::{LabelSet, Vocabulary};

/// Version of the artifact layout written by this crate.
pub const FORMAT_VERSION: u32 = 1;

pub const VOCABULARY_FILE: &str = "words.json";
pub const LABELS_FILE: &str = "classes.json";
pub const WEIGHTS_FILE: &str = "model.bin";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Metadata tying the artifact files to a corpus and a normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    /// Corpus the artifact was trained on, when it came from a file.
    pub corpus: Option<CorpusIdentity>,
    pub vocabulary_size: usize,
    pub label_count: usize,
    /// CRC32 of the vocabulary terms in coordinate order.
    pub vocabulary_checksum: u32,
    /// CRC32 of the label tags in index order.
    pub labels_checksum: u32,
    /// Ignore-set used by the training normalizer.
    pub ignore_tokens: Vec<String>,
}

impl ArtifactManifest {
    /// Describe a freshly trained artifact.
    pub fn new(
        vocabulary: &Vocabulary,
        labels: &LabelSet,
        normalizer: &TextNormalizer,
        corpus: Option<CorpusIdentity>,
    ) -> Self {
        ArtifactManifest {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            corpus,
            vocabulary_size: vocabulary.len(),
            label_count: labels.len(),
            vocabulary_checksum: vocabulary.checksum(),
            labels_checksum: labels.checksum(),
            ignore_tokens: normalizer.ignore_tokens(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct NetworkWeights {
    layers: Vec<LayerRecord>,
}

/// Vocabulary, label set, trained network and manifest as one immutable unit.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    vocabulary: Vocabulary,
    labels: LabelSet,
    network: Network,
    manifest: ArtifactManifest,
}

impl ModelArtifact {
    /// Assemble an artifact, rejecting parts that do not fit together.
    pub fn new(
        vocabulary: Vocabulary,
        labels: LabelSet,
        network: Network,
        manifest: ArtifactManifest,
    ) -> Result<Self> {
        let artifact = ModelArtifact {
            vocabulary,
            labels,
            network,
            manifest,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        if self.manifest.format_version != FORMAT_VERSION {
            return Err(IntentlyError::artifact(format!(
                "unsupported format version {} (expected {})",
                self.manifest.format_version, FORMAT_VERSION
            )));
        }
        if self.network.input_dim() != self.vocabulary.len() {
            return Err(IntentlyError::artifact(format!(
                "network expects {} input features but the vocabulary has {} tokens",
                self.network.input_dim(),
                self.vocabulary.len()
            )));
        }
        if self.network.output_dim() != self.labels.len() {
            return Err(IntentlyError::artifact(format!(
                "network produces {} outputs but the label set has {} tags",
                self.network.output_dim(),
                self.labels.len()
            )));
        }
        if self.manifest.vocabulary_size != self.vocabulary.len()
            || self.manifest.label_count != self.labels.len()
        {
            return Err(IntentlyError::artifact(format!(
                "manifest records {} tokens and {} labels, files contain {} and {}",
                self.manifest.vocabulary_size,
                self.manifest.label_count,
                self.vocabulary.len(),
                self.labels.len()
            )));
        }
        // same sizes but different terms would silently remap coordinates
        if self.manifest.vocabulary_checksum != self.vocabulary.checksum() {
            return Err(IntentlyError::artifact(format!(
                "{VOCABULARY_FILE} does not match the vocabulary the model was trained on"
            )));
        }
        if self.manifest.labels_checksum != self.labels.checksum() {
            return Err(IntentlyError::artifact(format!(
                "{LABELS_FILE} does not match the label set the model was trained on"
            )));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn manifest(&self) -> &ArtifactManifest {
        &self.manifest
    }

    /// A normalizer configured exactly like the one used for training.
    pub fn normalizer(&self) -> TextNormalizer {
        TextNormalizer::with_ignore_tokens(self.manifest.ignore_tokens.iter().cloned())
    }

    /// Write all artifact files into `dir`, creating it if needed.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        write_json(&dir.join(VOCABULARY_FILE), &self.vocabulary)?;
        write_json(&dir.join(LABELS_FILE), &self.labels)?;

        let weights = NetworkWeights {
            layers: self.network.layers().iter().map(LayerRecord::from).collect(),
        };
        let mut writer = BufWriter::new(File::create(dir.join(WEIGHTS_FILE))?);
        bincode::serialize_into(&mut writer, &weights)?;
        writer.flush()?;

        write_json(&dir.join(MANIFEST_FILE), &self.manifest)?;

        log::info!(
            "Saved model artifact ({} tokens, {} labels) to {}",
            self.vocabulary.len(),
            self.labels.len(),
            dir.display()
        );
        Ok(())
    }

    /// Load and cross-check an artifact directory.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let vocabulary: Vocabulary = read_json(&dir.join(VOCABULARY_FILE))?;
        let labels: LabelSet = read_json(&dir.join(LABELS_FILE))?;
        let manifest: ArtifactManifest = read_json(&dir.join(MANIFEST_FILE))?;

        let bytes = read_file(&dir.join(WEIGHTS_FILE))?;
        let weights: NetworkWeights = bincode::deserialize(&bytes)?;
        let layers = weights
            .layers
            .into_iter()
            .map(DenseLayer::try_from)
            .collect::<Result<Vec<_>>>()?;
        let network = Network::from_layers(layers)?;

        let artifact = ModelArtifact::new(vocabulary, labels, network, manifest)?;
        log::info!(
            "Loaded model artifact from {} (trained {})",
            dir.display(),
            artifact.manifest.created_at.to_rfc3339()
        );
        Ok(artifact)
    }

    /// Paths of the files making up the artifact in `dir`.
    pub fn files<P: AsRef<Path>>(dir: P) -> [PathBuf; 4] {
        let dir = dir.as_ref();
        [
            dir.join(VOCABULARY_FILE),
            dir.join(LABELS_FILE),
            dir.join(WEIGHTS_FILE),
            dir.join(MANIFEST_FILE),
        ]
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| IntentlyError::artifact(format!("cannot read {}: {e}", path.display())))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_file(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| IntentlyError::artifact(format!("{}: {e}", path.display())))
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
