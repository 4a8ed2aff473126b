use std::fs;
use std::path::Path;

use intently::config::TrainingConfig;
use intently::corpus::Corpus;
use intently::error::{IntentlyError, Result};
use intently::ml::artifact::{LABELS_FILE, MANIFEST_FILE, VOCABULARY_FILE, WEIGHTS_FILE};
use intently::ml::network::{Activation, DenseLayer, LayerRecord};
use intently::ml::trainer::{HISTORY_FILE, REPORT_FILE};
use intently::ml::{ModelArtifact, Trainer, TrainingHistory, rng_from_seed};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

const SMALL: &str = r#"{"intents": [
    {"tag": "greeting", "patterns": ["Hello", "Hi"], "responses": ["Hi!"]},
    {"tag": "goodbye", "patterns": ["Bye"], "responses": ["See you!"]}
]}"#;

const LARGER: &str = r#"{"intents": [
    {"tag": "greeting", "patterns": ["Hello", "Hi", "Good morning"], "responses": ["Hi!"]},
    {"tag": "goodbye", "patterns": ["Bye", "See you"], "responses": ["See you!"]},
    {"tag": "thanks", "patterns": ["Thank you"], "responses": ["Welcome!"]}
]}"#;

fn train(dir: &Path, json: &str) -> Result<()> {
    let corpus_path = dir.join("intents.json");
    fs::write(&corpus_path, json)?;
    let corpus = Corpus::from_file(&corpus_path)?;

    let trainer = Trainer::new(TrainingConfig {
        epochs: 3,
        ..TrainingConfig::default()
    })?;
    trainer.train_to(&corpus, dir.join("model"), &mut rng_from_seed(Some(1)))?;
    Ok(())
}

#[test]
fn training_writes_every_file() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;
    let model = dir.path().join("model");

    for file in ModelArtifact::files(&model) {
        assert!(file.is_file(), "{} missing", file.display());
    }

    let words: Vec<String> = serde_json::from_str(&fs::read_to_string(model.join(VOCABULARY_FILE))?)?;
    assert_eq!(words, vec!["bye", "hello", "hi"]);
    let classes: Vec<String> = serde_json::from_str(&fs::read_to_string(model.join(LABELS_FILE))?)?;
    assert_eq!(classes, vec!["goodbye", "greeting"]);

    let history: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(model.join(HISTORY_FILE))?)?;
    for key in ["accuracy", "loss", "val_accuracy", "val_loss"] {
        assert!(history.get(key).is_some(), "history lacks {key}");
    }
    let history: TrainingHistory = serde_json::from_value(history)?;
    assert_eq!(history.epochs(), 3);

    let report = fs::read_to_string(model.join(REPORT_FILE))?;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "CHATBOT TRAINING REPORT");
    assert_eq!(lines[1], "=======================");
    assert!(lines[2].starts_with("Date: "));
    assert_eq!(lines[3], "Epochs: 3");
    assert!(lines[4].starts_with("Final Training Accuracy: "));
    assert!(lines[5].starts_with("Final Validation Accuracy: "));
    assert_eq!(lines[6], "Vocabulary Size: 3");
    assert_eq!(lines[7], "Number of Intents: 2");
    Ok(())
}

#[test]
fn manifest_records_corpus_identity() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;

    let artifact = ModelArtifact::load(dir.path().join("model"))?;
    let identity = artifact.manifest().corpus.as_ref().unwrap();
    assert_eq!(identity.checksum, crc32fast::hash(SMALL.as_bytes()));
    assert_eq!(artifact.manifest().ignore_tokens, vec!["!", ",", ".", "?"]);
    Ok(())
}

#[test]
fn mismatched_vocabulary_fails_at_load() -> Result<()> {
    let small = TempDir::new().unwrap();
    let larger = TempDir::new().unwrap();
    train(small.path(), SMALL)?;
    train(larger.path(), LARGER)?;

    // words.json from another model: weights no longer fit the vocabulary
    fs::copy(
        larger.path().join("model").join(VOCABULARY_FILE),
        small.path().join("model").join(VOCABULARY_FILE),
    )?;

    let result = ModelArtifact::load(small.path().join("model"));
    assert!(matches!(result, Err(IntentlyError::Artifact(_))));
    Ok(())
}

#[test]
fn mismatched_labels_fail_at_load() -> Result<()> {
    let small = TempDir::new().unwrap();
    let larger = TempDir::new().unwrap();
    train(small.path(), SMALL)?;
    train(larger.path(), LARGER)?;

    fs::copy(
        larger.path().join("model").join(LABELS_FILE),
        small.path().join("model").join(LABELS_FILE),
    )?;

    assert!(ModelArtifact::load(small.path().join("model")).is_err());
    Ok(())
}

#[test]
fn unsorted_vocabulary_fails_at_load() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;
    let model = dir.path().join("model");

    fs::write(model.join(VOCABULARY_FILE), r#"["hi", "hello", "bye"]"#)?;
    assert!(matches!(
        ModelArtifact::load(&model),
        Err(IntentlyError::Artifact(_))
    ));
    Ok(())
}

#[test]
fn corrupt_manifest_fails_at_load() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;
    let model = dir.path().join("model");

    fs::write(model.join(MANIFEST_FILE), "{}")?;
    assert!(ModelArtifact::load(&model).is_err());
    Ok(())
}

#[test]
fn single_layer_weights_fail_at_load() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;
    let model = dir.path().join("model");

    // dimensions still match words.json and classes.json, only the shape is wrong
    let layer = DenseLayer::glorot(3, 2, Activation::Softmax, &mut StdRng::seed_from_u64(9));
    let records = vec![LayerRecord::from(&layer)];
    fs::write(model.join(WEIGHTS_FILE), bincode::serialize(&records)?)?;

    assert!(matches!(
        ModelArtifact::load(&model),
        Err(IntentlyError::Artifact(_))
    ));
    Ok(())
}

#[test]
fn same_size_vocabulary_swap_fails_at_load() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;
    let model = dir.path().join("model");

    fs::write(model.join(VOCABULARY_FILE), r#"["bye", "hello", "hey"]"#)?;
    assert!(matches!(
        ModelArtifact::load(&model),
        Err(IntentlyError::Artifact(_))
    ));
    Ok(())
}

#[test]
fn same_size_label_swap_fails_at_load() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train(dir.path(), SMALL)?;
    let model = dir.path().join("model");

    fs::write(model.join(LABELS_FILE), r#"["goodbye", "welcome"]"#)?;
    assert!(matches!(
        ModelArtifact::load(&model),
        Err(IntentlyError::Artifact(_))
    ));
    Ok(())
}
