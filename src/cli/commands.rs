//! Command implementations for the Intently CLI.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::chatbot::Chatbot;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::IntentlyConfig;
use crate::corpus::Corpus;
use crate::ml::artifact::ModelArtifact;
use crate::ml::trainer::{Trainer, rng_from_seed};

/// Lines that end an interactive chat.
const EXIT_COMMANDS: [&str; 2] = ["quit", "exit"];

/// Execute a CLI command.
pub fn execute_command(args: IntentlyArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Chat(chat_args) => chat(chat_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<IntentlyConfig> {
    match path {
        Some(path) => IntentlyConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(IntentlyConfig::default()),
    }
}

/// Train a model and write it to the output directory.
fn train(args: &TrainArgs, cli_args: &IntentlyArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.training.seed = Some(seed);
    }
    if let Some(epochs) = args.epochs {
        config.training.epochs = epochs;
    }

    let corpus = Corpus::from_file(&args.intents)
        .with_context(|| format!("failed to load intents from {}", args.intents.display()))?;
    let trainer = Trainer::new(config.training.clone()).context("invalid training configuration")?;

    let start_time = Instant::now();
    let mut rng = rng_from_seed(config.training.seed);
    let outcome = trainer
        .train_to(&corpus, &args.output, &mut rng)
        .with_context(|| format!("training failed for {}", args.intents.display()))?;

    let summary = TrainingSummary {
        output_dir: args.output.display().to_string(),
        epochs: outcome.history.epochs(),
        examples: corpus.pattern_count(),
        vocabulary_size: outcome.artifact.vocabulary().len(),
        intents: outcome.artifact.labels().len(),
        final_accuracy: outcome.history.final_accuracy(),
        final_val_accuracy: outcome.history.final_val_accuracy(),
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    output_result("Training complete", &summary, cli_args)?;
    Ok(())
}

fn load_chatbot(
    model: &Path,
    intents: &Path,
    config: Option<&Path>,
    threshold: Option<f32>,
) -> Result<Chatbot> {
    let mut config = load_config(config)?;
    if let Some(threshold) = threshold {
        config.predictor.threshold = threshold;
    }

    let artifact = ModelArtifact::load(model)
        .with_context(|| format!("failed to load model from {}", model.display()))?;
    let corpus = Corpus::from_file(intents)
        .with_context(|| format!("failed to load intents from {}", intents.display()))?;

    Ok(Chatbot::new(
        Arc::new(artifact),
        Arc::new(corpus),
        config.predictor,
    )?)
}

/// Classify one message.
fn predict(args: &PredictArgs, cli_args: &IntentlyArgs) -> Result<()> {
    let bot = load_chatbot(
        &args.model,
        &args.intents,
        args.config.as_deref(),
        args.threshold,
    )?;

    let reply = bot.reply(&args.text)?;
    let distribution = if args.all {
        Some(bot.predictor().distribution(&args.text)?)
    } else {
        None
    };

    output_result(
        "Prediction",
        &PredictionResult {
            reply,
            distribution,
        },
        cli_args,
    )?;
    Ok(())
}

/// Read messages from standard input until EOF or an exit command.
fn chat(args: &ChatArgs, cli_args: &IntentlyArgs) -> Result<()> {
    let bot = load_chatbot(
        &args.model,
        &args.intents,
        args.config.as_deref(),
        args.threshold,
    )?;
    let mut rng = rng_from_seed(args.seed);
    let interactive = cli_args.output_format == OutputFormat::Human;

    if interactive && cli_args.verbosity() > 0 {
        println!("Type a message, or 'quit' to leave.");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(stdout, "you> ")?;
            stdout.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&message.to_lowercase().as_str()) {
            break;
        }

        let reply = bot.reply_with(message, &mut rng)?;
        if interactive {
            println!("bot> {}", reply.render_human());
        } else {
            output_result("", &reply, cli_args)?;
        }
    }

    Ok(())
}

/// Describe a trained model.
fn inspect(args: &InspectArgs, cli_args: &IntentlyArgs) -> Result<()> {
    let artifact = ModelArtifact::load(&args.model)
        .with_context(|| format!("failed to load model from {}", args.model.display()))?;
    let manifest = artifact.manifest();

    let layers = artifact
        .network()
        .layers()
        .iter()
        .map(|layer| {
            format!(
                "{} -> {} ({:?})",
                layer.input_dim(),
                layer.output_dim(),
                layer.activation()
            )
        })
        .collect();

    let info = ModelInfo {
        path: args.model.display().to_string(),
        format_version: manifest.format_version,
        created_at: manifest.created_at.to_rfc3339(),
        corpus_path: manifest.corpus.as_ref().map(|c| c.path.clone()),
        corpus_checksum: manifest.corpus.as_ref().map(|c| format!("{:08x}", c.checksum)),
        vocabulary_size: artifact.vocabulary().len(),
        labels: artifact.labels().tags().to_vec(),
        layers,
        ignore_tokens: manifest.ignore_tokens.clone(),
        vocabulary: args.vocabulary.then(|| artifact.vocabulary().tokens().to_vec()),
    };

    output_result("Model", &info, cli_args)?;
    Ok(())
}
