//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::chatbot::{ChatReply, RankedIntent};
use crate::cli::args::{IntentlyArgs, OutputFormat};

/// Human-readable rendering of a command result.
pub trait HumanReadable {
    fn render_human(&self) -> String;
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub output_dir: String,
    pub epochs: usize,
    pub examples: usize,
    pub vocabulary_size: usize,
    pub intents: usize,
    pub final_accuracy: Option<f32>,
    pub final_val_accuracy: Option<f32>,
    pub duration_ms: u64,
}

/// Result structure for a one-shot prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(flatten)]
    pub reply: ChatReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<RankedIntent>>,
}

/// Model artifact description.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub path: String,
    pub format_version: u32,
    pub created_at: String,
    pub corpus_path: Option<String>,
    pub corpus_checksum: Option<String>,
    pub vocabulary_size: usize,
    pub labels: Vec<String>,
    pub layers: Vec<String>,
    pub ignore_tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<String>>,
}

fn percent(value: Option<f32>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}

fn render_ranking(out: &mut String, title: &str, ranking: &[RankedIntent]) {
    let _ = writeln!(out, "{title}:");
    if ranking.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for entry in ranking {
        let _ = writeln!(out, "  {:<24} {:.4}", entry.intent, entry.probability);
    }
}

impl HumanReadable for TrainingSummary {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model written to: {}", self.output_dir);
        let _ = writeln!(out, "Epochs: {}", self.epochs);
        let _ = writeln!(out, "Training examples: {}", self.examples);
        let _ = writeln!(out, "Vocabulary size: {}", self.vocabulary_size);
        let _ = writeln!(out, "Intents: {}", self.intents);
        let _ = writeln!(out, "Final training accuracy: {}", percent(self.final_accuracy));
        let _ = writeln!(
            out,
            "Final validation accuracy: {}",
            percent(self.final_val_accuracy)
        );
        let _ = write!(out, "Training time: {}ms", self.duration_ms);
        out
    }
}

impl HumanReadable for ChatReply {
    fn render_human(&self) -> String {
        self.response.clone()
    }
}

impl HumanReadable for PredictionResult {
    fn render_human(&self) -> String {
        let mut out = String::new();
        render_ranking(&mut out, "Intents", &self.reply.intents);
        if let Some(distribution) = &self.distribution {
            render_ranking(&mut out, "Distribution", distribution);
        }
        let _ = write!(out, "Response: {}", self.reply.response);
        out
    }
}

impl HumanReadable for ModelInfo {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model: {}", self.path);
        let _ = writeln!(out, "Format version: {}", self.format_version);
        let _ = writeln!(out, "Created: {}", self.created_at);
        if let (Some(path), Some(checksum)) = (&self.corpus_path, &self.corpus_checksum) {
            let _ = writeln!(out, "Corpus: {path} (crc32 {checksum})");
        }
        let _ = writeln!(out, "Vocabulary size: {}", self.vocabulary_size);
        let _ = writeln!(out, "Ignore tokens: {}", self.ignore_tokens.join(" "));
        let _ = writeln!(out, "Layers:");
        for layer in &self.layers {
            let _ = writeln!(out, "  {layer}");
        }
        let _ = write!(out, "Labels ({}): {}", self.labels.len(), self.labels.join(", "));
        if let Some(vocabulary) = &self.vocabulary {
            let _ = write!(out, "\nVocabulary: {}", vocabulary.join(" "));
        }
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanReadable>(
    message: &str,
    result: &T,
    args: &IntentlyArgs,
) -> serde_json::Result<()> {
    println!("{}", format_result(message, result, args)?);
    Ok(())
}

/// Render a result in the specified format.
pub fn format_result<T: Serialize + HumanReadable>(
    message: &str,
    result: &T,
    args: &IntentlyArgs,
) -> serde_json::Result<String> {
    match args.output_format {
        OutputFormat::Human => Ok(format_human(message, result, args)),
        OutputFormat::Json => format_json(result, args),
    }
}

fn format_human<T: HumanReadable>(message: &str, result: &T, args: &IntentlyArgs) -> String {
    if args.verbosity() > 1 && !message.is_empty() {
        format!("{message}\n\n{}", result.render_human())
    } else {
        result.render_human()
    }
}

fn format_json<T: Serialize>(result: &T, args: &IntentlyArgs) -> serde_json::Result<String> {
    if args.pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn reply() -> ChatReply {
        ChatReply {
            message: "hi".to_string(),
            response: "Hello!".to_string(),
            intents: vec![RankedIntent {
                intent: "greeting".to_string(),
                probability: 0.5,
            }],
        }
    }

    #[test]
    fn test_prediction_json_is_flat() {
        let args =
            IntentlyArgs::try_parse_from(["intently", "-f", "json", "inspect", "-m", "m"]).unwrap();
        let result = PredictionResult {
            reply: reply(),
            distribution: None,
        };

        let json = format_result("", &result, &args).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["message"], "hi");
        assert_eq!(value["intents"][0]["intent"], "greeting");
        assert!(value.get("distribution").is_none());
    }

    #[test]
    fn test_human_prediction() {
        let args = IntentlyArgs::try_parse_from(["intently", "inspect", "-m", "m"]).unwrap();
        let result = PredictionResult {
            reply: reply(),
            distribution: None,
        };

        let text = format_result("Prediction", &result, &args).unwrap();
        assert!(text.starts_with("Intents:\n  greeting"));
        assert!(text.ends_with("Response: Hello!"));
    }

    #[test]
    fn test_verbose_human_output_has_header() {
        let args = IntentlyArgs::try_parse_from(["intently", "-v", "inspect", "-m", "m"]).unwrap();
        let text = format_result("Prediction", &reply(), &args).unwrap();
        assert_eq!(text, "Prediction\n\nHello!");
    }
}
