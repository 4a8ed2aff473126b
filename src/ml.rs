//! Machine learning core of the chatbot.
//!
//! - [`features`]: bag-of-words and one-hot encoding
//! - [`network`]: the fixed dense classifier and its back-propagation
//! - [`optimizer`]: SGD with Nesterov momentum
//! - [`trainer`]: end-to-end training and reporting
//! - [`artifact`]: the persisted model and its consistency checks

pub mod artifact;
pub mod features;
pub mod network;
pub mod optimizer;
pub mod trainer;

pub use artifact::{ArtifactManifest, ModelArtifact};
pub use features::{TrainingExample, TrainingSet, encode_input, encode_label};
pub use network::{Activation, BatchMetrics, DenseLayer, Network};
pub use optimizer::{Sgd, SgdConfig};
pub use trainer::{Trainer, TrainingHistory, TrainingOutcome, TrainingReport, rng_from_seed};
