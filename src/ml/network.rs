//! Feed-forward classifier network.
//!
//! The architecture is fixed:
//!
//! ```text
//! input (V) → dense 128 ReLU → dropout → dense 64 ReLU → dropout → dense C softmax
//! ```
//!
//! Dropout is inverted dropout and only applies inside
//! [`Network::train_batch`]; [`Network::predict`] is deterministic.
//! The loss is categorical cross-entropy, whose gradient with respect to the
//! softmax pre-activations is simply `(p - y) / n`.

use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{IntentlyError, Result};
use crate::ml::optimizer::Sgd;

/// Widths of the hidden layers.
pub const HIDDEN_UNITS: [usize; 2] = [128, 64];

/// Probabilities are clipped to `[EPSILON, 1 - EPSILON]` before the log.
pub const EPSILON: f32 = 1e-7;

/// Layer activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Rectified linear unit.
    Relu,
    /// Row-wise softmax.
    Softmax,
}

impl Activation {
    fn apply(self, z: &Array2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => z.mapv(|v| v.max(0.0)),
            Activation::Softmax => softmax_rows(z.clone()),
        }
    }
}

fn softmax_rows(mut z: Array2<f32>) -> Array2<f32> {
    for mut row in z.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    z
}

/// A fully connected layer computing `activation(x · W + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    /// Shape `(input_dim, output_dim)`.
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

impl DenseLayer {
    /// Create a layer from explicit parameters.
    pub fn new(weights: Array2<f32>, bias: Array1<f32>, activation: Activation) -> Result<Self> {
        if bias.len() != weights.ncols() {
            return Err(IntentlyError::DimensionMismatch {
                expected: weights.ncols(),
                actual: bias.len(),
            });
        }
        Ok(DenseLayer {
            weights,
            bias,
            activation,
        })
    }

    /// Glorot-uniform kernel, zero bias.
    pub fn glorot<R: Rng>(
        input_dim: usize,
        output_dim: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (input_dim + output_dim) as f32).sqrt();
        let weights =
            Array2::from_shape_fn((input_dim, output_dim), |_| rng.random_range(-limit..limit));
        DenseLayer {
            weights,
            bias: Array1::zeros(output_dim),
            activation,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_dim(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub(crate) fn params_mut(&mut self) -> (&mut Array2<f32>, &mut Array1<f32>) {
        (&mut self.weights, &mut self.bias)
    }

    fn pre_activation(&self, x: &Array2<f32>) -> Array2<f32> {
        x.dot(&self.weights) + &self.bias
    }

    /// Forward pass over a batch of row vectors.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        self.activation.apply(&self.pre_activation(x))
    }
}

/// Persisted form of a [`DenseLayer`]; weights are row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub input_dim: usize,
    pub output_dim: usize,
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl From<&DenseLayer> for LayerRecord {
    fn from(layer: &DenseLayer) -> Self {
        LayerRecord {
            input_dim: layer.input_dim(),
            output_dim: layer.output_dim(),
            weights: layer.weights.iter().copied().collect(),
            bias: layer.bias.to_vec(),
            activation: layer.activation,
        }
    }
}

impl TryFrom<LayerRecord> for DenseLayer {
    type Error = IntentlyError;

    fn try_from(record: LayerRecord) -> Result<Self> {
        let weights = Array2::from_shape_vec((record.input_dim, record.output_dim), record.weights)?;
        DenseLayer::new(weights, Array1::from_vec(record.bias), record.activation)
    }
}

/// Gradients of the loss with respect to one layer's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Array2<f32>,
    pub bias: Array1<f32>,
}

/// Loss and accuracy numbers for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchMetrics {
    /// Mean cross-entropy over the batch.
    pub loss: f32,
    /// Rows whose arg-max prediction matches the target.
    pub correct: usize,
    /// Rows in the batch.
    pub size: usize,
}

struct ForwardCache {
    /// Input of every layer, plus the final output.
    activations: Vec<Array2<f32>>,
    pre_activations: Vec<Array2<f32>>,
    /// Scaled keep-masks applied to each layer's output, if any.
    masks: Vec<Option<Array2<f32>>>,
}

/// The bag-of-words → intent classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<DenseLayer>,
}

impl Network {
    /// Build the fixed architecture with freshly initialized weights.
    pub fn new<R: Rng>(input_dim: usize, output_dim: usize, rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(HIDDEN_UNITS.len() + 1);
        let mut fan_in = input_dim;
        for units in HIDDEN_UNITS {
            layers.push(DenseLayer::glorot(fan_in, units, Activation::Relu, rng));
            fan_in = units;
        }
        layers.push(DenseLayer::glorot(fan_in, output_dim, Activation::Softmax, rng));
        Network { layers }
    }

    /// Assemble a network from existing layers.
    ///
    /// The layers must form the fixed architecture: one ReLU layer per
    /// entry of [`HIDDEN_UNITS`] with exactly that width, then a softmax
    /// output layer, each consuming the previous layer's output.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.len() != HIDDEN_UNITS.len() + 1 {
            return Err(IntentlyError::artifact(format!(
                "expected {} layers, found {}",
                HIDDEN_UNITS.len() + 1,
                layers.len()
            )));
        }
        let (last, hidden) = layers
            .split_last()
            .ok_or_else(|| IntentlyError::artifact("network has no layers"))?;
        if last.activation != Activation::Softmax {
            return Err(IntentlyError::artifact("output layer must use softmax"));
        }
        for (i, (layer, units)) in hidden.iter().zip(HIDDEN_UNITS).enumerate() {
            if layer.activation != Activation::Relu {
                return Err(IntentlyError::artifact(format!(
                    "hidden layer {i} must use ReLU"
                )));
            }
            if layer.output_dim() != units {
                return Err(IntentlyError::artifact(format!(
                    "hidden layer {i} has {} units, expected {units}",
                    layer.output_dim()
                )));
            }
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_dim() != pair[1].input_dim() {
                return Err(IntentlyError::artifact(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].output_dim(),
                    i + 1,
                    pair[1].input_dim()
                )));
            }
        }
        Ok(Network { layers })
    }

    /// Width of the bag-of-words input.
    pub fn input_dim(&self) -> usize {
        self.layers[0].input_dim()
    }

    /// Number of output classes.
    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].output_dim()
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    /// Probability distribution over labels for a single input vector.
    pub fn predict(&self, input: &Array1<f32>) -> Result<Array1<f32>> {
        let batch = input.clone().insert_axis(Axis(0));
        let probs = self.predict_batch(&batch)?;
        Ok(probs.row(0).to_owned())
    }

    /// Probability distributions for a batch of row vectors.
    pub fn predict_batch(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        self.check_input(x)?;
        let mut out = x.clone();
        for layer in &self.layers {
            out = layer.forward(&out);
        }
        Ok(out)
    }

    /// Mean loss and correct count of the current weights on a batch,
    /// without dropout.
    pub fn evaluate(&self, x: &Array2<f32>, y: &Array2<f32>) -> Result<BatchMetrics> {
        let probs = self.predict_batch(x)?;
        Ok(BatchMetrics {
            loss: categorical_crossentropy(&probs, y),
            correct: count_correct(&probs, y),
            size: x.nrows(),
        })
    }

    /// Back-propagate one batch and return per-layer gradients (in layer
    /// order) together with the batch metrics measured during the forward
    /// pass.
    pub fn compute_gradients<R: Rng>(
        &self,
        x: &Array2<f32>,
        y: &Array2<f32>,
        dropout_rate: f32,
        rng: &mut R,
    ) -> Result<(Vec<LayerGradients>, BatchMetrics)> {
        self.check_input(x)?;
        if y.ncols() != self.output_dim() {
            return Err(IntentlyError::DimensionMismatch {
                expected: self.output_dim(),
                actual: y.ncols(),
            });
        }

        let cache = self.forward_train(x, dropout_rate, rng);
        let probs = &cache.activations[self.layers.len()];
        let metrics = BatchMetrics {
            loss: categorical_crossentropy(probs, y),
            correct: count_correct(probs, y),
            size: x.nrows(),
        };

        Ok((self.backward(&cache, y), metrics))
    }

    /// One optimizer step on a batch.
    pub fn train_batch<R: Rng>(
        &mut self,
        x: &Array2<f32>,
        y: &Array2<f32>,
        dropout_rate: f32,
        optimizer: &mut Sgd,
        rng: &mut R,
    ) -> Result<BatchMetrics> {
        let (gradients, metrics) = self.compute_gradients(x, y, dropout_rate, rng)?;
        optimizer.step(self.layers_mut(), &gradients);
        Ok(metrics)
    }

    fn check_input(&self, x: &Array2<f32>) -> Result<()> {
        if x.ncols() != self.input_dim() {
            return Err(IntentlyError::DimensionMismatch {
                expected: self.input_dim(),
                actual: x.ncols(),
            });
        }
        Ok(())
    }

    fn forward_train<R: Rng>(&self, x: &Array2<f32>, dropout_rate: f32, rng: &mut R) -> ForwardCache {
        let last = self.layers.len() - 1;
        let keep = 1.0 - dropout_rate;

        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut masks = Vec::with_capacity(self.layers.len());
        activations.push(x.clone());

        for (i, layer) in self.layers.iter().enumerate() {
            let z = layer.pre_activation(&activations[i]);
            let mut a = layer.activation.apply(&z);

            if i < last && dropout_rate > 0.0 {
                let mask = Array2::from_shape_fn(a.raw_dim(), |_| {
                    if rng.random::<f32>() < keep {
                        1.0 / keep
                    } else {
                        0.0
                    }
                });
                a *= &mask;
                masks.push(Some(mask));
            } else {
                masks.push(None);
            }

            pre_activations.push(z);
            activations.push(a);
        }

        ForwardCache {
            activations,
            pre_activations,
            masks,
        }
    }

    fn backward(&self, cache: &ForwardCache, y: &Array2<f32>) -> Vec<LayerGradients> {
        let last = self.layers.len() - 1;
        let n = y.nrows().max(1) as f32;

        // softmax + cross-entropy
        let mut delta = (&cache.activations[last + 1] - y) / n;
        let mut gradients = Vec::with_capacity(self.layers.len());

        for i in (0..=last).rev() {
            let input = &cache.activations[i];
            gradients.push(LayerGradients {
                weights: input.t().dot(&delta),
                bias: delta.sum_axis(Axis(0)),
            });

            if i > 0 {
                let mut upstream = delta.dot(&self.layers[i].weights.t());
                if let Some(mask) = &cache.masks[i - 1] {
                    upstream *= mask;
                }
                // ReLU derivative of the previous layer
                Zip::from(&mut upstream)
                    .and(&cache.pre_activations[i - 1])
                    .for_each(|g, &z| {
                        if z <= 0.0 {
                            *g = 0.0;
                        }
                    });
                delta = upstream;
            }
        }

        gradients.reverse();
        gradients
    }
}

/// Mean categorical cross-entropy between row distributions and one-hot rows.
pub fn categorical_crossentropy(probs: &Array2<f32>, targets: &Array2<f32>) -> f32 {
    if probs.nrows() == 0 {
        return 0.0;
    }
    let total: f32 = probs
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| -t * p.clamp(EPSILON, 1.0 - EPSILON).ln())
        .sum();
    total / probs.nrows() as f32
}

/// Number of rows whose arg-max matches the target's arg-max.
pub fn count_correct(probs: &Array2<f32>, targets: &Array2<f32>) -> usize {
    probs
        .rows()
        .into_iter()
        .zip(targets.rows())
        .filter(|(p, t)| argmax(p) == argmax(t))
        .count()
}

fn argmax(values: &ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
