//! Stochastic gradient descent with (Nesterov) momentum.

use ndarray::{Array, Dimension, Zip};
use serde::{Deserialize, Serialize};

use crate::ml::network::{DenseLayer, LayerGradients};

/// Hyper-parameters of [`Sgd`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgdConfig {
    pub learning_rate: f32,
    pub momentum: f32,
    pub nesterov: bool,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            learning_rate: 0.01,
            momentum: 0.9,
            nesterov: true,
        }
    }
}

/// SGD optimizer holding one velocity buffer per parameter.
///
/// For every parameter `p` with gradient `g` and velocity `v`:
///
/// ```text
/// v ← momentum · v − lr · g
/// p ← p + momentum · v − lr · g   (Nesterov)
/// p ← p + v                        (classical momentum)
/// ```
#[derive(Debug, Clone)]
pub struct Sgd {
    config: SgdConfig,
    velocities: Vec<LayerGradients>,
}

impl Sgd {
    pub fn new(config: SgdConfig) -> Self {
        Sgd {
            config,
            velocities: Vec::new(),
        }
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    /// Apply one update to every layer. Velocity buffers are created on
    /// the first call and reset if the layer shapes change.
    pub fn step(&mut self, layers: &mut [DenseLayer], gradients: &[LayerGradients]) {
        if !self.velocities_match(layers) {
            self.velocities = layers
                .iter()
                .map(|layer| LayerGradients {
                    weights: Array::zeros(layer.weights().raw_dim()),
                    bias: Array::zeros(layer.bias().raw_dim()),
                })
                .collect();
        }

        for ((layer, grad), velocity) in layers
            .iter_mut()
            .zip(gradients)
            .zip(self.velocities.iter_mut())
        {
            let (weights, bias) = layer.params_mut();
            update(weights, &mut velocity.weights, &grad.weights, &self.config);
            update(bias, &mut velocity.bias, &grad.bias, &self.config);
        }
    }

    fn velocities_match(&self, layers: &[DenseLayer]) -> bool {
        self.velocities.len() == layers.len()
            && self.velocities.iter().zip(layers).all(|(v, l)| {
                v.weights.dim() == l.weights().dim() && v.bias.len() == l.bias().len()
            })
    }
}

fn update<D: Dimension>(
    param: &mut Array<f32, D>,
    velocity: &mut Array<f32, D>,
    grad: &Array<f32, D>,
    config: &SgdConfig,
) {
    let SgdConfig {
        learning_rate: lr,
        momentum: m,
        nesterov,
    } = *config;

    Zip::from(param)
        .and(velocity)
        .and(grad)
        .for_each(|p, v, &g| {
            *v = m * *v - lr * g;
            if nesterov {
                *p += m * *v - lr * g;
            } else {
                *p += *v;
            }
        });
}
