// src/model/dense.rs
//! Feed-forward network of dense layers (a Keras `Sequential` of `Dense`
//! layers exported to JSON). Weights are stored `[input][output]`.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::Classifier;
use crate::error::{AnalyzerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

impl Activation {
    fn apply(self, v: &mut [f32]) {
        match self {
            Activation::Linear => {}
            Activation::Relu => v.iter_mut().for_each(|x| *x = x.max(0.0)),
            Activation::Sigmoid => v.iter_mut().for_each(|x| *x = 1.0 / (1.0 + (-*x).exp())),
            Activation::Tanh => v.iter_mut().for_each(|x| *x = x.tanh()),
            Activation::Softmax => {
                let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                v.iter_mut().for_each(|x| *x = (*x - max).exp());
                let sum: f32 = v.iter().sum();
                if sum > 0.0 {
                    v.iter_mut().for_each(|x| *x /= sum);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default = "default_activation")]
    pub activation: Activation,
}

fn default_activation() -> Activation {
    Activation::Linear
}

impl DenseLayer {
    fn input_dim(&self) -> usize {
        self.weights.len()
    }

    fn output_dim(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            if *x == 0.0 {
                continue;
            }
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        self.activation.apply(&mut out);
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self> {
        let net = Self { layers };
        net.validate()?;
        Ok(net)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let data = fs::read_to_string(path).map_err(|e| AnalyzerError::artifact(&label, e))?;
        let net: DenseNetwork =
            serde_json::from_str(&data).map_err(|e| AnalyzerError::artifact(&label, e))?;
        net.validate()
            .map_err(|e| AnalyzerError::artifact(label, e))?;
        Ok(net)
    }

    fn validate(&self) -> Result<()> {
        let Some(first) = self.layers.first() else {
            return Err(AnalyzerError::artifact("classifier", "no layers"));
        };
        if first.input_dim() == 0 {
            return Err(AnalyzerError::artifact("classifier", "zero input width"));
        }
        let mut width = first.input_dim();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.input_dim() != width {
                return Err(AnalyzerError::artifact(
                    "classifier",
                    format!("layer {i} expects {} inputs, previous layer gives {width}", layer.input_dim()),
                ));
            }
            if let Some(r) = layer.weights.iter().position(|row| row.len() != layer.output_dim()) {
                return Err(AnalyzerError::artifact(
                    "classifier",
                    format!("layer {i} row {r} width differs from bias length {}", layer.output_dim()),
                ));
            }
            width = layer.output_dim();
        }
        if width == 0 {
            return Err(AnalyzerError::artifact("classifier", "zero output width"));
        }
        Ok(())
    }
}

impl Classifier for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.layers.first().map(DenseLayer::input_dim).unwrap_or(0)
    }

    fn output_dim(&self) -> usize {
        self.layers.last().map(DenseLayer::output_dim).unwrap_or(0)
    }

    fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.input_dim() {
            return Err(AnalyzerError::Inference(format!(
                "feature vector has {} values, classifier expects {}",
                features.len(),
                self.input_dim()
            )));
        }
        let mut x = features.to_vec();
        for layer in &self.layers {
            x = layer.forward(&x);
        }
        Ok(x)
    }
}
