use rand::Rng;

use crate::activation::sigmoid;
use crate::error::{LearnerError, Result};
use crate::math::matrix::Matrix;
use crate::network::prediction::Activations;

/// Initial weights are drawn uniformly from `[-INIT_RANGE, INIT_RANGE)`.
const INIT_RANGE: f64 = 0.5;

/// Weights and biases of the two-layer sigmoid network.
///
/// Shapes are fixed at construction:
/// - `w1`: input_size × hidden_size, `b1`: 1 × hidden_size
/// - `w2`: hidden_size × output_size, `b2`: 1 × output_size
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParameters {
    pub(crate) w1: Matrix,
    pub(crate) b1: Matrix,
    pub(crate) w2: Matrix,
    pub(crate) b2: Matrix,
    pub(crate) learning_rate: f64,
}

/// Intermediate values of one forward pass, kept for backpropagation.
pub(crate) struct ForwardPass {
    pub input: Matrix,
    pub hidden: Matrix,
    pub output: Matrix,
}

impl NetworkParameters {
    /// Random weights, zero biases.
    pub fn random<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> NetworkParameters {
        NetworkParameters {
            w1: Matrix::uniform(input_size, hidden_size, -INIT_RANGE, INIT_RANGE, rng),
            b1: Matrix::zeros(1, hidden_size),
            w2: Matrix::uniform(hidden_size, output_size, -INIT_RANGE, INIT_RANGE, rng),
            b2: Matrix::zeros(1, output_size),
            learning_rate,
        }
    }

    /// Assembles parameters from existing matrices, checking that the four
    /// shapes fit together.
    pub fn from_matrices(
        w1: Matrix,
        b1: Matrix,
        w2: Matrix,
        b2: Matrix,
        learning_rate: f64,
    ) -> Result<NetworkParameters> {
        let (input_size, hidden_size, output_size) = (w1.rows, w1.cols, w2.cols);
        check_shape("weights1", &w1, input_size, hidden_size)?;
        check_shape("bias1", &b1, 1, hidden_size)?;
        check_shape("weights2", &w2, hidden_size, output_size)?;
        check_shape("bias2", &b2, 1, output_size)?;
        Ok(NetworkParameters { w1, b1, w2, b2, learning_rate })
    }

    pub fn input_size(&self) -> usize {
        self.w1.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.cols
    }

    pub fn output_size(&self) -> usize {
        self.w2.cols
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    pub fn b1(&self) -> &Matrix {
        &self.b1
    }

    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    pub fn b2(&self) -> &Matrix {
        &self.b2
    }

    /// Pure forward pass over a flat input of exactly `input_size` values.
    pub fn forward(&self, input: &[f64]) -> Result<Activations> {
        let pass = self.forward_pass(input)?;
        Ok(Activations {
            hidden: pass.hidden.into_vec(),
            output: pass.output.into_vec(),
        })
    }

    pub(crate) fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(LearnerError::Shape {
                expected: self.input_size(),
                actual: input.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn forward_pass(&self, input: &[f64]) -> Result<ForwardPass> {
        self.check_input(input)?;
        let input = Matrix::row_vector(input.to_vec());
        let hidden = (&(&input * &self.w1) + &self.b1).map(sigmoid);
        let output = (&(&hidden * &self.w2) + &self.b2).map(sigmoid);
        Ok(ForwardPass { input, hidden, output })
    }
}

pub(crate) fn check_shape(name: &str, m: &Matrix, rows: usize, cols: usize) -> Result<()> {
    if m.rows != rows || m.cols != cols {
        return Err(LearnerError::matrix(
            name,
            format!("expected {rows}×{cols}, got {}×{}", m.rows, m.cols),
        ));
    }
    Ok(())
}
