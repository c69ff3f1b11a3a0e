use crate::{
    activation::sigmoid_derivative,
    error::{LearnerError, Result},
    math::matrix::Matrix,
    network::params::NetworkParameters,
};

/// One online gradient step on a single example.
///
/// Returns the L1 size of the output error measured before the update,
/// `sum(|target - output|)`. Input length and label are validated before any
/// weight is touched.
///
/// The hidden-layer error is propagated through `w2` *after* `w2` has been
/// updated in the same step.
pub fn train_on_example(params: &mut NetworkParameters, input: &[f64], target: usize) -> Result<f64> {
    let classes = params.output_size();
    if target >= classes {
        return Err(LearnerError::InvalidLabel { label: target, classes });
    }
    let pass = params.forward_pass(input)?;
    let lr = params.learning_rate;

    let mut one_hot = vec![0.0; classes];
    one_hot[target] = 1.0;
    let output_error = &Matrix::row_vector(one_hot) - &pass.output;

    // Output layer
    let delta_output = output_error.hadamard(&pass.output.map(sigmoid_derivative));
    let delta_w2 = &pass.hidden.transpose() * &delta_output;
    params.w2.add_scaled(&delta_w2, lr);
    params.b2.add_scaled(&delta_output, lr);

    // Hidden layer, through the freshly updated w2
    let hidden_error = &delta_output * &params.w2.transpose();
    let delta_hidden = hidden_error.hadamard(&pass.hidden.map(sigmoid_derivative));
    let delta_w1 = &pass.input.transpose() * &delta_hidden;
    params.w1.add_scaled(&delta_w1, lr);
    params.b1.add_scaled(&delta_hidden, lr);

    Ok(output_error.sum_abs())
}
