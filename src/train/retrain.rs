use log::info;
use rand::{seq::SliceRandom, Rng};

use crate::{
    error::{LearnerError, Result},
    memory::replay::{Example, ReplayMemory},
    network::params::NetworkParameters,
    train::trainer::train_on_example,
};

/// Draws a class-balanced replay batch: every class with more than
/// `max_per_class` stored examples contributes a fresh uniform sample of
/// `max_per_class` (without replacement); smaller classes contribute all of
/// theirs. Batches are grouped by class in label order.
pub fn sample_balanced<'a, R: Rng + ?Sized>(
    memory: &'a ReplayMemory,
    classes: usize,
    max_per_class: usize,
    rng: &mut R,
) -> Vec<&'a Example> {
    let mut batch = Vec::with_capacity(memory.len().min(classes * max_per_class));
    for class in 0..classes {
        let of_class: Vec<&Example> = memory.of_class(class).collect();
        if of_class.len() > max_per_class {
            batch.extend(of_class.choose_multiple(rng, max_per_class).copied());
        } else {
            batch.extend(of_class);
        }
    }
    batch
}

/// Replays a balanced sample of `memory` for `epochs` passes, one online step
/// per example, and returns the mean step loss. Memory is only read.
///
/// Returns `0.0` when there is nothing to replay. Every stored example is
/// checked against `params` first, so a failing call leaves the weights as
/// they were.
pub fn retrain_all<R: Rng + ?Sized>(
    params: &mut NetworkParameters,
    memory: &ReplayMemory,
    max_per_class: usize,
    epochs: usize,
    rng: &mut R,
) -> Result<f64> {
    if memory.is_empty() {
        return Ok(0.0);
    }
    let classes = params.output_size();
    for ex in memory.examples() {
        if ex.target >= classes {
            return Err(LearnerError::InvalidLabel { label: ex.target, classes });
        }
        params.check_input(&ex.input)?;
    }

    let batch = sample_balanced(memory, classes, max_per_class, rng);
    let steps = epochs * batch.len();
    if steps == 0 {
        return Ok(0.0);
    }

    let mut distribution = vec![0usize; classes];
    for ex in &batch {
        distribution[ex.target] += 1;
    }

    let mut total_loss = 0.0;
    for _ in 0..epochs {
        for ex in &batch {
            total_loss += train_on_example(params, &ex.input, ex.target)?;
        }
    }

    let mean_loss = total_loss / steps as f64;
    info!(
        "replayed {} examples x {epochs} epochs: distribution={distribution:?} mean_loss={mean_loss:.6}",
        batch.len()
    );
    Ok(mean_loss)
}
