use serde::Serialize;

/// Layer activations from one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activations {
    pub hidden: Vec<f64>,
    pub output: Vec<f64>,
}

/// Result of `Network::get_predicted_label`. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub label: usize,
    pub confidence: f64,
    pub all_confidences: Vec<f64>,
    pub hidden_activations: Vec<f64>,
}

impl From<Activations> for Prediction {
    fn from(activations: Activations) -> Self {
        let (label, confidence) = argmax(&activations.output);
        Prediction {
            label,
            confidence,
            all_confidences: activations.output,
            hidden_activations: activations.hidden,
        }
    }
}

/// Index and value of the largest element; ties go to the lowest index.
fn argmax(values: &[f64]) -> (usize, f64) {
    let mut best = (0, values.first().copied().unwrap_or(0.0));
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_resolve_to_the_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.7, 0.7, 0.1]), (1, 0.7));
        assert_eq!(argmax(&[]), (0, 0.0));
    }

    #[test]
    fn prediction_carries_activations() {
        let p = Prediction::from(Activations {
            hidden: vec![0.5],
            output: vec![0.1, 0.9],
        });
        assert_eq!(p.label, 1);
        assert_eq!(p.confidence, 0.9);
        assert_eq!(p.all_confidences, vec![0.1, 0.9]);
        assert_eq!(p.hidden_activations, vec![0.5]);
    }
}
