/// Output substituted for pre-activations below `-CLAMP`.
pub const SIGMOID_FLOOR: f64 = 0.00005;
/// Output substituted for pre-activations above `CLAMP`.
pub const SIGMOID_CEIL: f64 = 0.99995;
const CLAMP: f64 = 10.0;

/// Logistic sigmoid with fixed outputs outside `[-10, 10]`, so `exp` never
/// overflows and the result always lies strictly inside `(0, 1)`.
pub fn sigmoid(x: f64) -> f64 {
    if x < -CLAMP {
        SIGMOID_FLOOR
    } else if x > CLAMP {
        SIGMOID_CEIL
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

/// Sigmoid derivative expressed through the activation `a = sigmoid(z)`.
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_one_half() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid_derivative(0.5), 0.25);
    }

    #[test]
    fn extremes_are_clamped() {
        assert_eq!(sigmoid(-10.5), SIGMOID_FLOOR);
        assert_eq!(sigmoid(f64::NEG_INFINITY), SIGMOID_FLOOR);
        assert_eq!(sigmoid(1e9), SIGMOID_CEIL);
        // The boundary itself still goes through the exponential.
        assert!((sigmoid(10.0) - 1.0 / (1.0 + (-10.0f64).exp())).abs() < 1e-15);
    }

    #[test]
    fn output_is_strictly_inside_unit_interval() {
        for i in -200..=200 {
            let y = sigmoid(i as f64 * 0.1);
            assert!(y > 0.0 && y < 1.0, "sigmoid({}) = {y}", i as f64 * 0.1);
        }
    }
}
