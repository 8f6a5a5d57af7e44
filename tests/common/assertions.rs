//! Custom test assertions

use llm_relay::{RelayError, RouterError, StrategyKind};

/// Assert a routing result is an exhaustion for `strategy`, returning its attempted ids
pub fn assert_exhausted<T: std::fmt::Debug>(
    result: Result<T, RouterError>,
    strategy: StrategyKind,
) -> Vec<String> {
    match result {
        Err(RouterError::AllProvidersExhausted {
            strategy: actual,
            attempted,
            ..
        }) => {
            assert_eq!(actual, strategy, "exhausted by an unexpected strategy");
            attempted
        }
        other => panic!("Expected AllProvidersExhausted, got {:?}", other),
    }
}

/// Assert a relay-level error wraps an exhaustion
pub fn assert_relay_exhausted(error: &RelayError) {
    assert!(error.is_exhausted(), "Expected exhaustion, got {:?}", error);
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-6_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` (epsilon: `{:?}`)",
            left_val,
            right_val,
            diff,
            $epsilon
        );
    };
}
