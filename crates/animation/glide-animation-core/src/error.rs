//! Error taxonomy for curve construction, configuration loading, and host timers.
//!
//! None of these are fatal to the compositor: the config layer logs curve
//! errors and drops the offending phase, and the engine degrades to an instant
//! transition when the host cannot hand out a timer.

use thiserror::Error;

/// Rejected curve descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("{curve} curve of order {order} needs {expected} point values, got {actual}")]
    InvalidPointCount {
        curve: &'static str,
        order: u32,
        expected: usize,
        actual: usize,
    },
    #[error("{curve} curve order {order} exceeds the maximum of {max}")]
    OrderTooHigh {
        curve: &'static str,
        order: u32,
        max: u32,
    },
    #[error("simple curves must be cubic (order 3), got order {order}")]
    InvalidSimpleCurve { order: u32 },
    #[error("curve duration must be > 0 ms")]
    ZeroDuration,
}

/// Errors produced while loading an animation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("animation config parse error: {0}")]
    Parse(String),
    #[error("animation tick frequency must be > 0 ms")]
    InvalidFrequency,
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Returned by a host that cannot allocate an event-loop timer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_count_message_names_the_curve() {
        let err = CurveError::InvalidPointCount {
            curve: "variable",
            order: 3,
            expected: 4,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("variable curve of order 3"));
        assert!(msg.contains("needs 4"));
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: ConfigError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("animation config parse error"));
    }
}
