//! Engine failure classification
//!
//! Wasmtime reports traps as long multi-line errors with a wasm backtrace.
//! The loop logs a warning per failed frame, so the trap is boiled down to a
//! one-line summary with the full text kept alongside.

use crate::error::FrameError;

/// Broad category of an engine trap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKind {
    MemoryAccess,
    Unreachable,
    IntegerOverflow,
    DivideByZero,
    StackOverflow,
    SignatureMismatch,
    OutOfMemory,
    Other,
}

impl TrapKind {
    pub fn summary(self) -> &'static str {
        match self {
            TrapKind::MemoryAccess => "out of bounds memory access",
            TrapKind::Unreachable => "engine panicked (unreachable executed)",
            TrapKind::IntegerOverflow => "integer overflow",
            TrapKind::DivideByZero => "integer divide by zero",
            TrapKind::StackOverflow => "call stack exhausted",
            TrapKind::SignatureMismatch => "indirect call type mismatch",
            TrapKind::OutOfMemory => "memory growth refused",
            TrapKind::Other => "runtime error",
        }
    }
}

/// Classify trap text by the markers wasmtime puts in its messages
pub fn classify_trap(error: &str) -> TrapKind {
    let error = error.to_lowercase();

    if error.contains("out of bounds memory access") {
        TrapKind::MemoryAccess
    } else if error.contains("unreachable") {
        TrapKind::Unreachable
    } else if error.contains("integer overflow") {
        TrapKind::IntegerOverflow
    } else if error.contains("divide by zero") || error.contains("division by zero") {
        TrapKind::DivideByZero
    } else if error.contains("call stack exhausted") || error.contains("stack overflow") {
        TrapKind::StackOverflow
    } else if error.contains("indirect call type mismatch") {
        TrapKind::SignatureMismatch
    } else if error.contains("memory") && (error.contains("grow") || error.contains("limit")) {
        TrapKind::OutOfMemory
    } else {
        TrapKind::Other
    }
}

/// Innermost wasm frame of a backtrace, if the error carries one
///
/// Wasmtime formats frames as `N: 0xOFFSET - module!function`.
pub fn innermost_frame(error: &str) -> Option<&str> {
    error.lines().map(str::trim).find(|line| {
        line.split_once(':')
            .is_some_and(|(index, rest)| {
                !index.is_empty()
                    && index.chars().all(|c| c.is_ascii_digit())
                    && rest.trim_start().starts_with("0x")
            })
    })
}

/// Turn an engine call error into the per-frame error the loop reports
pub fn engine_call_failure(error: &anyhow::Error) -> FrameError {
    let details = format!("{error:#}");
    let kind = classify_trap(&details);
    let summary = match innermost_frame(&details) {
        Some(frame) => format!("{} at {}", kind.summary(), frame),
        None => kind.summary().to_string(),
    };
    FrameError::EngineCallFailure { summary, details }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_oob() {
        assert_eq!(
            classify_trap("wasm trap: out of bounds memory access"),
            TrapKind::MemoryAccess
        );
    }

    #[test]
    fn test_classify_unreachable() {
        assert_eq!(
            classify_trap("wasm trap: wasm `unreachable` instruction executed"),
            TrapKind::Unreachable
        );
    }

    #[test]
    fn test_classify_divide_by_zero() {
        assert_eq!(
            classify_trap("wasm trap: integer divide by zero"),
            TrapKind::DivideByZero
        );
    }

    #[test]
    fn test_classify_stack_overflow() {
        assert_eq!(
            classify_trap("wasm trap: call stack exhausted"),
            TrapKind::StackOverflow
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify_trap("host said no"), TrapKind::Other);
    }

    #[test]
    fn test_innermost_frame() {
        let error = "error while executing at wasm backtrace:\n    0: 0x1a2b - engine!compute\n    1: 0x3c4d - engine!go\n\nCaused by:\n    wasm trap: integer overflow";
        assert_eq!(innermost_frame(error), Some("0: 0x1a2b - engine!compute"));
        assert_eq!(innermost_frame("no backtrace here: 12"), None);
    }

    #[test]
    fn test_engine_call_failure_summary() {
        let error = anyhow::anyhow!("wasm trap: integer overflow");
        match engine_call_failure(&error) {
            FrameError::EngineCallFailure { summary, details } => {
                assert_eq!(summary, "integer overflow");
                assert!(details.contains("wasm trap"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
