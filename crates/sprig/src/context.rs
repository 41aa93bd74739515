//! Evaluation context configuration

/// Configuration for evaluation.
///
/// This is passed by reference through all evaluation calls. It holds no
/// process-wide state, so any number of programs can be evaluated side by
/// side in one process.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum nesting of user function calls (stack overflow protection)
    pub max_call_depth: usize,

    /// Emit a `trace`-level event for every evaluation step
    pub trace: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
            trace: false,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable step tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
