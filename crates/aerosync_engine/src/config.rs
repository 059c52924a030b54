//! Engine configuration.

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window size used when the client does not request one.
    pub default_window_size: u32,
    /// Serialized byte budget per response batch.
    pub byte_budget: usize,
    /// Consecutive zero-progress observations before the window shrinks.
    pub zero_progress_threshold: u32,
    /// How much the window shrinks per recovery step.
    pub window_shrink_step: u32,
    /// Maximum preview length in characters.
    pub preview_max_chars: usize,
}

impl EngineConfig {
    /// Creates a configuration with the default limits.
    pub fn new() -> Self {
        Self {
            default_window_size: 100,
            byte_budget: 512 * 1024,
            zero_progress_threshold: 3,
            window_shrink_step: 5,
            preview_max_chars: 255,
        }
    }

    /// Sets the default window size.
    pub fn with_default_window_size(mut self, size: u32) -> Self {
        self.default_window_size = size;
        self
    }

    /// Sets the per-batch byte budget.
    pub fn with_byte_budget(mut self, budget: usize) -> Self {
        self.byte_budget = budget;
        self
    }

    /// Sets the zero-progress threshold.
    pub fn with_zero_progress_threshold(mut self, threshold: u32) -> Self {
        self.zero_progress_threshold = threshold;
        self
    }

    /// Sets the window shrink step.
    pub fn with_window_shrink_step(mut self, step: u32) -> Self {
        self.window_shrink_step = step;
        self
    }

    /// Sets the maximum preview length.
    pub fn with_preview_max_chars(mut self, max: usize) -> Self {
        self.preview_max_chars = max;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
