//! Tunables for both engines. Defaults reproduce the fixed constants the
//! matching contract specifies; the fields exist so a host can override
//! them (smaller iteration budgets in tests, a tighter resource ceiling)
//! without forking the crate.

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Initial temperature `T0`. The schedule is `T_k = t0 / k` for the
    /// 1-based iteration counter `k`.
    pub t0: f64,
    /// Hard cap on outer iterations.
    pub max_iterations: u32,
    /// Stop early if this many consecutive iterations fail to improve the
    /// best-seen energy.
    pub stall_iterations: u32,
    /// How many times a single swap proposal retries before it is treated
    /// as a null move.
    pub max_swap_retries: u32,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            t0: 100.0,
            max_iterations: 10_000,
            stall_iterations: 200,
            max_swap_retries: 10,
        }
    }
}

/// Bounds the baseline enumerator's exponential blow-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumerationConfig {
    /// Upper bound on the number of candidate mappings the enumerator may
    /// score. Exceeded before any candidate is scored -> `ResourceExhausted`.
    pub candidate_limit: usize,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        EnumerationConfig { candidate_limit: 1_000_000 }
    }
}
