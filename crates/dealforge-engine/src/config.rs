//! Engine configuration

/// Tunables for the round orchestrator
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard round limit; the room aborts when it is exhausted
    pub max_rounds: u32,
    /// No decision is made before this many rounds have run
    pub min_rounds: u32,
    /// Concurrent seller turns per round
    pub parallel_seller_limit: usize,
    /// Sampling temperature for buyer and seller turns
    pub temperature: f32,
    /// Token budget for buyer and seller turns
    pub max_tokens: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            min_rounds: 2,
            parallel_seller_limit: 4,
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// Read configuration from `DEALFORGE_*` environment variables,
    /// falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_rounds: env_parse("DEALFORGE_MAX_ROUNDS", defaults.max_rounds),
            min_rounds: env_parse("DEALFORGE_MIN_ROUNDS", defaults.min_rounds),
            parallel_seller_limit: env_parse(
                "DEALFORGE_PARALLEL_SELLER_LIMIT",
                defaults.parallel_seller_limit,
            )
            .max(1),
            temperature: env_parse("DEALFORGE_TEMPERATURE", defaults.temperature),
            max_tokens: env_parse("DEALFORGE_MAX_TOKENS", defaults.max_tokens),
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_min_rounds(mut self, min_rounds: u32) -> Self {
        self.min_rounds = min_rounds;
        self
    }

    pub fn with_parallel_seller_limit(mut self, limit: usize) -> Self {
        self.parallel_seller_limit = limit.max(1);
        self
    }
}
