//! Model pricing table and cost calculation
//!
//! Pricing is a compiled-in table of Gemini rates (per million tokens, as of
//! Dec 2025) rather than a fetched dataset: the report must work offline and
//! an unrecognized model simply contributes zero cost, never an error.
//!
//! Rates above the 200k-input-token threshold use a model's second-tier
//! rates where defined, falling back to the base rate per component.

use crate::types::ModelName;
use tracing::debug;

/// Input-token count above which second-tier rates apply
pub const TIER_THRESHOLD_TOKENS: u64 = 200_000;

/// Per-model rates, expressed per one million tokens
///
/// The `*_over_threshold` rates form an optional second tier triggered by
/// total input size; each component falls back to its base rate when the
/// tiered rate is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    /// Base rate for fresh input tokens
    pub input_per_million: f64,
    /// Base rate for output tokens
    pub output_per_million: f64,
    /// Base rate for cached input tokens
    pub cache_per_million: f64,
    /// Tier-2 input rate, if the model has one
    pub input_per_million_over_threshold: Option<f64>,
    /// Tier-2 output rate, if the model has one
    pub output_per_million_over_threshold: Option<f64>,
    /// Tier-2 cache rate, if the model has one
    pub cache_per_million_over_threshold: Option<f64>,
}

impl ModelPricing {
    const fn flat(input: f64, output: f64, cache: f64) -> Self {
        Self {
            input_per_million: input,
            output_per_million: output,
            cache_per_million: cache,
            input_per_million_over_threshold: None,
            output_per_million_over_threshold: None,
            cache_per_million_over_threshold: None,
        }
    }

    const fn tiered(
        input: f64,
        output: f64,
        cache: f64,
        input_t2: f64,
        output_t2: f64,
        cache_t2: f64,
    ) -> Self {
        Self {
            input_per_million: input,
            output_per_million: output,
            cache_per_million: cache,
            input_per_million_over_threshold: Some(input_t2),
            output_per_million_over_threshold: Some(output_t2),
            cache_per_million_over_threshold: Some(cache_t2),
        }
    }
}

/// Known model prefixes and their rates
///
/// Resolution picks the longest matching prefix, so "gemini-2.5-flash-lite"
/// is never shadowed by "gemini-2.5-flash".
const GEMINI_PRICING: &[(&str, ModelPricing)] = &[
    // Gemini 3
    (
        "gemini-3-pro",
        ModelPricing::tiered(2.00, 12.00, 0.20, 4.00, 18.00, 0.40),
    ),
    (
        "gemini-3-pro-preview",
        ModelPricing::tiered(2.00, 12.00, 0.20, 4.00, 18.00, 0.40),
    ),
    ("gemini-3-flash", ModelPricing::flat(0.50, 3.00, 0.05)),
    (
        "gemini-3-flash-preview",
        ModelPricing::flat(0.50, 3.00, 0.05),
    ),
    // Gemini 2.5
    (
        "gemini-2.5-pro",
        ModelPricing::tiered(1.25, 10.00, 0.125, 2.50, 15.00, 0.25),
    ),
    ("gemini-2.5-flash", ModelPricing::flat(0.30, 2.50, 0.03)),
    (
        "gemini-2.5-flash-lite",
        ModelPricing::flat(0.10, 0.40, 0.01),
    ),
];

/// Calculates costs from token counts and the built-in pricing table
#[derive(Debug, Default, Clone, Copy)]
pub struct CostCalculator;

impl CostCalculator {
    /// Create a new CostCalculator
    pub fn new() -> Self {
        Self
    }

    /// Resolve a model id to its pricing entry via longest-prefix match
    pub fn pricing_for(&self, model: &ModelName) -> Option<&'static ModelPricing> {
        GEMINI_PRICING
            .iter()
            .filter(|(prefix, _)| model.as_str().starts_with(prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, pricing)| pricing)
    }

    /// Estimated cost in USD for one request's token counts
    ///
    /// `cached_tokens` are a subset of `input_tokens`: only the fresh
    /// remainder (clamped at zero) is billed at the input rate, while the
    /// cached portion is billed at the cache rate. Unknown models cost zero.
    pub fn calculate(
        &self,
        model: &ModelName,
        input_tokens: u64,
        output_tokens: u64,
        cached_tokens: u64,
    ) -> f64 {
        let Some(pricing) = self.pricing_for(model) else {
            debug!("No pricing entry for model {model}, counting $0.00");
            return 0.0;
        };

        // Tiered pricing applies to the whole request once the prompt
        // exceeds the threshold
        let over_threshold = input_tokens > TIER_THRESHOLD_TOKENS;

        let input_rate = tiered_rate(
            pricing.input_per_million,
            pricing.input_per_million_over_threshold,
            over_threshold,
        );
        let output_rate = tiered_rate(
            pricing.output_per_million,
            pricing.output_per_million_over_threshold,
            over_threshold,
        );
        let cache_rate = tiered_rate(
            pricing.cache_per_million,
            pricing.cache_per_million_over_threshold,
            over_threshold,
        );

        // Logged input includes cached tokens; bill the input rate only for
        // the fresh remainder
        let fresh_input_tokens = input_tokens.saturating_sub(cached_tokens);

        let cost = (fresh_input_tokens as f64 / 1_000_000.0) * input_rate
            + (output_tokens as f64 / 1_000_000.0) * output_rate
            + (cached_tokens as f64 / 1_000_000.0) * cache_rate;

        debug!(
            "Calculated cost ${cost:.6} for {model} ({input_tokens} in / {output_tokens} out / {cached_tokens} cached)"
        );

        cost
    }
}

fn tiered_rate(base: f64, over_threshold: Option<f64>, is_over: bool) -> f64 {
    if is_over {
        over_threshold.unwrap_or(base)
    } else {
        base
    }
}
