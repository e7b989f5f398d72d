//! Per-request search options.

use sr_search::SearchStrategy;

/// Which strategy a request runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    /// Breadth-first up to `auto_breadth_range`, weighted beyond.
    #[default]
    Auto,
    Breadth,
    Weighted,
}

impl StrategyChoice {
    /// The concrete strategy for endpoints `distance` apart.
    pub fn resolve(self, distance: f64, auto_breadth_range: f64) -> SearchStrategy {
        match self {
            StrategyChoice::Auto if distance <= auto_breadth_range => SearchStrategy::Breadth,
            StrategyChoice::Auto => SearchStrategy::Weighted,
            StrategyChoice::Breadth => SearchStrategy::Breadth,
            StrategyChoice::Weighted => SearchStrategy::Weighted,
        }
    }
}

impl From<SearchStrategy> for StrategyChoice {
    fn from(s: SearchStrategy) -> Self {
        match s {
            SearchStrategy::Breadth => StrategyChoice::Breadth,
            SearchStrategy::Weighted => StrategyChoice::Weighted,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct PathRequest {
    pub strategy: StrategyChoice,
    /// Log every search event through [`LogObserver`](crate::LogObserver).
    pub debug:    bool,
}

impl PathRequest {
    pub fn new(strategy: impl Into<StrategyChoice>) -> Self {
        Self { strategy: strategy.into(), debug: false }
    }

    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }
}
