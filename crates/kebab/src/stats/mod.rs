//! Statistics over normalized records: hypothesis tests, rankings and trends.

mod anova;
mod compare;
mod contingency;
mod descriptive;
pub mod distribution;
mod group;
mod trend;

pub use anova::{AnovaOutcome, AnovaTest, group_anova};
pub use compare::{Comparison, WelchTest, pairwise_compare, welch};
pub use contingency::{
    ChiSquareTest, ContingencyTable, IndependenceTest, ProbabilityTable, TestOutcome,
    independence_test,
};
pub use descriptive::{
    Bin, Distribution, GroupMean, GroupSummary, Summary, histogram, mean, median, ranking,
    sample_variance, summary,
};
pub use group::{GroupBy, GroupKey, group_weights};
pub use trend::{
    CorrelationMatrix, CumulativePoint, DEFAULT_WINDOW, TrendPoint, correlation_matrix,
    cumulative_weight, moving_average, pearson,
};

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 15;
