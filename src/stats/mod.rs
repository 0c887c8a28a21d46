//! Stats module - summary aggregations and dashboard views

mod aggregate;
mod dashboard;

pub use aggregate::{
    round_half_away, Aggregator, CountDistribution, GroupAverage, GroupMean, NamedValue,
    PivotRow, PromotionFlow, AVERAGE_DECIMALS,
};
pub use dashboard::{ChartView, DashboardViews, ViewData, ViewKind};
