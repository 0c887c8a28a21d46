//! Dashboard Module
//! Computes every summary view of the demo page from one dataset.

use crate::data::{AllocationField, Dataset, PersonField, RevenueField, UtilizationField};
use crate::stats::aggregate::{Aggregator, GroupAverage, NamedValue, PivotRow, PromotionFlow};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// The charts shown on the demo page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    PrivilegeDistribution,
    AverageAllocationByRole,
    BillabilityBreakdown,
    LocationDistribution,
    StatusDistribution,
    PromotionFlows,
    RevenueDetails,
    UtilizationDetails,
}

impl ViewKind {
    pub const ALL: [ViewKind; 8] = [
        ViewKind::PrivilegeDistribution,
        ViewKind::AverageAllocationByRole,
        ViewKind::BillabilityBreakdown,
        ViewKind::LocationDistribution,
        ViewKind::StatusDistribution,
        ViewKind::PromotionFlows,
        ViewKind::RevenueDetails,
        ViewKind::UtilizationDetails,
    ];

    /// Key of the view in the serialized dashboard.
    pub fn key(&self) -> &'static str {
        match self {
            ViewKind::PrivilegeDistribution => "privilege_distribution",
            ViewKind::AverageAllocationByRole => "average_allocation_by_role",
            ViewKind::BillabilityBreakdown => "billability_breakdown",
            ViewKind::LocationDistribution => "location_distribution",
            ViewKind::StatusDistribution => "status_distribution",
            ViewKind::PromotionFlows => "promotion_flows",
            ViewKind::RevenueDetails => "revenue_details",
            ViewKind::UtilizationDetails => "utilization_details",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::PrivilegeDistribution => "User Privilege Distribution",
            ViewKind::AverageAllocationByRole => "Average Allocation % by Role",
            ViewKind::BillabilityBreakdown => "Billability Breakdown",
            ViewKind::LocationDistribution => "Work Location Distribution",
            ViewKind::StatusDistribution => "Allocation Status",
            ViewKind::PromotionFlows => "Designation Promotions",
            ViewKind::RevenueDetails => "Revenue Details",
            ViewKind::UtilizationDetails => "Utilization Details",
        }
    }

    pub fn compute(&self, dataset: &Dataset) -> ChartView {
        let data = match self {
            ViewKind::PrivilegeDistribution => ViewData::Distribution(
                Aggregator::count_by_field(&dataset.people, &PersonField::Privilege)
                    .to_named_values(),
            ),
            ViewKind::AverageAllocationByRole => ViewData::Averages(Aggregator::average_by_group(
                &dataset.allocations,
                &AllocationField::Role,
                &AllocationField::AllocationPercentage,
            )),
            ViewKind::BillabilityBreakdown => ViewData::Distribution(
                Aggregator::count_by_field(&dataset.allocations, &AllocationField::Billability)
                    .to_named_values(),
            ),
            ViewKind::LocationDistribution => ViewData::Distribution(
                Aggregator::count_by_field(&dataset.allocations, &AllocationField::Location)
                    .to_named_values(),
            ),
            ViewKind::StatusDistribution => ViewData::Distribution(
                Aggregator::count_by_field(&dataset.allocations, &AllocationField::Status)
                    .to_named_values(),
            ),
            ViewKind::PromotionFlows => {
                ViewData::Flows(Aggregator::promotion_flows(&dataset.people))
            }
            ViewKind::RevenueDetails => ViewData::Series(Aggregator::pivot_time_series(
                &dataset.revenue,
                &RevenueField::Month,
                &RevenueField::METRICS,
            )),
            ViewKind::UtilizationDetails => ViewData::Series(Aggregator::pivot_time_series(
                &dataset.utilization,
                &UtilizationField::Month,
                &UtilizationField::METRICS,
            )),
        };

        ChartView {
            title: self.title(),
            data,
        }
    }
}

/// Summary shape handed to a rendering adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ViewData {
    Distribution(Vec<NamedValue>),
    Averages(GroupAverage),
    Flows(Vec<PromotionFlow>),
    Series(Vec<PivotRow>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: &'static str,
    #[serde(flatten)]
    pub data: ViewData,
}

/// All views of one dataset, keyed by [`ViewKind::key`] in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DashboardViews {
    views: IndexMap<&'static str, ChartView>,
}

impl DashboardViews {
    /// Compute all views in parallel.
    pub fn compute(dataset: &Dataset) -> Self {
        Self::compute_views(dataset, &ViewKind::ALL)
    }

    /// Compute a subset of views in parallel; output follows the order of `kinds`.
    pub fn compute_views(dataset: &Dataset, kinds: &[ViewKind]) -> Self {
        info!(
            views = kinds.len(),
            people = dataset.people.len(),
            allocations = dataset.allocations.len(),
            "Computing dashboard views"
        );

        let views: Vec<(&'static str, ChartView)> = kinds
            .par_iter()
            .map(|kind| {
                let view = kind.compute(dataset);
                debug!(view = kind.key(), "View computed");
                (kind.key(), view)
            })
            .collect();

        Self {
            views: views.into_iter().collect(),
        }
    }

    pub fn get(&self, kind: ViewKind) -> Option<&ChartView> {
        self.views.get(kind.key())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.views.keys().copied()
    }
}
