use chartify_views::config::DatasetConfig;
use chartify_views::data::{
    AllocationField, Dataset, DatasetGenerator, FieldKey, FieldValue, PersonField, Record,
    RevenueField, TableRow, UtilizationField, MISSING_KEY,
};
use chartify_views::stats::{Aggregator, DashboardViews};
use pretty_assertions::assert_eq;
use serde_json::json;

fn generated(seed: u64) -> Dataset {
    DatasetGenerator::new(DatasetConfig {
        seed,
        people: 200,
        allocations: 230,
        ..DatasetConfig::default()
    })
    .generate()
    .unwrap()
}

fn table(rows: serde_json::Value) -> Vec<TableRow> {
    serde_json::from_value(rows).unwrap()
}

#[test]
fn counts_sum_to_collection_size() {
    for seed in [1, 2, 3] {
        let data = generated(seed);
        for field in [
            AllocationField::Role,
            AllocationField::Billability,
            AllocationField::Location,
            AllocationField::Project,
            AllocationField::AllocationPercentage,
        ] {
            let counts = Aggregator::count_by_field(&data.allocations, &field);
            assert_eq!(counts.total(), data.allocations.len(), "field {}", field.name());
        }
        let counts = Aggregator::count_by_field(&data.people, &PersonField::Designation);
        assert_eq!(counts.total(), data.people.len());
    }
}

#[test]
fn count_on_empty_input_is_empty() {
    let rows: Vec<TableRow> = Vec::new();
    assert!(Aggregator::count_by_field(&rows, &"privilege".to_string()).is_empty());
}

#[test]
fn count_keys_in_first_seen_order() {
    let rows = table(json!([
        {"privilege": "user"},
        {"privilege": "admin"},
        {"privilege": "user"},
        {"name": "no privilege"}
    ]));

    let counts = Aggregator::count_by_field(&rows, &"privilege".to_string());
    assert_eq!(
        counts.iter().collect::<Vec<_>>(),
        [("user", 2), ("admin", 1), (MISSING_KEY, 1)]
    );
}

#[test]
fn average_uses_only_matching_truthy_groups() {
    let data = generated(11);
    let averages = Aggregator::average_by_group(
        &data.allocations,
        &AllocationField::Project,
        &AllocationField::AllocationPercentage,
    );

    for entry in averages.iter() {
        let values: Vec<f64> = data
            .allocations
            .iter()
            .filter(|a| a.project == entry.group)
            .filter_map(|a| a.allocation_percentage)
            .collect();
        assert!(!values.is_empty());
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((entry.average - mean).abs() <= 0.005, "group {}", entry.group);
    }
}

#[test]
fn average_over_untyped_rows() {
    let rows = table(json!([
        {"role": "Dev", "allocation_percentage": 50},
        {"role": "Dev", "allocation_percentage": 70},
        {"role": "QA", "allocation_percentage": null},
        {"role": "", "allocation_percentage": 90},
        {"role": 0, "allocation_percentage": 90},
        {"allocation_percentage": 90}
    ]));

    let averages = Aggregator::average_by_group(
        &rows,
        &"role".to_string(),
        &"allocation_percentage".to_string(),
    );
    assert_eq!(averages.len(), 1);
    assert_eq!(averages.get("Dev"), Some(60.0));
}

#[test]
fn average_rounds_to_hundredths() {
    let rows = table(json!([
        {"role": "Ops", "pct": 10},
        {"role": "Ops", "pct": 10},
        {"role": "Ops", "pct": 11}
    ]));

    let averages = Aggregator::average_by_group(&rows, &"role".to_string(), &"pct".to_string());
    assert_eq!(averages.get("Ops"), Some(10.33));
}

#[test]
fn aggregations_are_repeatable() {
    let data = generated(5);

    let a = Aggregator::count_by_field(&data.people, &PersonField::Privilege);
    let b = Aggregator::count_by_field(&data.people, &PersonField::Privilege);
    assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());

    let a = Aggregator::average_by_group(
        &data.allocations,
        &AllocationField::Role,
        &AllocationField::AllocationPercentage,
    );
    let b = Aggregator::average_by_group(
        &data.allocations,
        &AllocationField::Role,
        &AllocationField::AllocationPercentage,
    );
    assert_eq!(a, b);

    assert_eq!(DashboardViews::compute(&data), DashboardViews::compute(&data));
}

#[test]
fn pivot_preserves_row_order_for_any_metric_subset() {
    let rows = table(json!([
        {"month": "Jan", "revenue": 10, "capacity": 20},
        {"month": "Feb", "revenue": 11},
        {"month": "Mar", "revenue": 12, "capacity": 22}
    ]));
    let month = "month".to_string();

    for metrics in [
        vec![],
        vec!["revenue".to_string()],
        vec!["capacity".to_string(), "revenue".to_string()],
    ] {
        let pivot = Aggregator::pivot_time_series(&rows, &month, &metrics);
        assert_eq!(
            pivot.iter().map(|r| r.period.as_str()).collect::<Vec<_>>(),
            ["Jan", "Feb", "Mar"]
        );
        for row in &pivot {
            assert_eq!(row.values.len(), metrics.len());
        }
    }

    let pivot = Aggregator::pivot_time_series(&rows, &month, &["capacity".to_string()]);
    assert_eq!(pivot[1].value("capacity"), Some(0.0));
}

#[test]
fn typed_monthly_rows_pivot_every_metric() {
    let data = generated(8);

    let revenue = Aggregator::pivot_time_series(
        &data.revenue,
        &RevenueField::Month,
        &RevenueField::METRICS,
    );
    assert_eq!(revenue.len(), 12);
    assert_eq!(revenue[0].values.len(), RevenueField::METRICS.len());

    let utilization = Aggregator::pivot_time_series(
        &data.utilization,
        &UtilizationField::Month,
        &[UtilizationField::Utilization],
    );
    for (row, source) in utilization.iter().zip(&data.utilization) {
        assert_eq!(row.period, source.month);
        assert_eq!(
            FieldValue::from(row.value("utilization")),
            source.field_value(&UtilizationField::Utilization)
        );
    }
}

#[test]
fn promotion_flows_cover_every_promotion() {
    let data = generated(13);
    let flows = Aggregator::promotion_flows(&data.people);

    let promotions: usize = data
        .people
        .iter()
        .map(|p| p.promotions.len().saturating_sub(1))
        .sum();
    assert_eq!(flows.iter().map(|f| f.count).sum::<usize>(), promotions);
    for flow in &flows {
        assert_eq!(flow.people.len(), flow.count);
        assert_eq!(flow.target.level(), flow.source.level() + 1);
    }
}
