//! Aggregation Module
//! Turns flat record collections into the summary shapes chart adapters consume:
//! category counts, per-group means, per-period metric rows and promotion flows.
//!
//! All functions are pure; calling them twice on the same input yields the same output.

use crate::data::{Designation, FieldKey, Person, Record, MISSING_KEY};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use statrs::statistics::Statistics;

/// Decimal places kept on group averages.
pub const AVERAGE_DECIMALS: i32 = 2;

/// Occurrence count per distinct value, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CountDistribution {
    counts: IndexMap<String, usize>,
}

/// `{name, value}` pair as pie/donut adapters expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: usize,
}

impl CountDistribution {
    /// Count for `key`, zero when never observed.
    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the size of the counted collection.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn to_named_values(&self) -> Vec<NamedValue> {
        self.iter()
            .map(|(name, value)| NamedValue {
                name: name.to_string(),
                value,
            })
            .collect()
    }
}

/// Mean of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub average: f64,
}

/// Per-group means in first-seen group order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupAverage {
    entries: Vec<GroupMean>,
}

impl GroupAverage {
    pub fn get(&self, group: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.group == group)
            .map(|e| e.average)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupMean> {
        self.entries.iter()
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.group.as_str())
    }
}

/// One period with the requested metrics, keyed by metric name.
///
/// Serializes as one flat object: the period under `time_key`, then each metric.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub time_key: String,
    pub period: String,
    pub values: IndexMap<String, f64>,
}

impl PivotRow {
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }
}

impl Serialize for PivotRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let metrics: Vec<(&String, &f64)> = self
            .values
            .iter()
            .filter(|(name, _)| **name != self.time_key)
            .collect();

        let mut map = serializer.serialize_map(Some(metrics.len() + 1))?;
        map.serialize_entry(&self.time_key, &self.period)?;
        for (name, value) in metrics {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// People who moved from one designation to the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionFlow {
    pub source: Designation,
    pub target: Designation,
    pub count: usize,
    pub people: Vec<String>,
}

/// Stateless summary computations over record collections.
pub struct Aggregator;

impl Aggregator {
    /// Count records per distinct value of `field`.
    ///
    /// Records without the field are counted under [`MISSING_KEY`], so the
    /// counts always sum to `records.len()`. A real value spelled like
    /// [`MISSING_KEY`] shares that bucket.
    pub fn count_by_field<R: Record>(records: &[R], field: &R::Field) -> CountDistribution {
        let mut counts: IndexMap<String, usize> = IndexMap::new();

        for record in records {
            let key = record
                .field_value(field)
                .to_key()
                .unwrap_or_else(|| MISSING_KEY.to_string());
            *counts.entry(key).or_insert(0) += 1;
        }

        CountDistribution { counts }
    }

    /// Mean of `value_field` per distinct value of `group_field`, rounded to two decimals.
    ///
    /// Records with a falsy group (missing, empty, zero) or a non-numeric value are skipped,
    /// so every reported group is backed by at least one value.
    pub fn average_by_group<R: Record>(
        records: &[R],
        group_field: &R::Field,
        value_field: &R::Field,
    ) -> GroupAverage {
        let mut buckets: IndexMap<String, Vec<f64>> = IndexMap::new();

        for record in records {
            let group = record.field_value(group_field);
            if !group.is_truthy() {
                continue;
            }
            let Some(value) = record.field_value(value_field).as_number() else {
                continue;
            };
            if let Some(key) = group.to_key() {
                buckets.entry(key).or_default().push(value);
            }
        }

        let entries = buckets
            .into_iter()
            .map(|(group, values)| GroupMean {
                group,
                average: round_half_away(values.iter().mean(), AVERAGE_DECIMALS),
            })
            .collect();

        GroupAverage { entries }
    }

    /// Reshape one-row-per-period records into `{time_field, metric...}` rows.
    ///
    /// Input order is kept. Metrics that are absent or non-numeric on a row become `0.0`.
    /// A metric named like `time_field` is dropped; the period already holds that key.
    pub fn pivot_time_series<R: Record>(
        records: &[R],
        time_field: &R::Field,
        value_fields: &[R::Field],
    ) -> Vec<PivotRow> {
        let time_key = time_field.name();
        let metrics: Vec<&R::Field> = value_fields
            .iter()
            .filter(|field| field.name() != time_key)
            .collect();

        records
            .iter()
            .map(|record| {
                let period = record
                    .field_value(time_field)
                    .to_key()
                    .unwrap_or_else(|| MISSING_KEY.to_string());
                let values = metrics
                    .iter()
                    .map(|field| {
                        let value = record.field_value(field).as_number().unwrap_or(0.0);
                        (field.name().to_string(), value)
                    })
                    .collect();
                PivotRow {
                    time_key: time_key.to_string(),
                    period,
                    values,
                }
            })
            .collect()
    }

    /// Count consecutive designation changes across everyone's history (Sankey links).
    pub fn promotion_flows(people: &[Person]) -> Vec<PromotionFlow> {
        let mut flows: IndexMap<(Designation, Designation), PromotionFlow> = IndexMap::new();

        for person in people {
            for step in person.promotions.windows(2) {
                let (source, target) = (step[0].designation, step[1].designation);
                let flow = flows
                    .entry((source, target))
                    .or_insert_with(|| PromotionFlow {
                        source,
                        target,
                        count: 0,
                        people: Vec::new(),
                    });
                flow.count += 1;
                flow.people.push(person.name.clone());
            }
        }

        flows.into_values().collect()
    }
}

/// Round half away from zero at `decimals` places.
pub fn round_half_away(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
