//! Dataset Generator Module
//! Builds the synthetic people/allocation fixture from a seed.
//!
//! Everything is drawn from one `StdRng`, so the same `DatasetConfig`
//! always yields the same `Dataset`.

use crate::config::DatasetConfig;
use crate::data::records::{
    Allocation, AllocationStatus, AllocationType, Billability, Dataset, Designation, Person,
    Privilege, Promotion, RevenueRow, Role, UtilizationRow,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::{Builder, Uuid};

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const LOCATIONS: [&str; 4] = ["New York", "San Francisco", "Remote", "London"];

const NAMES: [&str; 32] = [
    "Aaron", "Abigail", "Adrian", "Alice", "Bella", "Bruno", "Carla", "Damian", "Diana",
    "Elena", "Ethan", "Fiona", "Gavin", "Grace", "Hector", "Helena", "Ivan", "Jasmine",
    "Julian", "Kara", "Leon", "Lydia", "Marco", "Nadia", "Oscar", "Priya", "Quentin", "Rosa",
    "Silas", "Tamara", "Victor", "Yasmin",
];

/// Joining dates fall up to this many milliseconds before the reference date.
const JOINING_WINDOW_MS: i64 = 10_000_000_000;
/// Each promotion lands up to two years after the previous one.
const PROMOTION_GAP_MS: i64 = 2 * 365 * 24 * 60 * 60 * 1000;

pub struct DatasetGenerator {
    config: DatasetConfig,
    rng: StdRng,
}

impl DatasetGenerator {
    pub fn new(config: DatasetConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Generate people, their allocations and the monthly business metrics.
    pub fn generate(mut self) -> Result<Dataset, GeneratorError> {
        info!(
            seed = self.config.seed,
            people = self.config.people,
            allocations = self.config.allocations,
            year = self.config.year,
            "Generating dataset"
        );

        let people = self.generate_people();
        let allocations = self.generate_allocations(&people)?;
        let revenue = self.generate_revenue();
        let utilization = self.generate_utilization();

        debug!(
            people = people.len(),
            allocations = allocations.len(),
            months = revenue.len(),
            "Dataset generated"
        );

        Ok(Dataset {
            people,
            allocations,
            revenue,
            utilization,
        })
    }

    fn next_uuid(&mut self) -> Uuid {
        Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }

    /// Weighted: half get one promotion, 30% two, 15% three, 5% four.
    fn promotion_count(&mut self) -> usize {
        let roll: f64 = self.rng.gen();
        if roll < 0.5 {
            1
        } else if roll < 0.8 {
            2
        } else if roll < 0.95 {
            3
        } else {
            4
        }
    }

    fn generate_people(&mut self) -> Vec<Person> {
        let now = self
            .config
            .reference_date
            .and_time(NaiveTime::MIN)
            .and_utc();

        (0..self.config.people)
            .map(|index| {
                let id = self.next_uuid();
                let name = NAMES[self.rng.gen_range(0..NAMES.len())].to_string();
                let joined = now - Duration::milliseconds(self.rng.gen_range(0..JOINING_WINDOW_MS));

                let mut promotions = vec![Promotion {
                    designation: Designation::Engineer,
                    date: joined,
                }];
                let mut last_date = joined;
                for step in 1..=self.promotion_count() {
                    last_date += Duration::milliseconds(self.rng.gen_range(0..PROMOTION_GAP_MS));
                    promotions.push(Promotion {
                        designation: Designation::LADDER[step],
                        date: last_date,
                    });
                }

                let designation = promotions
                    .last()
                    .map(|p| p.designation)
                    .unwrap_or(Designation::Engineer);
                let privilege = if self.rng.gen_bool(0.9) {
                    Privilege::User
                } else {
                    Privilege::Admin
                };

                Person {
                    id,
                    name,
                    email: format!("user{index}@example.com"),
                    privilege,
                    created_at: joined,
                    date_of_joining: joined,
                    updated_at: now,
                    user_data_id: format!("user_data_{index}"),
                    designation,
                    promotions,
                }
            })
            .collect()
    }

    fn generate_allocations(
        &mut self,
        people: &[Person],
    ) -> Result<Vec<Allocation>, GeneratorError> {
        if people.is_empty() {
            if self.config.allocations > 0 {
                warn!("No people generated, skipping allocations");
            }
            return Ok(Vec::new());
        }

        let year = self.config.year;
        let mut allocations = Vec::with_capacity(self.config.allocations);

        for index in 0..self.config.allocations {
            let month = (index % 12) as u32 + 1;
            let (start, end) = month_bounds(year, month).ok_or(GeneratorError::InvalidYear(year))?;
            let created_at = start
                .with_day((index % 28) as u32 + 1)
                .unwrap_or(start)
                .and_time(NaiveTime::MIN)
                .and_utc();

            let percentage = ((index % 10) + 1) as f64 * 10.0;
            let (billability, billability_percentage) = if index % 2 == 0 {
                (Billability::Billable, percentage)
            } else {
                (Billability::NonBillable, 0.0)
            };

            allocations.push(Allocation {
                id: self.next_uuid(),
                user_id: people[index % people.len()].id,
                alloc_start_date: start,
                alloc_end_date: end,
                allocation_percentage: Some(percentage),
                billability,
                billability_percentage,
                role: Some(Role::ALL[index % Role::ALL.len()]),
                allocation_type: AllocationType::ALL[index % AllocationType::ALL.len()],
                status: AllocationStatus::ALL[index % AllocationStatus::ALL.len()],
                comments: format!("This is a comment for allocation {}", index + 1),
                location: LOCATIONS[index % LOCATIONS.len()].to_string(),
                mission: format!("Mission {}", (index % 5) + 1),
                project: format!("Project {}", (index % 10) + 1),
                created_by: format!("User {}", (index % 20) + 1),
                created_at,
                updated_at: created_at,
            });
        }

        Ok(allocations)
    }

    fn generate_revenue(&mut self) -> Vec<RevenueRow> {
        MONTHS
            .iter()
            .map(|month| {
                let revenue = self.amount(40_000.0, 120_000.0);
                RevenueRow {
                    month: month.to_string(),
                    revenue: Some(revenue),
                    active_po: Some(self.amount(5_000.0, 30_000.0)),
                    committed: Some(self.amount(5_000.0, 25_000.0)),
                    best_case: Some(self.amount(2_000.0, 20_000.0)),
                    qualified50: Some(self.amount(1_000.0, 15_000.0)),
                    qualified_below50: Some(self.amount(1_000.0, 10_000.0)),
                    other: Some(self.amount(0.0, 8_000.0)),
                }
            })
            .collect()
    }

    fn generate_utilization(&mut self) -> Vec<UtilizationRow> {
        let mut running_total = 0.0;

        MONTHS
            .iter()
            .enumerate()
            .map(|(index, month)| {
                let capacity = self.amount(100_000.0, 150_000.0);
                let utilization = round2(self.rng.gen_range(60.0..110.0));
                let forecast = round2(utilization + self.rng.gen_range(-5.0..5.0));
                running_total += utilization;

                UtilizationRow {
                    month: month.to_string(),
                    revenue: Some((capacity * utilization / 100.0).round()),
                    capacity: Some(capacity),
                    utilization: Some(utilization),
                    forecast: Some(forecast),
                    avg_utilization: Some(round2(running_total / (index + 1) as f64)),
                }
            })
            .collect()
    }

    /// Whole-dollar amount in `[low, high)`.
    fn amount(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high).round()
    }
}

/// First and last day of `month` (1-based) in `year`.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
