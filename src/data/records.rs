//! Record Schemas Module
//! People, allocations and monthly business metrics, plus their field selectors.

use crate::data::field::{FieldKey, FieldValue, Record};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    User,
    Admin,
}

impl Privilege {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::User => "user",
            Privilege::Admin => "admin",
        }
    }
}

/// Career ladder, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Designation {
    Engineer,
    #[serde(rename = "Senior Engineer")]
    SeniorEngineer,
    Lead,
    Manager,
    Director,
}

impl Designation {
    pub const LADDER: [Designation; 5] = [
        Designation::Engineer,
        Designation::SeniorEngineer,
        Designation::Lead,
        Designation::Manager,
        Designation::Director,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Engineer => "Engineer",
            Designation::SeniorEngineer => "Senior Engineer",
            Designation::Lead => "Lead",
            Designation::Manager => "Manager",
            Designation::Director => "Director",
        }
    }

    /// Position on the ladder (0 = Engineer).
    pub fn level(&self) -> usize {
        Self::LADDER
            .iter()
            .position(|d| d == self)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub designation: Designation,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub privilege: Privilege,
    pub created_at: DateTime<Utc>,
    pub date_of_joining: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_data_id: String,
    pub designation: Designation,
    /// Designation history; the first entry is the joining designation.
    #[serde(default)]
    pub promotions: Vec<Promotion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    Id,
    Name,
    Email,
    Privilege,
    Designation,
    DateOfJoining,
    PromotionCount,
}

impl FieldKey for PersonField {
    fn name(&self) -> &str {
        match self {
            PersonField::Id => "id",
            PersonField::Name => "name",
            PersonField::Email => "email",
            PersonField::Privilege => "privilege",
            PersonField::Designation => "designation",
            PersonField::DateOfJoining => "date_of_joining",
            PersonField::PromotionCount => "promotion_count",
        }
    }
}

impl Record for Person {
    type Field = PersonField;

    fn field_value(&self, field: &PersonField) -> FieldValue<'_> {
        match field {
            PersonField::Id => FieldValue::owned(self.id.to_string()),
            PersonField::Name => FieldValue::text(&self.name),
            PersonField::Email => FieldValue::text(&self.email),
            PersonField::Privilege => FieldValue::text(self.privilege.as_str()),
            PersonField::Designation => FieldValue::text(self.designation.as_str()),
            PersonField::DateOfJoining => FieldValue::owned(
                self.date_of_joining
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            // Joining entry is not a promotion.
            PersonField::PromotionCount => {
                FieldValue::Number(self.promotions.len().saturating_sub(1) as f64)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Developer,
    Manager,
    Designer,
    #[serde(rename = "QA")]
    Qa,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Developer, Role::Manager, Role::Designer, Role::Qa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "Developer",
            Role::Manager => "Manager",
            Role::Designer => "Designer",
            Role::Qa => "QA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Billability {
    Billable,
    #[serde(rename = "Non-Billable")]
    NonBillable,
}

impl Billability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Billability::Billable => "Billable",
            Billability::NonBillable => "Non-Billable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contractor,
}

impl AllocationType {
    pub const ALL: [AllocationType; 3] = [
        AllocationType::FullTime,
        AllocationType::PartTime,
        AllocationType::Contractor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationType::FullTime => "Full-Time",
            AllocationType::PartTime => "Part-Time",
            AllocationType::Contractor => "Contractor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationStatus {
    Active,
    Inactive,
    Pending,
}

impl AllocationStatus {
    pub const ALL: [AllocationStatus; 3] = [
        AllocationStatus::Active,
        AllocationStatus::Inactive,
        AllocationStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::Active => "Active",
            AllocationStatus::Inactive => "Inactive",
            AllocationStatus::Pending => "Pending",
        }
    }
}

/// One person's allocation to a project for a time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub alloc_start_date: NaiveDate,
    pub alloc_end_date: NaiveDate,
    #[serde(default)]
    pub allocation_percentage: Option<f64>,
    pub billability: Billability,
    #[serde(default)]
    pub billability_percentage: f64,
    #[serde(default)]
    pub role: Option<Role>,
    pub allocation_type: AllocationType,
    pub status: AllocationStatus,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationField {
    Id,
    UserId,
    StartDate,
    EndDate,
    AllocationPercentage,
    Billability,
    BillabilityPercentage,
    Role,
    AllocationType,
    Status,
    Location,
    Mission,
    Project,
    CreatedBy,
}

impl FieldKey for AllocationField {
    fn name(&self) -> &str {
        match self {
            AllocationField::Id => "id",
            AllocationField::UserId => "user_id",
            AllocationField::StartDate => "alloc_start_date",
            AllocationField::EndDate => "alloc_end_date",
            AllocationField::AllocationPercentage => "allocation_percentage",
            AllocationField::Billability => "billability",
            AllocationField::BillabilityPercentage => "billability_percentage",
            AllocationField::Role => "role",
            AllocationField::AllocationType => "allocation_type",
            AllocationField::Status => "status",
            AllocationField::Location => "location",
            AllocationField::Mission => "mission",
            AllocationField::Project => "project",
            AllocationField::CreatedBy => "created_by",
        }
    }
}

impl Record for Allocation {
    type Field = AllocationField;

    fn field_value(&self, field: &AllocationField) -> FieldValue<'_> {
        match field {
            AllocationField::Id => FieldValue::owned(self.id.to_string()),
            AllocationField::UserId => FieldValue::owned(self.user_id.to_string()),
            AllocationField::StartDate => FieldValue::owned(self.alloc_start_date.to_string()),
            AllocationField::EndDate => FieldValue::owned(self.alloc_end_date.to_string()),
            AllocationField::AllocationPercentage => self.allocation_percentage.into(),
            AllocationField::Billability => FieldValue::text(self.billability.as_str()),
            AllocationField::BillabilityPercentage => {
                FieldValue::Number(self.billability_percentage)
            }
            AllocationField::Role => self.role.map(|r| r.as_str()).into(),
            AllocationField::AllocationType => FieldValue::text(self.allocation_type.as_str()),
            AllocationField::Status => FieldValue::text(self.status.as_str()),
            AllocationField::Location => FieldValue::text(&self.location),
            AllocationField::Mission => FieldValue::text(&self.mission),
            AllocationField::Project => FieldValue::text(&self.project),
            AllocationField::CreatedBy => FieldValue::text(&self.created_by),
        }
    }
}

/// Monthly revenue pipeline (stacked bar source).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueRow {
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(rename = "activePO", default, skip_serializing_if = "Option::is_none")]
    pub active_po: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed: Option<f64>,
    #[serde(rename = "bestCase", default, skip_serializing_if = "Option::is_none")]
    pub best_case: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified50: Option<f64>,
    #[serde(
        rename = "qualifiedBelow50",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub qualified_below50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueField {
    Month,
    Revenue,
    ActivePo,
    Committed,
    BestCase,
    Qualified50,
    QualifiedBelow50,
    Other,
}

impl RevenueField {
    /// Stack order, bottom first.
    pub const METRICS: [RevenueField; 7] = [
        RevenueField::Revenue,
        RevenueField::ActivePo,
        RevenueField::Committed,
        RevenueField::BestCase,
        RevenueField::Qualified50,
        RevenueField::QualifiedBelow50,
        RevenueField::Other,
    ];
}

impl FieldKey for RevenueField {
    fn name(&self) -> &str {
        match self {
            RevenueField::Month => "month",
            RevenueField::Revenue => "revenue",
            RevenueField::ActivePo => "activePO",
            RevenueField::Committed => "committed",
            RevenueField::BestCase => "bestCase",
            RevenueField::Qualified50 => "qualified50",
            RevenueField::QualifiedBelow50 => "qualifiedBelow50",
            RevenueField::Other => "other",
        }
    }
}

impl Record for RevenueRow {
    type Field = RevenueField;

    fn field_value(&self, field: &RevenueField) -> FieldValue<'_> {
        match field {
            RevenueField::Month => FieldValue::text(&self.month),
            RevenueField::Revenue => self.revenue.into(),
            RevenueField::ActivePo => self.active_po.into(),
            RevenueField::Committed => self.committed.into(),
            RevenueField::BestCase => self.best_case.into(),
            RevenueField::Qualified50 => self.qualified50.into(),
            RevenueField::QualifiedBelow50 => self.qualified_below50.into(),
            RevenueField::Other => self.other.into(),
        }
    }
}

/// Monthly utilization (bar + line combo source).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UtilizationRow {
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<f64>,
    #[serde(
        rename = "avgUtilization",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub avg_utilization: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationField {
    Month,
    Revenue,
    Capacity,
    Utilization,
    Forecast,
    AvgUtilization,
}

impl UtilizationField {
    pub const METRICS: [UtilizationField; 5] = [
        UtilizationField::Revenue,
        UtilizationField::Capacity,
        UtilizationField::Utilization,
        UtilizationField::Forecast,
        UtilizationField::AvgUtilization,
    ];
}

impl FieldKey for UtilizationField {
    fn name(&self) -> &str {
        match self {
            UtilizationField::Month => "month",
            UtilizationField::Revenue => "revenue",
            UtilizationField::Capacity => "capacity",
            UtilizationField::Utilization => "utilization",
            UtilizationField::Forecast => "forecast",
            UtilizationField::AvgUtilization => "avgUtilization",
        }
    }
}

impl Record for UtilizationRow {
    type Field = UtilizationField;

    fn field_value(&self, field: &UtilizationField) -> FieldValue<'_> {
        match field {
            UtilizationField::Month => FieldValue::text(&self.month),
            UtilizationField::Revenue => self.revenue.into(),
            UtilizationField::Capacity => self.capacity.into(),
            UtilizationField::Utilization => self.utilization.into(),
            UtilizationField::Forecast => self.forecast.into(),
            UtilizationField::AvgUtilization => self.avg_utilization.into(),
        }
    }
}

/// Untyped row from an external table (CSV or JSON); fields are column names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    cells: IndexMap<String, Value>,
}

impl TableRow {
    pub fn new(cells: IndexMap<String, Value>) -> Self {
        Self { cells }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl Record for TableRow {
    type Field = String;

    fn field_value(&self, field: &String) -> FieldValue<'_> {
        match self.cells.get(field) {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::Bool(b)) => FieldValue::Flag(*b),
            Some(Value::Number(n)) => n.as_f64().into(),
            Some(Value::String(s)) => FieldValue::text(s),
            Some(other) => FieldValue::owned(other.to_string()),
        }
    }
}

/// Every collection the demo views are derived from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub people: Vec<Person>,
    pub allocations: Vec<Allocation>,
    pub revenue: Vec<RevenueRow>,
    pub utilization: Vec<UtilizationRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_designation_levels() {
        assert_eq!(Designation::Engineer.level(), 0);
        assert_eq!(Designation::Director.level(), 4);
        assert_eq!(Designation::LADDER[2].as_str(), "Lead");
    }

    #[test]
    fn test_allocation_deserializes_fixture_shape() {
        let raw = json!({
            "id": "6f1c2f1e-8f4a-4b7a-9a55-2b1f0c0f4a11",
            "user_id": "0b8e5c8e-3d8e-4d67-8a0e-7f0f9a4f6c22",
            "alloc_start_date": "2023-01-01",
            "alloc_end_date": "2023-01-31",
            "allocation_percentage": 10,
            "billability": "Non-Billable",
            "billability_percentage": 0,
            "role": "QA",
            "allocation_type": "Full-Time",
            "status": "Pending",
            "location": "Remote",
            "project": "Project 1",
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2023-01-01T00:00:00Z"
        });

        let alloc: Allocation = serde_json::from_value(raw).unwrap();
        assert_eq!(alloc.role, Some(Role::Qa));
        assert_eq!(alloc.billability, Billability::NonBillable);
        assert_eq!(alloc.allocation_percentage, Some(10.0));
        assert_eq!(
            alloc.field_value(&AllocationField::Role),
            FieldValue::text("QA")
        );
        assert_eq!(
            alloc.field_value(&AllocationField::StartDate),
            FieldValue::owned("2023-01-01".to_string())
        );
        assert!(!alloc.field_value(&AllocationField::Mission).is_truthy());
    }

    #[test]
    fn test_revenue_row_uses_camel_case_keys() {
        let row: RevenueRow = serde_json::from_value(json!({
            "month": "Jan",
            "revenue": 100,
            "activePO": 20,
            "qualifiedBelow50": 5
        }))
        .unwrap();

        assert_eq!(row.active_po, Some(20.0));
        assert_eq!(row.qualified_below50, Some(5.0));
        assert_eq!(row.field_value(&RevenueField::Committed), FieldValue::Missing);
        assert_eq!(RevenueField::ActivePo.name(), "activePO");
    }

    #[test]
    fn test_table_row_field_values() {
        let row: TableRow = serde_json::from_value(json!({
            "month": "Feb",
            "hours": 12.5,
            "billable": true,
            "note": null
        }))
        .unwrap();

        assert_eq!(row.field_value(&"month".to_string()), FieldValue::text("Feb"));
        assert_eq!(row.field_value(&"hours".to_string()), FieldValue::Number(12.5));
        assert_eq!(row.field_value(&"billable".to_string()), FieldValue::Flag(true));
        assert_eq!(row.field_value(&"note".to_string()), FieldValue::Missing);
        assert_eq!(row.field_value(&"absent".to_string()), FieldValue::Missing);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["month", "hours", "billable", "note"]);
    }
}
