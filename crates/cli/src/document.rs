//! JSON statement documents accepted by `dynsql render`.
//!
//! Columns are referenced as `qualifier.column`, where the qualifier is a
//! declared table's name or alias. `*` selects all columns of a table and
//! `count(*)` counts rows.

use dynsql::ast::select::JoinType;
use serde::Deserialize;
use serde_json::Value as Json;

#[derive(Debug, Deserialize)]
pub struct StatementDocument {
    #[serde(default)]
    pub tables: Vec<TableDef>,
    pub statement: StatementDef,
}

#[derive(Debug, Deserialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// JDBC type name, e.g. `VARCHAR`.
    #[serde(default)]
    pub jdbc_type: Option<String>,
    #[serde(default)]
    pub type_handler: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementDef {
    Select(SelectDef),
    Delete(DeleteDef),
    Update(UpdateDef),
    Insert(InsertDef),
    InsertRecord(InsertRecordDef),
}

#[derive(Debug, Deserialize)]
pub struct SelectDef {
    #[serde(default)]
    pub distinct: bool,
    pub columns: Vec<String>,
    pub from: String,
    #[serde(default)]
    pub joins: Vec<JoinDef>,
    #[serde(default, rename = "where")]
    pub filter: Option<CriterionDef>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<SortDef>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub fetch_first: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct JoinDef {
    #[serde(default = "inner_join")]
    pub join_type: JoinType,
    pub table: String,
    /// Column pairs joined by equality; the first pair is the `on`.
    pub on: Vec<(String, String)>,
}

fn inner_join() -> JoinType {
    JoinType::Inner
}

#[derive(Debug, Deserialize)]
pub struct SortDef {
    pub column: String,
    #[serde(default)]
    pub descending: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteDef {
    pub table: String,
    #[serde(default, rename = "where")]
    pub filter: Option<CriterionDef>,
    #[serde(default)]
    pub order_by: Vec<SortDef>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDef {
    pub table: String,
    pub set: Vec<AssignmentDef>,
    #[serde(default, rename = "where")]
    pub filter: Option<CriterionDef>,
    #[serde(default)]
    pub order_by: Vec<SortDef>,
    #[serde(default)]
    pub limit: Option<u64>,
}

/// `column = value`. A `null` value sets null unless `when_present` is
/// set, in which case the assignment is dropped.
#[derive(Debug, Deserialize)]
pub struct AssignmentDef {
    pub column: String,
    #[serde(default)]
    pub value: Json,
    #[serde(default)]
    pub when_present: bool,
}

#[derive(Debug, Deserialize)]
pub struct InsertDef {
    pub table: String,
    pub values: Vec<AssignmentDef>,
}

/// Record-based insert; `records` switches to the multi-row form.
#[derive(Debug, Deserialize)]
pub struct InsertRecordDef {
    pub table: String,
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub records: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyDef {
    pub column: String,
    pub property: String,
}

/// A where tree: `{"condition": {...}}`, `{"and": [...]}`, `{"or": [...]}`
/// or `{"not": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionDef {
    Condition(ConditionDef),
    And(Vec<CriterionDef>),
    Or(Vec<CriterionDef>),
    Not(Box<CriterionDef>),
}

#[derive(Debug, Deserialize)]
pub struct ConditionDef {
    pub column: String,
    pub op: Operator,
    /// Single value; `null` or absent suppresses the condition.
    #[serde(default)]
    pub value: Json,
    /// List or between values; `null` entries are dropped.
    #[serde(default)]
    pub values: Vec<Json>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    IsNull,
    IsNotNull,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Like,
    NotLike,
    LikeCaseInsensitive,
    Between,
    NotBetween,
    In,
    NotIn,
    InCaseInsensitive,
    NotInCaseInsensitive,
}
