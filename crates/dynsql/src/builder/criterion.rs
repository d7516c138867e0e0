//! Free functions assembling criterion trees.

use crate::{
    ast::{
        column::BasicColumn,
        condition::Condition,
        criterion::{AndOrCriteriaGroup, Connector, CriterionKind, SqlCriterion, WhereModel},
        select::SelectModel,
    },
    error::{DynSqlError, Result},
};

/// A column+condition leaf.
pub fn criterion(column: impl Into<BasicColumn>, condition: Condition) -> SqlCriterion {
    SqlCriterion::new(CriterionKind::ColumnAndCondition {
        column: column.into(),
        condition,
    })
}

/// Parenthesizes `inner` when it renders to more than one piece.
pub fn group(inner: SqlCriterion) -> SqlCriterion {
    SqlCriterion::new(CriterionKind::Group(Box::new(inner)))
}

pub fn not(inner: SqlCriterion) -> SqlCriterion {
    SqlCriterion::new(CriterionKind::Not(Box::new(inner)))
}

pub fn exists(select: SelectModel) -> SqlCriterion {
    SqlCriterion::new(CriterionKind::Exists {
        select: Box::new(select),
        negated: false,
    })
}

pub fn not_exists(select: SelectModel) -> SqlCriterion {
    SqlCriterion::new(CriterionKind::Exists {
        select: Box::new(select),
        negated: true,
    })
}

pub fn and(column: impl Into<BasicColumn>, condition: Condition) -> AndOrCriteriaGroup {
    AndOrCriteriaGroup::leaf(Connector::And, column, condition)
}

pub fn or(column: impl Into<BasicColumn>, condition: Condition) -> AndOrCriteriaGroup {
    AndOrCriteriaGroup::leaf(Connector::Or, column, condition)
}

pub fn and_criterion(criterion: SqlCriterion) -> AndOrCriteriaGroup {
    AndOrCriteriaGroup::new(Connector::And, criterion)
}

pub fn or_criterion(criterion: SqlCriterion) -> AndOrCriteriaGroup {
    AndOrCriteriaGroup::new(Connector::Or, criterion)
}

/// Groups `criteria` joined with `and`. Fails on an empty list.
pub fn and_all(criteria: Vec<SqlCriterion>) -> Result<SqlCriterion> {
    combine(criteria, Connector::And)
}

/// Groups `criteria` joined with `or`. Fails on an empty list.
pub fn or_all(criteria: Vec<SqlCriterion>) -> Result<SqlCriterion> {
    combine(criteria, Connector::Or)
}

fn combine(criteria: Vec<SqlCriterion>, connector: Connector) -> Result<SqlCriterion> {
    let mut criteria = criteria.into_iter();
    let first = criteria.next().ok_or(DynSqlError::EmptyStructure {
        structure: "Criteria group",
    })?;
    let rest = criteria
        .map(|c| AndOrCriteriaGroup::new(connector, c))
        .collect::<Vec<_>>();
    if rest.is_empty() {
        return Ok(first);
    }
    Ok(group(first).with_sub_criteria(rest))
}

/// Accumulates a where or having tree for the statement builders.
#[derive(Debug, Clone, Default)]
pub(crate) struct CriteriaDraft {
    started: bool,
    initial: Option<SqlCriterion>,
    sub_criteria: Vec<AndOrCriteriaGroup>,
}

impl CriteriaDraft {
    pub(crate) fn is_started(&self) -> bool {
        self.started
    }

    /// Sets the initial criterion; a second call chains with `and`.
    pub(crate) fn initial(&mut self, criterion: SqlCriterion) {
        self.started = true;
        if self.initial.is_none() {
            self.initial = Some(criterion);
        } else {
            self.sub_criteria
                .push(AndOrCriteriaGroup::new(Connector::And, criterion));
        }
    }

    /// Starts the clause without an initial criterion.
    pub(crate) fn start(&mut self) {
        self.started = true;
    }

    pub(crate) fn push(&mut self, group: AndOrCriteriaGroup) {
        self.started = true;
        self.sub_criteria.push(group);
    }

    pub(crate) fn build(self, non_rendering_allowed: bool) -> Option<WhereModel> {
        self.started
            .then(|| WhereModel::new(self.initial, self.sub_criteria, non_rendering_allowed))
    }
}
