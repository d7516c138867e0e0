use serde::{Deserialize, Serialize};

use crate::{
    ast::{column::BasicColumn, condition::Condition, select::SelectModel},
    config::GlobalConfiguration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

#[derive(Debug, Clone)]
pub enum CriterionKind {
    ColumnAndCondition {
        column: BasicColumn,
        condition: Condition,
    },
    Exists {
        select: Box<SelectModel>,
        negated: bool,
    },
    /// A parenthesized sub-tree.
    Group(Box<SqlCriterion>),
    Not(Box<SqlCriterion>),
}

/// One boolean node plus its and/or-connected children.
#[derive(Debug, Clone)]
pub struct SqlCriterion {
    kind: CriterionKind,
    sub_criteria: Vec<AndOrCriteriaGroup>,
}

impl SqlCriterion {
    pub fn new(kind: CriterionKind) -> Self {
        Self {
            kind,
            sub_criteria: Vec::new(),
        }
    }

    pub fn kind(&self) -> &CriterionKind {
        &self.kind
    }

    pub fn sub_criteria(&self) -> &[AndOrCriteriaGroup] {
        &self.sub_criteria
    }

    pub fn with_sub_criteria(mut self, sub_criteria: Vec<AndOrCriteriaGroup>) -> Self {
        self.sub_criteria.extend(sub_criteria);
        self
    }

    pub fn and(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.with(AndOrCriteriaGroup::leaf(Connector::And, column, condition))
    }

    pub fn or(self, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        self.with(AndOrCriteriaGroup::leaf(Connector::Or, column, condition))
    }

    pub fn and_criterion(self, criterion: SqlCriterion) -> Self {
        self.with(AndOrCriteriaGroup::new(Connector::And, criterion))
    }

    pub fn or_criterion(self, criterion: SqlCriterion) -> Self {
        self.with(AndOrCriteriaGroup::new(Connector::Or, criterion))
    }

    pub fn with(mut self, group: AndOrCriteriaGroup) -> Self {
        self.sub_criteria.push(group);
        self
    }

    /// Whether this node is a plain column+condition leaf. Leaves that do not
    /// render take their children with them.
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, CriterionKind::ColumnAndCondition { .. })
    }
}

/// A connector joined to a criterion; the criterion carries the nested
/// sub-criteria.
#[derive(Debug, Clone)]
pub struct AndOrCriteriaGroup {
    connector: Connector,
    criterion: SqlCriterion,
}

impl AndOrCriteriaGroup {
    pub fn new(connector: Connector, criterion: SqlCriterion) -> Self {
        Self {
            connector,
            criterion,
        }
    }

    pub fn leaf(connector: Connector, column: impl Into<BasicColumn>, condition: Condition) -> Self {
        Self::new(
            connector,
            SqlCriterion::new(CriterionKind::ColumnAndCondition {
                column: column.into(),
                condition,
            }),
        )
    }

    pub fn with_sub_criteria(mut self, sub_criteria: Vec<AndOrCriteriaGroup>) -> Self {
        self.criterion = self.criterion.with_sub_criteria(sub_criteria);
        self
    }

    pub fn connector(&self) -> Connector {
        self.connector
    }

    pub fn initial_criterion(&self) -> &SqlCriterion {
        &self.criterion
    }

    pub fn sub_criteria(&self) -> &[AndOrCriteriaGroup] {
        self.criterion.sub_criteria()
    }
}

/// Root of a where or having tree.
///
/// The initial criterion and the chained `sub_criteria` are siblings: a
/// suppressed initial criterion does not suppress what was chained after it.
#[derive(Debug, Clone)]
pub struct WhereModel {
    initial: Option<SqlCriterion>,
    sub_criteria: Vec<AndOrCriteriaGroup>,
    non_rendering_allowed: bool,
}

pub type HavingModel = WhereModel;

impl WhereModel {
    pub fn new(
        initial: Option<SqlCriterion>,
        sub_criteria: Vec<AndOrCriteriaGroup>,
        non_rendering_allowed: bool,
    ) -> Self {
        Self {
            initial,
            sub_criteria,
            non_rendering_allowed,
        }
    }

    /// A standalone where tree starting with `initial`, using the global
    /// non-rendering policy.
    pub fn of(initial: SqlCriterion) -> Self {
        let allowed = GlobalConfiguration::current().non_rendering_where_clause_allowed;
        Self::new(Some(initial), Vec::new(), allowed)
    }

    pub fn with(mut self, group: AndOrCriteriaGroup) -> Self {
        self.sub_criteria.push(group);
        self
    }

    pub fn non_rendering_allowed(mut self, allowed: bool) -> Self {
        self.non_rendering_allowed = allowed;
        self
    }

    pub fn initial_criterion(&self) -> Option<&SqlCriterion> {
        self.initial.as_ref()
    }

    pub fn sub_criteria(&self) -> &[AndOrCriteriaGroup] {
        &self.sub_criteria
    }

    pub fn is_non_rendering_allowed(&self) -> bool {
        self.non_rendering_allowed
    }
}
