use std::{fmt, sync::Arc};

use model::core::value::Value;

use crate::ast::{column::BasicColumn, select::SelectModel};

/// Lazy predicate consulted at render time.
pub type RenderPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// The shape of a predicate, independent of the column it applies to.
///
/// For the value-bearing shapes `None` means the condition was emptied (by a
/// "when present" constructor or by [`Condition::filter`]) and does not
/// render. A bound SQL `NULL` is `Some(Value::Null)`.
#[derive(Debug, Clone)]
pub enum ConditionKind {
    NoValue {
        operator: String,
    },
    SingleValue {
        operator: String,
        value: Option<Value>,
    },
    TwoValue {
        operator1: String,
        operator2: String,
        values: Option<(Value, Value)>,
    },
    ListValue {
        operator: String,
        values: Vec<Value>,
    },
    Subselect {
        operator: String,
        select: Box<SelectModel>,
    },
    ColumnComparison {
        operator: String,
        column: Box<BasicColumn>,
    },
}

#[derive(Clone)]
pub struct Condition {
    kind: ConditionKind,
    case_insensitive: bool,
    render_when: Option<RenderPredicate>,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            case_insensitive: false,
            render_when: None,
        }
    }

    pub fn no_value(operator: impl Into<String>) -> Self {
        Self::new(ConditionKind::NoValue {
            operator: operator.into(),
        })
    }

    pub fn single_value(operator: impl Into<String>, value: Option<Value>) -> Self {
        Self::new(ConditionKind::SingleValue {
            operator: operator.into(),
            value,
        })
    }

    pub fn two_value(
        operator1: impl Into<String>,
        operator2: impl Into<String>,
        values: Option<(Value, Value)>,
    ) -> Self {
        Self::new(ConditionKind::TwoValue {
            operator1: operator1.into(),
            operator2: operator2.into(),
            values,
        })
    }

    pub fn list_value(operator: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(ConditionKind::ListValue {
            operator: operator.into(),
            values,
        })
    }

    pub fn subselect(operator: impl Into<String>, select: SelectModel) -> Self {
        Self::new(ConditionKind::Subselect {
            operator: operator.into(),
            select: Box::new(select),
        })
    }

    pub fn column_comparison(operator: impl Into<String>, column: impl Into<BasicColumn>) -> Self {
        Self::new(ConditionKind::ColumnComparison {
            operator: operator.into(),
            column: Box::new(column.into()),
        })
    }

    /// Compares `upper(column)` against upper-cased values.
    pub(crate) fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self.map(|v| v.to_uppercase())
    }

    pub fn kind(&self) -> &ConditionKind {
        &self.kind
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Attaches a predicate evaluated at render time; when it returns false
    /// the condition does not render.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.render_when = Some(Arc::new(predicate));
        self
    }

    /// Keeps only values accepted by `predicate`.
    ///
    /// A single or two-value condition whose values are rejected becomes
    /// empty. A list keeps the accepted elements.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool,
    {
        match &mut self.kind {
            ConditionKind::SingleValue { value, .. } => {
                *value = value.take().filter(|v| predicate(v));
            }
            ConditionKind::TwoValue { values, .. } => {
                *values = values.take().filter(|(a, b)| predicate(a) && predicate(b));
            }
            ConditionKind::ListValue { values, .. } => {
                values.retain(|v| predicate(v));
            }
            _ => {}
        }
        self
    }

    /// Transforms every bound value.
    pub fn map<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&Value) -> Value,
    {
        match &mut self.kind {
            ConditionKind::SingleValue { value, .. } => {
                *value = value.as_ref().map(&mapper);
            }
            ConditionKind::TwoValue { values, .. } => {
                *values = values.as_ref().map(|(a, b)| (mapper(a), mapper(b)));
            }
            ConditionKind::ListValue { values, .. } => {
                *values = values.iter().map(&mapper).collect();
            }
            _ => {}
        }
        self
    }

    /// Either an emptied value set or a false render predicate suppresses the
    /// condition; neither takes precedence.
    pub fn should_render(&self) -> bool {
        let has_values = match &self.kind {
            ConditionKind::SingleValue { value, .. } => value.is_some(),
            ConditionKind::TwoValue { values, .. } => values.is_some(),
            ConditionKind::ListValue { values, .. } => !values.is_empty(),
            _ => true,
        };
        has_values && self.render_when.as_ref().is_none_or(|predicate| predicate())
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("kind", &self.kind)
            .field("case_insensitive", &self.case_insensitive)
            .field("render_when", &self.render_when.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::condition::*;

    #[test]
    fn empty_list_does_not_render() {
        assert!(!is_in(Vec::<i32>::new()).should_render());
        assert!(is_in([1]).should_render());
    }

    #[test]
    fn when_present_drops_absent_values() {
        assert!(!is_equal_to_when_present(None::<i32>).should_render());
        assert!(is_equal_to_when_present(Some(3)).should_render());
        assert!(!is_between_when_present(Some(1), None::<i32>).should_render());
    }

    #[test]
    fn predicate_and_emptiness_are_independent() {
        assert!(!is_in([1, 2]).when(|| false).should_render());
        assert!(!is_in(Vec::<i32>::new()).when(|| true).should_render());
        assert!(is_in([1, 2]).when(|| true).should_render());
    }

    #[test]
    fn filter_empties_rejected_values() {
        let cond = is_equal_to(3).filter(|v| v.as_i64() == Some(4));
        assert!(!cond.should_render());

        let cond = is_in([1, 2, 3, 4]).filter(|v| v.as_i64().is_some_and(|i| i % 2 == 0));
        match cond.kind() {
            ConditionKind::ListValue { values, .. } => {
                assert_eq!(values, &vec![Value::Int(2), Value::Int(4)])
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn map_transforms_values() {
        let cond = is_like("fred").map(|v| Value::from(format!("%{}%", v.as_str().unwrap_or(""))));
        match cond.kind() {
            ConditionKind::SingleValue { value, .. } => {
                assert_eq!(value, &Some(Value::from("%fred%")))
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn case_insensitive_uppercases_values() {
        let cond = is_in_case_insensitive(["Fred", "wilma"]);
        assert!(cond.is_case_insensitive());
        match cond.kind() {
            ConditionKind::ListValue { operator, values } => {
                assert_eq!(operator, "in");
                assert_eq!(values, &vec![Value::from("FRED"), Value::from("WILMA")]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
