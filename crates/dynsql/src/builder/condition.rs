//! Factory functions for every condition shape.

use model::core::value::Value;

use crate::ast::{column::BasicColumn, condition::Condition, select::SelectModel};

macro_rules! single_value_conditions {
    ($($name:ident, $when_present:ident => $op:literal;)*) => {
        $(
            pub fn $name(value: impl Into<Value>) -> Condition {
                Condition::single_value($op, Some(value.into()))
            }

            pub fn $when_present<V: Into<Value>>(value: Option<V>) -> Condition {
                Condition::single_value($op, value.map(Into::into))
            }
        )*
    };
}

macro_rules! subselect_conditions {
    ($($name:ident => $op:literal;)*) => {
        $(
            pub fn $name(select: SelectModel) -> Condition {
                Condition::subselect($op, select)
            }
        )*
    };
}

macro_rules! column_conditions {
    ($($name:ident => $op:literal;)*) => {
        $(
            pub fn $name(column: impl Into<BasicColumn>) -> Condition {
                Condition::column_comparison($op, column)
            }
        )*
    };
}

pub fn is_null() -> Condition {
    Condition::no_value("is null")
}

pub fn is_not_null() -> Condition {
    Condition::no_value("is not null")
}

single_value_conditions! {
    is_equal_to, is_equal_to_when_present => "=";
    is_not_equal_to, is_not_equal_to_when_present => "<>";
    is_greater_than, is_greater_than_when_present => ">";
    is_greater_than_or_equal_to, is_greater_than_or_equal_to_when_present => ">=";
    is_less_than, is_less_than_when_present => "<";
    is_less_than_or_equal_to, is_less_than_or_equal_to_when_present => "<=";
    is_like, is_like_when_present => "like";
    is_not_like, is_not_like_when_present => "not like";
}

pub fn is_like_case_insensitive(value: impl Into<Value>) -> Condition {
    is_like(value).case_insensitive()
}

pub fn is_not_like_case_insensitive(value: impl Into<Value>) -> Condition {
    is_not_like(value).case_insensitive()
}

pub fn is_between(value1: impl Into<Value>, value2: impl Into<Value>) -> Condition {
    Condition::two_value("between", "and", Some((value1.into(), value2.into())))
}

pub fn is_not_between(value1: impl Into<Value>, value2: impl Into<Value>) -> Condition {
    Condition::two_value("not between", "and", Some((value1.into(), value2.into())))
}

/// Renders only when both bounds are present.
pub fn is_between_when_present<V: Into<Value>>(value1: Option<V>, value2: Option<V>) -> Condition {
    Condition::two_value("between", "and", both(value1, value2))
}

pub fn is_not_between_when_present<V: Into<Value>>(
    value1: Option<V>,
    value2: Option<V>,
) -> Condition {
    Condition::two_value("not between", "and", both(value1, value2))
}

fn both<V: Into<Value>>(value1: Option<V>, value2: Option<V>) -> Option<(Value, Value)> {
    value1.zip(value2).map(|(a, b)| (a.into(), b.into()))
}

pub fn is_in<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::list_value("in", values.into_iter().map(Into::into).collect())
}

pub fn is_not_in<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::list_value("not in", values.into_iter().map(Into::into).collect())
}

/// Drops absent elements; renders only if at least one element remains.
pub fn is_in_when_present<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = Option<V>>,
    V: Into<Value>,
{
    is_in(values.into_iter().flatten())
}

pub fn is_not_in_when_present<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = Option<V>>,
    V: Into<Value>,
{
    is_not_in(values.into_iter().flatten())
}

pub fn is_in_case_insensitive<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    is_in(values).case_insensitive()
}

pub fn is_not_in_case_insensitive<I, V>(values: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    is_not_in(values).case_insensitive()
}

subselect_conditions! {
    is_equal_to_select => "=";
    is_not_equal_to_select => "<>";
    is_greater_than_select => ">";
    is_greater_than_or_equal_to_select => ">=";
    is_less_than_select => "<";
    is_less_than_or_equal_to_select => "<=";
    is_in_select => "in";
    is_not_in_select => "not in";
}

column_conditions! {
    is_equal_to_column => "=";
    is_not_equal_to_column => "<>";
    is_greater_than_column => ">";
    is_greater_than_or_equal_to_column => ">=";
    is_less_than_column => "<";
    is_less_than_or_equal_to_column => "<=";
}
