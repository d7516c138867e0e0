/// Builds a `Vec<BasicColumn>` from expressions of mixed column types.
///
/// ```ignore
/// select(columns![person.column("id"), BasicColumn::CountAll])
/// ```
#[macro_export]
macro_rules! columns {
    ($($column:expr),* $(,)?) => {
        vec![$($crate::ast::column::BasicColumn::from($column)),*]
    };
}

/// Builds a `Vec<Value>` for list conditions over mixed value types.
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}
