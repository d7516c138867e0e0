pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod macros;
pub mod renderer;

pub use model::core::{jdbc_type::JdbcType, value::Value};

/// Everything needed to build and render statements with one import.
pub mod dsl {
    pub use crate::{
        ast::{
            column::{BasicColumn, Function, SortSpecification, SqlColumn},
            criterion::WhereModel,
            select::{JoinCriterion, JoinType},
            table::SqlTable,
        },
        builder::{
            condition::*,
            criterion::{
                and, and_all, and_criterion, criterion, exists, group, not, not_exists, or,
                or_all, or_criterion,
            },
            delete::{delete_from, delete_from_aliased},
            insert::{insert, insert_into, insert_multiple, insert_select_into},
            select::{count_from, select, select_distinct},
            update::{update, update_aliased},
        },
        config::StatementConfiguration,
        renderer::{SqlStatement, render, strategy::RenderingStrategies},
    };
}
