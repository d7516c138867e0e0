#![allow(dead_code)]

use dynsql::{JdbcType, ast::column::SqlColumn, ast::table::SqlTable};

/// The `Person` table used across the statement tests.
pub struct Person {
    pub table: SqlTable,
    pub id: SqlColumn,
    pub first_name: SqlColumn,
    pub last_name: SqlColumn,
    pub age: SqlColumn,
}

impl Person {
    pub fn new() -> Self {
        let table = SqlTable::new("Person");
        Self {
            id: table.column("id"),
            first_name: table.column("first_name"),
            last_name: table.column("last_name"),
            age: table.column("age"),
            table,
        }
    }

    /// Same table with JDBC types on every column.
    pub fn typed() -> Self {
        let table = SqlTable::new("Person");
        Self {
            id: table.typed_column("id", JdbcType::Integer),
            first_name: table.typed_column("first_name", JdbcType::Varchar),
            last_name: table.typed_column("last_name", JdbcType::Varchar),
            age: table.typed_column("age", JdbcType::Integer),
            table,
        }
    }
}
