//! The immutable statement model.

pub mod column;
pub mod condition;
pub mod criterion;
pub mod delete;
pub mod insert;
pub mod select;
pub mod table;
pub mod update;
