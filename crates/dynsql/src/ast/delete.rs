use crate::{
    ast::{criterion::WhereModel, select::OrderByModel, table::SqlTable},
    config::StatementConfiguration,
};

#[derive(Debug, Clone)]
pub struct DeleteModel {
    pub(crate) table: SqlTable,
    pub(crate) table_alias: Option<String>,
    pub(crate) where_model: Option<WhereModel>,
    pub(crate) order_by: Option<OrderByModel>,
    pub(crate) limit: Option<u64>,
    pub(crate) configuration: StatementConfiguration,
}

impl DeleteModel {
    pub fn table(&self) -> &SqlTable {
        &self.table
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    pub fn where_model(&self) -> Option<&WhereModel> {
        self.where_model.as_ref()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}
