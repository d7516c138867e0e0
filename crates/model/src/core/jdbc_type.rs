use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};
use thiserror::Error;

/// Type tag attached to a column or a bound parameter.
///
/// Mirrors the `java.sql.Types` names because those are what the
/// MyBatis-style placeholder syntax (`jdbcType=VARCHAR`) expects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JdbcType {
    Array,
    BigInt,
    Binary,
    Bit,
    Blob,
    Boolean,
    Char,
    Clob,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    LongVarchar,
    Null,
    Numeric,
    Other,
    Real,
    SmallInt,
    Time,
    Timestamp,
    TimestampWithTimezone,
    TinyInt,
    VarBinary,
    Varchar,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JdbcTypeError {
    #[error("Unknown JDBC type: {0}")]
    Unknown(String),
}

lazy_static! {
    static ref JDBC_TYPE_MAP: HashMap<&'static str, JdbcType> = build_jdbc_type_map();
}

impl JdbcType {
    /// The canonical upper-case name, e.g. `VARCHAR` or `TIMESTAMP_WITH_TIMEZONE`.
    pub fn jdbc_name(&self) -> &'static str {
        match self {
            JdbcType::Array => "ARRAY",
            JdbcType::BigInt => "BIGINT",
            JdbcType::Binary => "BINARY",
            JdbcType::Bit => "BIT",
            JdbcType::Blob => "BLOB",
            JdbcType::Boolean => "BOOLEAN",
            JdbcType::Char => "CHAR",
            JdbcType::Clob => "CLOB",
            JdbcType::Date => "DATE",
            JdbcType::Decimal => "DECIMAL",
            JdbcType::Double => "DOUBLE",
            JdbcType::Float => "FLOAT",
            JdbcType::Integer => "INTEGER",
            JdbcType::LongVarchar => "LONGVARCHAR",
            JdbcType::Null => "NULL",
            JdbcType::Numeric => "NUMERIC",
            JdbcType::Other => "OTHER",
            JdbcType::Real => "REAL",
            JdbcType::SmallInt => "SMALLINT",
            JdbcType::Time => "TIME",
            JdbcType::Timestamp => "TIMESTAMP",
            JdbcType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            JdbcType::TinyInt => "TINYINT",
            JdbcType::VarBinary => "VARBINARY",
            JdbcType::Varchar => "VARCHAR",
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            JdbcType::Char | JdbcType::Clob | JdbcType::LongVarchar | JdbcType::Varchar
        )
    }

    fn normalize_type_name(type_name: &str) -> String {
        type_name
            .trim()
            .to_ascii_uppercase()
            .replace([' ', '-'], "_")
    }
}

impl FromStr for JdbcType {
    type Err = JdbcTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = Self::normalize_type_name(s);
        JDBC_TYPE_MAP
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| JdbcTypeError::Unknown(s.to_string()))
    }
}

impl fmt::Display for JdbcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jdbc_name())
    }
}

fn build_jdbc_type_map() -> HashMap<&'static str, JdbcType> {
    let mut map = HashMap::new();
    for ty in [
        JdbcType::Array,
        JdbcType::BigInt,
        JdbcType::Binary,
        JdbcType::Bit,
        JdbcType::Blob,
        JdbcType::Boolean,
        JdbcType::Char,
        JdbcType::Clob,
        JdbcType::Date,
        JdbcType::Decimal,
        JdbcType::Double,
        JdbcType::Float,
        JdbcType::Integer,
        JdbcType::LongVarchar,
        JdbcType::Null,
        JdbcType::Numeric,
        JdbcType::Other,
        JdbcType::Real,
        JdbcType::SmallInt,
        JdbcType::Time,
        JdbcType::Timestamp,
        JdbcType::TimestampWithTimezone,
        JdbcType::TinyInt,
        JdbcType::VarBinary,
        JdbcType::Varchar,
    ] {
        map.insert(ty.jdbc_name(), ty);
    }

    // Common aliases
    map.insert("INT", JdbcType::Integer);
    map.insert("VARCHAR2", JdbcType::Varchar);
    map.insert("TEXT", JdbcType::LongVarchar);
    map.insert("BOOL", JdbcType::Boolean);
    map.insert("TIMESTAMPTZ", JdbcType::TimestampWithTimezone);
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("varchar".parse::<JdbcType>(), Ok(JdbcType::Varchar));
        assert_eq!("int".parse::<JdbcType>(), Ok(JdbcType::Integer));
        assert_eq!(
            "timestamp with timezone".parse::<JdbcType>(),
            Ok(JdbcType::TimestampWithTimezone)
        );
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            "geometry".parse::<JdbcType>(),
            Err(JdbcTypeError::Unknown("geometry".to_string()))
        );
    }

    #[test]
    fn displays_canonical_name() {
        assert_eq!(JdbcType::BigInt.to_string(), "BIGINT");
        assert!(JdbcType::Clob.is_textual());
        assert!(!JdbcType::Integer.is_textual());
    }
}
