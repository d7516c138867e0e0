pub mod jdbc_type;
pub mod value;
