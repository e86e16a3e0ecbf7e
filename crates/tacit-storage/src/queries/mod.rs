pub mod unit_crud;
pub mod unit_query;
pub mod usage;
pub mod vector_ops;
