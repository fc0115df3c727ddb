pub mod form_data;
pub mod metric;
pub mod query;
