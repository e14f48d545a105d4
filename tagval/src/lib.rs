pub mod class;
pub mod data;
pub mod data_type;
pub mod dictionary;
pub mod error;
pub mod runtime_value;
