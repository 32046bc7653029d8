pub mod aggregation;
pub mod dataset_frame;
pub mod reading;
pub mod schema;
pub mod timezone;
