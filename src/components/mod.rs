pub mod alert;
pub mod dashboard;
pub mod trip;
