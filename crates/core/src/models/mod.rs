pub mod analytics;
pub mod case_study;
pub mod review;
pub mod settings;
pub mod trade;
