pub mod case_library;
pub mod journal_service;
pub mod risk_service;
pub mod sizing_service;
pub mod stats_service;
pub mod wizard_service;
