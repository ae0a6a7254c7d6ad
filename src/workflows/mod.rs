pub mod orchestrator;
pub mod report;
