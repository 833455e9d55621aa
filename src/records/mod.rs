pub mod commands;
pub mod dashboard;
pub mod detail;

pub use dashboard::{DashboardView, HazardCounts, RecordCard};
pub use detail::{RecordDetail, ResultView};
