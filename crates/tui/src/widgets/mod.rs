//! TUI widgets.

pub mod agent_board;
pub mod history_table;
pub mod report_view;
pub mod scroll;

pub use scroll::ScrollView;
