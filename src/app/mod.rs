pub mod chart;
pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;
