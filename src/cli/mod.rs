pub mod query;
pub mod run;
pub mod setup;
pub mod ui;
