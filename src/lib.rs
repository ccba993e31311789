//! Personal finance ledger: records income and expense transactions, tracks
//! monthly budgets per category and reports totals, category breakdowns and
//! monthly trends.

pub mod app;
pub mod common;
pub mod domain;
pub mod io;
pub mod worker;
