pub mod budget;
pub mod ledger;
pub mod report;
pub mod transaction;
