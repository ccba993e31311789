pub mod json;
pub mod reader;
pub mod writer;
