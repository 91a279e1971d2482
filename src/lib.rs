pub mod analytics;
pub mod clock;
pub mod output;
pub mod parser;
pub mod records;
