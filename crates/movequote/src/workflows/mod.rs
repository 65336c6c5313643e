pub mod leads;
pub mod prompt;
pub mod quote;
pub mod wizard;
