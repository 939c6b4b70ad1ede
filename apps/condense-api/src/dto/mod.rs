//! Request and response bodies

pub mod summaries;
