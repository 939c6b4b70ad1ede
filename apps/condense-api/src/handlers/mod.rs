//! Request handlers

pub mod summaries;
