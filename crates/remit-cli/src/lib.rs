//! Library surface of the remit CLI: logging initialization.

pub mod logging;
