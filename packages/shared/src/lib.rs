//! Utilities shared by the Duet server and client.

pub mod logger;
pub mod time;
