// Admin tooling for member records.

pub mod email;
pub mod handlers;
