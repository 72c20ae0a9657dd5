//! Console shell for the armory acquisition client.
pub mod console;
