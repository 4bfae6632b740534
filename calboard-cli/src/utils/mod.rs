pub mod args;
pub mod when;
