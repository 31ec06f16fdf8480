pub mod cli;
pub mod windows;
