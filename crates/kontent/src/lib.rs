pub mod cli;
mod log;
