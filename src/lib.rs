pub mod adapter;
pub mod col;
pub mod command;
pub mod conn_str;
pub mod constant;
pub mod error;
pub mod keyword;
mod opts;
pub mod property;
pub mod script;
pub mod trace;
pub mod value;

pub use opts::Opts;

#[cfg(test)]
mod conn_str_test;
#[cfg(test)]
mod opts_test;
