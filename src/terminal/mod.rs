//! Interactive command shell

pub mod command;
pub mod shell;

pub use shell::Shell;
