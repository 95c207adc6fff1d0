//! CLI command implementations

mod check;
mod shell;

pub use check::check;
pub use shell::shell;
