//! CLI subcommands other than the server

pub mod list;
