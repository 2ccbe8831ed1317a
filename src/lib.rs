// ABOUTME: Library root for devconf - typed decoding of devcontainer documents.
// ABOUTME: The command-line front end is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feature;
