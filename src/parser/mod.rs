//! Parser layer
//! - go_mod.rs: go.mod reader for the declared go version

pub mod go_mod;

pub use go_mod::{GO_MOD_FILE, GoMod};
