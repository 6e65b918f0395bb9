#![allow(dead_code, unused_imports)]

pub mod registry;
pub mod toolchain;

pub use registry::{FakeTagSource, create_test_catalog};
pub use toolchain::{ArchiveFetcher, FailingFetcher, create_test_app, create_test_store};
