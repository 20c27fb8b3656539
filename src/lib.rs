pub mod backend;
pub mod bench;
pub mod conf;
pub mod core;
pub mod report;
pub mod workload;

#[cfg(feature = "testutil")]
pub mod testutil;
