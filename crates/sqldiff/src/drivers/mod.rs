//! Row source implementations.
//!
//! - [`mysql`]: streams an ordered SELECT from MySQL/MariaDB
//! - [`memory`]: serves rows held in memory

pub mod memory;
pub mod mysql;

pub use memory::MemoryRowSource;
pub use mysql::MysqlRowSource;
