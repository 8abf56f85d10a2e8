//! AST visitor implementations
//!
//! Read-only visitors used to gather facts about a parsed module.

mod export_collector;

pub use export_collector::ExportCollector;
