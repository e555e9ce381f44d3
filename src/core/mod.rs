// src/core/mod.rs
mod engine;
mod parser;
mod report;
mod rules;

// Text-level model and the pure qualification/filter stage
mod api_method;
mod eligibility;
mod qualifier;
mod source_unit;

// Language-specific scanners
mod languages;

pub use parser::{CodeParser, ParsedFile};
pub use report::{read_report, IndexEntry, ReportEmitter, ReportRecord};
pub use rules::{ExportSummary, RuleExporter};

// Export the main engine
pub use engine::Engine;
