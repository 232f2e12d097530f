//! Worker Lambda: runs the answer phase

pub mod handler;

// Re-export the main handler for convenience
pub use handler::{answer_payloads, function_handler as handler};
