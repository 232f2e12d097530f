//! Webhook Lambda: request handling and answer-phase scheduling

pub mod handler;
pub mod helpers;
pub mod invoke;
pub mod parsing;
pub mod signature;

// Re-export the main types for convenience
pub use handler::{Dispatcher, function_handler as handler};
pub use invoke::{AnswerInvoker, LambdaInvoker, SqsInvoker};
