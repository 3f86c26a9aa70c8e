//! Logging utilities
//!
//! Standardized messages for long-running operations.

use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `target` - What the operation runs over, e.g. "120 subjects"
pub fn log_operation_start(operation: &str, target: &str) {
    log::info!("{operation} {target}");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense description of the operation
/// * `target` - What the operation ran over
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, target: &str, items: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} items from {target} in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} items from {target}");
    }
}

/// Log a warning, optionally tied to a subject or source
pub fn log_warning(message: &str, context: Option<&str>) {
    if let Some(context) = context {
        log::warn!("{message}: {context}");
    } else {
        log::warn!("{message}");
    }
}
