//! Global logging module for the report engine
//!
//! Provides a process-wide logging service, data-quality diagnostics
//! collection with an end-of-run summary, and a clean macro interface.

pub mod codes;
pub mod collector;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use collector::{DiagnosticsCollector, DiagnosticsSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_DIAGNOSTICS: OnceLock<Arc<DiagnosticsCollector>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(LoggingService::console());
    let diagnostics = Arc::new(DiagnosticsCollector::new());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_DIAGNOSTICS
        .set(diagnostics)
        .map_err(|_| "Global diagnostics collector already initialized")?;

    // Validate the code metadata table
    let test_codes = ["ERR001", "E005", "E030", "W041"];
    for &code in &test_codes {
        if codes::get_description(code) == "Unknown code" {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    let event = events::LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );
    logging_service.log_event(event);

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    let diagnostics = Arc::new(DiagnosticsCollector::new());

    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_DIAGNOSTICS
        .set(diagnostics)
        .map_err(|_| "Global diagnostics collector already initialized")?;

    Ok(())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_DIAGNOSTICS.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Safe access to global diagnostics collector
pub fn try_get_global_diagnostics() -> Option<&'static DiagnosticsCollector> {
    GLOBAL_DIAGNOSTICS.get().map(|collector| collector.as_ref())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::error(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log warning with context (used by log_warning! macro); warnings carrying a
/// "dataset" context key are also recorded in the diagnostics collector
pub fn log_warning_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::warning_with_code(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(dataset_id) = event.context.get("dataset").cloned() {
        if let Some(collector) = try_get_global_diagnostics() {
            collector.record(&dataset_id, event.clone());
        }
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

/// Get the diagnostics summary for the current run
pub fn get_diagnostics_summary() -> DiagnosticsSummary {
    try_get_global_diagnostics()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

/// Print the data-quality summary collected during the run
pub fn print_diagnostics_summary() {
    if let Some(diagnostics) = try_get_global_diagnostics() {
        println!("{}", collector::format_summary(diagnostics));
    }
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}
