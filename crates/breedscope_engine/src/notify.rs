use breedscope_core::{Notifier, Severity};
use engine_logging::{engine_error, engine_info, engine_warn};

/// Routes user notifications into the log. Toast presentation is the UI's job.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => engine_info!("[notice] {}", message),
            Severity::Warning => engine_warn!("[notice] {}", message),
            Severity::Error => engine_error!("[notice] {}", message),
        }
    }
}
