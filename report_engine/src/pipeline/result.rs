use std::path::PathBuf;
use std::time::Duration;

/// Complete run result with the counts the summary reports
#[derive(Debug)]
pub struct PipelineResult {
    pub report_path: PathBuf,
    pub datasets_processed: usize,
    pub limit_objects: usize,
    pub value_objects: usize,
    pub files_staged: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn total_objects(&self) -> usize {
        self.limit_objects + self.value_objects
    }

    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::DOCUMENT_WRITTEN,
            "Report document written",
            "report" => self.report_path.display(),
            "datasets" => self.datasets_processed,
            "objects" => self.total_objects(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
