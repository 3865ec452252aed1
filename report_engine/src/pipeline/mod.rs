//! Run orchestration
//!
//! Drives one batch run end to end: locate the configuration, discover
//! source tables and artifacts, assemble data objects per dataset, write
//! the report document and copy everything to the staging area.

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::artifact::ArtifactMatcher;
use crate::assemble::{metadata, DatasetAssembler};
use crate::config::constants::{layout, CONFIG_FILE_NAME, LIMIT_FILE_NAME};
use crate::config::settings::{ConfigError, Settings};
use crate::limits::LimitTable;
use crate::logging::codes;
use crate::recipe::construct_recipe;
use crate::staging;
use crate::table::{read_datasets, DatasetSource, SourceMetadata, TableError, TabularSource};
use crate::writer::ReportDocumentWriter;
use crate::{log_info, log_success};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Process one raw data folder through the complete pipeline
/// (config -> discovery -> classify/assemble per dataset -> write -> stage)
pub fn process_run(input_path: &Path) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    log_info!("Starting report assembly run", "input" => input_path.display());

    let base = layout_base(input_path);
    let root = base.parent().unwrap_or(&base).to_path_buf();

    // Stage 1: configuration
    let config_path = locate_config(&root)?;
    let settings = Settings::load(&config_path)?;
    log_success!(codes::success::CONFIG_LOADED, "Configuration loaded",
        "config" => config_path.display());
    let limit_table = LimitTable::load(&config_path.with_file_name(LIMIT_FILE_NAME));

    // Stage 2: discovery and acquisition
    let found = staging::discover(input_path);
    if found.tables.is_empty() {
        return Err(TableError::NoSources {
            path: input_path.display().to_string(),
        }
        .into());
    }
    let datasets = read_datasets(&found.tables)?;
    let matcher = ArtifactMatcher::new(
        paths_as_strings(&found.pictures),
        paths_as_strings(&found.waveforms),
    );

    // Stage 3: per-dataset assembly
    let source_meta = source_metadata(&settings, &found.tables[0]);
    let common = metadata::common_meta_data(&source_meta);

    let mut all_objects = Vec::new();
    let mut limit_objects = 0;
    let mut value_objects = 0;
    let mut datasets_processed = 0;
    for (index, (dataset_id, table)) in datasets.datasets().into_iter().enumerate() {
        // tables and datasets are paired in discovery order; folder links
        // and the artifact folder token follow each dataset's own table
        let parent_folder = parent_folder_of(&found.tables[index]);
        let mut assembler = DatasetAssembler::new(
            &dataset_id,
            &source_meta,
            &common,
            &limit_table,
            &matcher,
            &parent_folder,
        );
        for row in 0..table.rows() {
            assembler.process_row(table, row)?;
        }
        let assembled = assembler.finish();
        log_success!(codes::success::DATASET_PROCESSED, "Dataset processed",
            "dataset" => dataset_id,
            "limits" => assembled.limit_count,
            "values" => assembled.value_count);
        limit_objects += assembled.limit_count;
        value_objects += assembled.value_count;
        datasets_processed += 1;
        all_objects.extend(assembled.objects);
    }

    // Stage 4: document serialization
    let out_folder = report_folder(&root);
    fs::create_dir_all(&out_folder).map_err(|e| PipelineError::io_error(&out_folder, e))?;
    let report_path = out_folder.join(format!("{}.json", settings.report_name));
    let recipe = construct_recipe(
        &settings.report_template,
        &settings.report_name,
        &settings.project,
    );
    let writer = ReportDocumentWriter::new();
    writer.write_to_file(&report_path, &common, &mut all_objects, &recipe)?;

    // Stage 5: best-effort staging
    let staging_area = staging::staging_folder(&settings.project);
    let files_staged = staging::copy_to_staging(&report_path, &found, &staging_area);
    if files_staged > 0 {
        log_success!(codes::success::STAGING_COMPLETED, "Artifacts staged",
            "staging_area" => staging_area.display(),
            "files" => files_staged);
    }

    let result = PipelineResult {
        report_path,
        datasets_processed,
        limit_objects,
        value_objects,
        files_staged,
        processing_duration: start_time.elapsed(),
    };
    result.log_success();
    Ok(result)
}

/// When invoked on a folder inside the raw data tree, derive locations
/// from the raw data folder itself rather than the selected subfolder
fn layout_base(input: &Path) -> PathBuf {
    let mut base = input.to_path_buf();
    if base
        .components()
        .any(|c| c.as_os_str() == layout::RAW_DATA_FOLDER)
    {
        while base
            .file_name()
            .map(|name| name != layout::RAW_DATA_FOLDER)
            .unwrap_or(false)
        {
            if !base.pop() {
                break;
            }
        }
    }
    base
}

/// Find the configuration file under the test flow folder next to the
/// raw data folder
fn locate_config(root: &Path) -> Result<PathBuf, ConfigError> {
    let test_flow = root.join(layout::TEST_FLOW_FOLDER);
    staging::find_files(&test_flow, CONFIG_FILE_NAME)
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::NotFound {
            path: test_flow.join(CONFIG_FILE_NAME).display().to_string(),
        })
}

/// Timestamped output folder for this run
fn report_folder(root: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%dT%H%M%S").to_string();
    root.join(layout::REPORT_FOLDER).join(stamp)
}

/// Scalar metadata for this run. The CSV export layout carries no embedded
/// identity block, so operator and product identity come from the
/// configuration; the test program name is the folder holding the tables.
fn source_metadata(settings: &Settings, first_table: &Path) -> SourceMetadata {
    let test_program_name = first_table
        .parent()
        .and_then(|folder| folder.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    SourceMetadata {
        username: settings.username.clone(),
        email: settings.email.clone(),
        api_id: settings.api_id_perl.clone(),
        test_program_name,
        testunit_version: "1".to_string(),
        basic_type: settings.extra.get("basic_type").cloned().unwrap_or_default(),
        product_sales_code: settings
            .extra
            .get("product_sales_code")
            .cloned()
            .unwrap_or_default(),
        product_design_step: settings
            .extra
            .get("product_design_step")
            .cloned()
            .unwrap_or_default(),
        package: settings.extra.get("package").cloned().unwrap_or_default(),
        dut_id: settings.extra.get("dut_id").cloned().unwrap_or_default(),
        global_id: settings.extra.get("global_id").cloned().unwrap_or_default(),
        sw_names: Vec::new(),
    }
}

fn parent_folder_of(table: &Path) -> String {
    match table.parent() {
        Some(folder) => format!("{}/", folder.display()),
        None => String::new(),
    }
}

fn paths_as_strings(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
