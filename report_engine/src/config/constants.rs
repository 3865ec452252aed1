//! Fixed engine constants
//!
//! Values the downstream reporting tool depends on; changing any of these
//! changes the produced document schema.

/// Report document schema version written into the header block
pub const HEADER_VERSION: &str = "1.0.1";

/// Number of data objects serialized between sink flushes
pub const WRITER_CHUNK_SIZE: usize = 100;

/// Header row markers, matched case-sensitively against the first text cell
pub mod markers {
    pub const FIELD: &str = "#FIELD";
    pub const NAME: &str = "#name";
    pub const UNIT: &str = "#unit";
    pub const UPPER_LIMIT: &str = "#usl";
    pub const LOWER_LIMIT: &str = "#lsl";
}

/// Column role tags found in the field header row
pub mod fields {
    pub const CONDITION: &str = "cond";
    pub const OUTPUT: &str = "out";
    pub const AUXILIARY: &str = "aux";
    pub const COMMENT: &str = "comment";
}

/// Reserved column names excluded from payload/comment collection
pub mod reserved {
    pub const INDEX: &str = "idx";
    pub const PICTURE_PATH: &str = "picture_path";
    pub const WAVEFORM_PATH: &str = "wfm_path";
}

/// Artifact file-name markers used during matching and staging
pub mod artifacts {
    pub const PICTURE_MARKER: &str = "Report-Picture";
    pub const WAVEFORM_MARKER: &str = "Report-waveform";
}

/// Configuration file name searched for under the test flow folder
pub const CONFIG_FILE_NAME: &str = "Config_Tembo.txt";

/// Optional external limit table next to the configuration file
pub const LIMIT_FILE_NAME: &str = "testlimits.txt";

/// Folder names of the project layout surrounding the raw data
pub mod layout {
    pub const TEST_FLOW_FOLDER: &str = "20_TestFlow";
    pub const RAW_DATA_FOLDER: &str = "30_RawData";
    pub const REPORT_FOLDER: &str = "50_Report";
    pub const WAVEFORM_FOLDER_HINT: &str = "waveform";
}

/// Root of the network staging area; the project name and a trailing
/// "job" segment are appended per run
pub const STAGING_ROOT: &str = "//VIHSDV002.infineon.com/tembo_staging_prod";

/// Defaults applied when the configuration file omits a key
pub mod defaults {
    pub const PROJECT: &str = "psn-general";
    pub const REPORT_TEMPLATE: &str = "48292680-1751-43d9-beb3-e511e156641e";
    pub const REPORT_NAME: &str = "Simple Report";
    pub const EMAIL: &str = "Jin.Xing@infineon.com";
}
