//! Report document serialization
//!
//! Writes the final JSON artifact: header, common metadata, the data
//! object array and the trailing recipe object. The object buffer is
//! consumed destructively from the back and the output is flushed to the
//! sink every fixed number of objects to bound peak memory on large runs.

use crate::assemble::DataObject;
use crate::config::constants::{HEADER_VERSION, WRITER_CHUNK_SIZE};
use crate::limits::trim_number;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serialization errors, fatal for the run
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("Failed to write report document: {path}: {message}")]
    Io { path: String, message: String },
}

/// Streaming JSON writer for the report document
pub struct ReportDocumentWriter {
    chunk_size: usize,
    show_progress: bool,
}

impl Default for ReportDocumentWriter {
    fn default() -> Self {
        Self {
            chunk_size: WRITER_CHUNK_SIZE,
            show_progress: true,
        }
    }
}

impl ReportDocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer without progress output, used by tests
    pub fn quiet() -> Self {
        Self {
            chunk_size: WRITER_CHUNK_SIZE,
            show_progress: false,
        }
    }

    /// Serialize the whole document to `path`. The object buffer is
    /// drained; it is empty on return.
    pub fn write_to_file(
        &self,
        path: &Path,
        common_meta_data: &BTreeMap<String, String>,
        data_objects: &mut Vec<DataObject>,
        recipe: &str,
    ) -> Result<(), WriterError> {
        let as_writer_error = |e: io::Error| WriterError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let file = File::create(path).map_err(as_writer_error)?;
        let mut sink = BufWriter::new(file);
        self.write_document(&mut sink, common_meta_data, data_objects, recipe)
            .map_err(as_writer_error)?;
        sink.flush().map_err(as_writer_error)
    }

    /// Serialize the whole document to any sink
    pub fn write_document(
        &self,
        sink: &mut dyn Write,
        common_meta_data: &BTreeMap<String, String>,
        data_objects: &mut Vec<DataObject>,
        recipe: &str,
    ) -> io::Result<()> {
        let mut chunk = String::new();

        chunk.push_str("{\n");
        chunk.push_str(&format!(
            "\"header\":\n\t{{\n\t\t\"version\":\"{}\"\n\t}},\n",
            HEADER_VERSION
        ));

        chunk.push_str("\"commonMetaData\":\n\t{");
        let mut first = true;
        for (key, value) in common_meta_data {
            if !first {
                chunk.push(',');
            }
            first = false;
            chunk.push_str("\n\t\t");
            chunk.push_str(&render_meta_value(key, value));
        }
        chunk.push_str("\n\t},\n");

        sink.write_all(chunk.as_bytes())?;
        chunk.clear();

        chunk.push_str("\"dataObjects\":[");

        let total = data_objects.len();
        let progress_step = if total < 100 {
            1
        } else {
            (total + 99) / 100
        };
        let mut processed = 0usize;

        // the buffer is drained from the back, oldest object written last
        while let Some(object) = data_objects.pop() {
            chunk.push_str("\n\t{");
            chunk.push_str("\n\t\t\"metaData\":\n\t\t\t{");
            append_fields(&mut chunk, &object.meta_data);
            chunk.push_str("\n\t\t\t},");
            chunk.push_str("\n\t\t\"payload\":\n\t\t\t{");
            append_fields(&mut chunk, &object.payload);
            chunk.push_str("\n\t\t\t}");
            chunk.push_str("\n\t},");

            processed += 1;
            if processed % self.chunk_size == 0 {
                sink.write_all(chunk.as_bytes())?;
                chunk.clear();
            }
            if self.show_progress && processed % progress_step == 0 {
                print!("\r{}", progress_bar(processed, total, progress_step));
                let _ = io::stdout().flush();
            }
        }
        if self.show_progress && total > 0 {
            println!("\r{}", progress_bar(processed, total, progress_step));
        }

        // the recipe is the final array element
        chunk.push_str("\n\t{");
        chunk.push_str(
            "\n\t\t\"metaData\":\n\t\t\t{\n\t\t\t\t\"data_object_type\":\"recipe\"\n\t\t\t},",
        );
        chunk.push_str("\n\t\t\"payload\":\n\t\t\t{\n\t\t\t\t\"recipe\":");
        chunk.push_str(&escape_json(recipe));
        chunk.push_str("\n\t\t\t}");
        chunk.push_str("\n\t}");
        chunk.push_str("\n]");
        chunk.push_str("\n}");

        sink.write_all(chunk.as_bytes())
    }
}

/// One metadata entry. Numeric-looking values are written unquoted, except
/// the creation timestamp: large integer-like values must never round-trip
/// through a float and back, so it stays a quoted string.
fn render_meta_value(key: &str, value: &str) -> String {
    if key != "ts_data_created" {
        if let Ok(number) = value.parse::<f64>() {
            if number.is_finite() {
                return format!("{}:{}", escape_json(key), trim_number(&format!("{}", number)));
            }
        }
    }
    format!("{}:{}", escape_json(key), escape_json(value))
}

/// Fields of one metaData or payload block. Positional `___N` families
/// are coalesced: `comment___*` becomes a `comments` array and both
/// `png_filename___*` and `mat_filename___*` land in one `raw_data_link`
/// array, each emitted at the position of the family's first member.
fn append_fields(chunk: &mut String, fields: &BTreeMap<String, String>) {
    let mut first = true;
    let mut comments_written = false;
    let mut raw_data_link_written = false;
    let mut separate = |chunk: &mut String| {
        if !first {
            chunk.push(',');
        }
        first = false;
    };

    for (key, value) in fields {
        if key.starts_with("comment___") {
            if comments_written {
                continue;
            }
            comments_written = true;
            separate(chunk);
            chunk.push_str("\n\t\t\t\t\"comments\":[");
            let mut first_comment = true;
            for (member, comment) in fields {
                if !member.starts_with("comment___") {
                    continue;
                }
                if !first_comment {
                    chunk.push(',');
                }
                first_comment = false;
                chunk.push_str("\n\t\t\t\t\t");
                chunk.push_str(&escape_json(comment));
            }
            chunk.push_str("\n\t\t\t\t]");
        } else if key.starts_with("mat_filename___") || key.starts_with("png_filename___") {
            if raw_data_link_written {
                continue;
            }
            raw_data_link_written = true;
            separate(chunk);
            chunk.push_str("\n\t\t\t\t\"raw_data_link\":[");
            let mut first_link = true;
            for (member, filename) in fields {
                let link_type = if member.starts_with("mat_filename___") {
                    "MAT"
                } else if member.starts_with("png_filename___") {
                    "PNG"
                } else {
                    continue;
                };
                if !first_link {
                    chunk.push(',');
                }
                first_link = false;
                chunk.push_str("\n\t\t\t\t\t{");
                chunk.push_str(&format!("\n\t\t\t\t\t\t\"type\":\"{}\",", link_type));
                chunk.push_str(&format!(
                    "\n\t\t\t\t\t\t\"filename\":{}",
                    escape_json(filename)
                ));
                chunk.push_str("\n\t\t\t\t\t}");
            }
            chunk.push_str("\n\t\t\t\t]");
        } else {
            separate(chunk);
            chunk.push_str("\n\t\t\t\t");
            chunk.push_str(&escape_json(key));
            chunk.push(':');
            chunk.push_str(&escape_json(value));
        }
    }
}

/// Quote and escape a string for JSON output
fn escape_json(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Coarse textual progress bar, one tick per `step` objects
fn progress_bar(current: usize, total: usize, step: usize) -> String {
    let mut bar = String::from("|");
    let mut i = 0;
    while i < total {
        if i < current {
            bar.push('=');
        } else if i == current {
            bar.push('>');
        } else {
            bar.push('.');
        }
        i += step;
    }
    bar.push_str("| ");
    let percent = ((current as f64 / total.max(1) as f64) * 100.0).ceil() as u32;
    bar.push_str(&format!("{}%", percent));
    bar
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn write_to_string(
        common: &BTreeMap<String, String>,
        objects: &mut Vec<DataObject>,
        recipe: &str,
    ) -> String {
        let writer = ReportDocumentWriter::quiet();
        let mut sink = Vec::new();
        writer
            .write_document(&mut sink, common, objects, recipe)
            .unwrap();
        String::from_utf8(sink).unwrap()
    }

    fn meta(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_document_structure() {
        let common = meta(&[("basic_type", "S1234"), ("data_object_type_version", "1")]);
        let mut objects = vec![DataObject {
            meta_data: meta(&[("test_number", "1"), ("data_object_type", "value")]),
            payload: meta(&[("iq", "12.5")]),
        }];
        let output = write_to_string(&common, &mut objects, "<Recipe/>");
        assert!(objects.is_empty());

        let doc: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(doc["header"]["version"], "1.0.1");
        assert_eq!(doc["commonMetaData"]["basic_type"], "S1234");
        // numeric-looking metadata is written as a number
        assert_eq!(doc["commonMetaData"]["data_object_type_version"], 1.0);

        let array = doc["dataObjects"].as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["payload"]["iq"], "12.5");
        assert_eq!(array[1]["metaData"]["data_object_type"], "recipe");
        assert_eq!(array[1]["payload"]["recipe"], "<Recipe/>");
    }

    #[test]
    fn test_buffer_drained_from_the_back() {
        let common = meta(&[]);
        let mut objects = vec![
            DataObject {
                meta_data: meta(&[("order", "first")]),
                payload: meta(&[]),
            },
            DataObject {
                meta_data: meta(&[("order", "second")]),
                payload: meta(&[]),
            },
        ];
        let output = write_to_string(&common, &mut objects, "<r/>");
        let doc: Value = serde_json::from_str(&output).unwrap();
        let array = doc["dataObjects"].as_array().unwrap();
        assert_eq!(array[0]["metaData"]["order"], "second");
        assert_eq!(array[1]["metaData"]["order"], "first");
    }

    #[test]
    fn test_timestamp_stays_quoted() {
        let common = meta(&[("ts_data_created", "20260830"), ("api_id", "20260830")]);
        let output = write_to_string(&common, &mut Vec::new(), "<r/>");
        let doc: Value = serde_json::from_str(&output).unwrap();
        // same digits, but only the timestamp keeps its string form
        assert_eq!(doc["commonMetaData"]["ts_data_created"], "20260830");
        assert_eq!(doc["commonMetaData"]["api_id"], 20260830.0);
    }

    #[test]
    fn test_object_fields_are_always_strings() {
        // precision rule: big integer test numbers must survive a round trip
        let mut objects = vec![DataObject {
            meta_data: meta(&[("test_number", "12345678")]),
            payload: meta(&[("iq", "0.0025")]),
        }];
        let output = write_to_string(&meta(&[]), &mut objects, "<r/>");
        let doc: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(doc["dataObjects"][0]["metaData"]["test_number"], "12345678");
    }

    #[test]
    fn test_positional_families_coalesce_into_arrays() {
        let mut objects = vec![DataObject {
            meta_data: meta(&[]),
            payload: meta(&[
                ("iq", "2"),
                ("png_filename___0", "a.png"),
                ("png_filename___1", "b.png"),
                ("mat_filename___0", "w.mat"),
                ("comment___0", "first note"),
                ("comment___1", "second note"),
            ]),
        }];
        let output = write_to_string(&meta(&[]), &mut objects, "<r/>");
        let doc: Value = serde_json::from_str(&output).unwrap();
        let payload = &doc["dataObjects"][0]["payload"];

        let comments = payload["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0], "first note");

        let links = payload["raw_data_link"].as_array().unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0]["type"], "MAT");
        assert_eq!(links[0]["filename"], "w.mat");
        assert_eq!(links[1]["type"], "PNG");
        assert_eq!(links[2]["filename"], "b.png");

        assert_eq!(payload["iq"], "2");
        assert!(payload.get("png_filename___0").is_none());
    }

    #[test]
    fn test_strings_are_escaped() {
        let mut objects = vec![DataObject {
            meta_data: meta(&[]),
            payload: meta(&[("note", "a \"quoted\" value\nwith a newline")]),
        }];
        let output = write_to_string(&meta(&[]), &mut objects, "<r/>");
        let doc: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            doc["dataObjects"][0]["payload"]["note"],
            "a \"quoted\" value\nwith a newline"
        );
    }

    #[test]
    fn test_round_trip_preserves_flat_pairs() {
        let original = DataObject {
            meta_data: meta(&[
                ("test_number", "98765432"),
                ("cond_VIO", "3.3"),
                ("subset_id", "ds_1"),
                ("data_object_type", "value"),
            ]),
            payload: meta(&[("iq", "0.0025")]),
        };
        let mut objects = vec![original.clone()];
        let output = write_to_string(&meta(&[]), &mut objects, "<r/>");

        let doc: Value = serde_json::from_str(&output).unwrap();
        let reparsed: DataObject =
            serde_json::from_value(doc["dataObjects"][0].clone()).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_progress_bar_shape() {
        assert_eq!(progress_bar(0, 4, 1), "|>...| 0%");
        assert_eq!(progress_bar(4, 4, 1), "|====| 100%");
    }
}
