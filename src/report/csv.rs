//! CSV report output

use crate::loader::LoadResult;
use std::io::{self, Write};

const HEADER: &str = "file_path,file_name,duration,bitrate,frequency,layer,version,error";

pub fn write<W: Write>(writer: &mut W, results: &[LoadResult]) -> io::Result<()> {
    writeln!(writer, "{}", HEADER)?;

    for r in results {
        match r.metadata {
            Some(ref m) => writeln!(
                writer,
                "{},{},{:.3},{},{},{},{},",
                escape(&r.file_path),
                escape(&r.file_name),
                m.duration,
                m.bitrate,
                m.frequency,
                escape(&m.layer),
                escape(&m.version),
            )?,
            None => writeln!(
                writer,
                "{},{},,,,,,{}",
                escape(&r.file_path),
                escape(&r.file_name),
                escape(r.error.as_deref().unwrap_or("")),
            )?,
        }
    }

    Ok(())
}

/// Quote a field if it contains a separator, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
