//! JSON report output

use super::Summary;
use crate::loader::LoadResult;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct Report<'a> {
    summary: Summary,
    files: &'a [LoadResult],
}

pub fn write<W: Write>(writer: &mut W, results: &[LoadResult]) -> io::Result<()> {
    let report = Report {
        summary: Summary::from_results(results),
        files: results,
    };

    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}
