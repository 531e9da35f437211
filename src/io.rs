//! Flat point files: one `x,y[,cluster]` record per line.
//!
//! Import is forgiving: a header row is optional, rows with fewer than two
//! fields or with non-numeric coordinates are skipped without error, and a
//! leading UTF-8 byte-order mark is ignored. Export always writes the header
//! `x,y,cluster`, leaving the cluster empty for unassigned samples and writing
//! `-1` for noise.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use serde::Serialize;
use tracing::debug;

use crate::cluster::{Label, Sample};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExportRecord {
    x: f64,
    y: f64,
    cluster: Option<i64>,
}

fn field_str(record: &ByteRecord, idx: usize) -> Option<&str> {
    let raw = std::str::from_utf8(record.get(idx)?).ok()?;
    Some(raw.trim_start_matches('\u{feff}').trim())
}

fn parse_coordinate(record: &ByteRecord, idx: usize) -> Option<f64> {
    field_str(record, idx)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_label(record: &ByteRecord) -> Label {
    let value = field_str(record, 2).and_then(|s| s.parse::<i64>().ok());
    Label::from_i64(value)
}

fn read_rows<R: Read>(reader: R) -> Result<Vec<(f64, f64, Label)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.byte_records() {
        let record = record?;
        match (parse_coordinate(&record, 0), parse_coordinate(&record, 1)) {
            (Some(x), Some(y)) => rows.push((x, y, parse_label(&record))),
            _ => skipped += 1,
        }
    }
    debug!(rows = rows.len(), skipped, "read point records");
    Ok(rows)
}

/// Read `(x, y)` pairs; extra columns are ignored.
pub fn read_xy<R: Read>(reader: R) -> Result<Vec<(f64, f64)>> {
    Ok(read_rows(reader)?
        .into_iter()
        .map(|(x, y, _)| (x, y))
        .collect())
}

/// Read samples, taking an optional integer third column as the label.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<Sample>> {
    Ok(read_rows(reader)?
        .into_iter()
        .map(|(x, y, label)| {
            let mut sample = Sample::new(x, y);
            sample.label = label;
            sample
        })
        .collect())
}

pub fn read_xy_path<P: AsRef<Path>>(path: P) -> Result<Vec<(f64, f64)>> {
    read_xy(File::open(path)?)
}

pub fn read_samples_path<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    read_samples(File::open(path)?)
}

/// Fresh, unlabeled samples from coordinate pairs.
pub fn samples_from_xy(xy: &[(f64, f64)]) -> Vec<Sample> {
    xy.iter().copied().map(Sample::from).collect()
}

/// Write `x,y,cluster` records, header first.
pub fn write_samples<W: Write>(writer: W, samples: &[Sample]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["x", "y", "cluster"])?;
    for sample in samples {
        wtr.serialize(ExportRecord {
            x: sample.x,
            y: sample.y,
            cluster: sample.label.to_i64(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_samples_path<P: AsRef<Path>>(path: P, samples: &[Sample]) -> Result<()> {
    write_samples(File::create(path)?, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_junk_rows_are_skipped() {
        let input = "\u{feff}x,y\n1.5,2\nfoo,3\n4\n\n 5 , 6 ,extra\nnan,1\n-7e1,8\n";

        let xy = read_xy(input.as_bytes()).unwrap();

        assert_eq!(xy, vec![(1.5, 2.0), (5.0, 6.0), (-70.0, 8.0)]);
    }

    #[test]
    fn bom_on_first_data_row() {
        let input = "\u{feff}10,20\n30,40\n";
        let xy = read_xy(input.as_bytes()).unwrap();
        assert_eq!(xy, vec![(10.0, 20.0), (30.0, 40.0)]);
    }

    #[test]
    fn export_then_import_keeps_labels() {
        let mut samples = samples_from_xy(&[(1.0, 2.0), (3.5, -4.0), (0.0, 0.0)]);
        samples[0].label = Label::Cluster(2);
        samples[1].label = Label::Noise;

        let mut buf = Vec::new();
        write_samples(&mut buf, &samples).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y,cluster"));
        assert_eq!(lines.next(), Some("1.0,2.0,2"));
        assert_eq!(lines.next(), Some("3.5,-4.0,-1"));
        assert_eq!(lines.next(), Some("0.0,0.0,"));

        let back = read_samples(buf.as_slice()).unwrap();
        assert_eq!(back, samples);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_xy_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
