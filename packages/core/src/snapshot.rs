//! Snapshot CSV persistence.
//!
//! Column order is fixed: `id_posisi, posisi, jumlah_kuota, jumlah_terdaftar,
//! program_studi, nama_perusahaan, nama_kabupaten, nama_provinsi, Batas`.
//! Files are written as UTF-8 with a byte-order mark so spreadsheet tools keep
//! non-ASCII names intact.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{parse_api_date, ListingRecord};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRow {
    id_posisi: String,
    #[serde(default)]
    posisi: String,
    #[serde(default, deserialize_with = "lenient_count")]
    jumlah_kuota: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    jumlah_terdaftar: i64,
    #[serde(default)]
    program_studi: String,
    #[serde(default)]
    nama_perusahaan: String,
    #[serde(default)]
    nama_kabupaten: String,
    #[serde(default)]
    nama_provinsi: String,
    #[serde(rename = "Batas", default)]
    batas: String,
}

impl From<&ListingRecord> for SnapshotRow {
    fn from(record: &ListingRecord) -> Self {
        Self {
            id_posisi: record.position_id.clone(),
            posisi: record.position_title.clone(),
            jumlah_kuota: record.quota,
            jumlah_terdaftar: record.registered_count,
            program_studi: record.program_fields_joined(),
            nama_perusahaan: record.company_name.clone(),
            nama_kabupaten: record.district.clone(),
            nama_provinsi: record.region.clone(),
            batas: record
                .registration_deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

impl SnapshotRow {
    fn into_record(self) -> ListingRecord {
        let mut record = ListingRecord::new(
            self.id_posisi,
            self.posisi,
            self.jumlah_kuota.max(0),
            self.jumlah_terdaftar.max(0),
        );
        record.company_name = self.nama_perusahaan;
        record.district = self.nama_kabupaten;
        record.region = self.nama_provinsi;
        record.program_fields = self
            .program_studi
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        record.registration_deadline = parse_api_date(&self.batas).map(|dt| dt.date());
        record
    }
}

/// Counters may be written as `12`, `12.0` or left empty.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .or_else(|_| raw.parse::<f64>().map(|f| f as i64))
        .map_err(serde::de::Error::custom)
}

/// Write records to any writer, BOM first.
pub fn write_records<W: Write>(mut writer: W, records: &[ListingRecord]) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(SnapshotRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read records from any reader. A leading BOM is skipped; rows without an
/// `id_posisi` are dropped with a warning.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<ListingRecord>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<SnapshotRow>() {
        let row = row?;
        if row.id_posisi.is_empty() {
            warn!("snapshot row without id_posisi, skipping");
            continue;
        }
        records.push(row.into_record());
    }
    Ok(records)
}

pub fn write_snapshot(path: &Path, records: &[ListingRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    write_records(file, records)?;
    info!(path = %path.display(), rows = records.len(), "snapshot written");
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<ListingRecord>> {
    let records = read_records(File::open(path)?)?;
    info!(path = %path.display(), rows = records.len(), "snapshot loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample() -> ListingRecord {
        let mut record = ListingRecord::new("1f2e", "Staf Administrasi", 4, 10);
        record.company_name = "PT Maju Jaya".into();
        record.district = "KOTA BANDUNG".into();
        record.region = "JAWA BARAT".into();
        record.program_fields = ["Akuntansi", "Manajemen"].iter().map(|s| s.to_string()).collect();
        record.registration_deadline = NaiveDate::from_ymd_opt(2025, 11, 30);
        record
    }

    #[test]
    fn test_header_order_and_bom() {
        let mut out = Vec::new();
        write_records(&mut out, &[sample()]).unwrap();

        assert!(out.starts_with(UTF8_BOM));
        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "id_posisi,posisi,jumlah_kuota,jumlah_terdaftar,program_studi,nama_perusahaan,nama_kabupaten,nama_provinsi,Batas"
        );
        assert!(text.contains("\"Akuntansi, Manajemen\""));
        assert!(text.contains("2025-11-30"));
    }

    #[test]
    fn test_read_back_recomputes_probability() {
        let mut out = Vec::new();
        write_records(&mut out, &[sample()]).unwrap();

        let records = read_records(out.as_slice()).unwrap();
        assert_eq!(records, vec![sample()]);
        assert_eq!(records[0].acceptance_probability, 0.4);
    }

    #[test]
    fn test_read_tolerates_float_counters_and_empty_cells() {
        let csv = "id_posisi,posisi,jumlah_kuota,jumlah_terdaftar,program_studi,nama_perusahaan,nama_kabupaten,nama_provinsi,Batas\n\
                   a,Kasir,2.0,,,,,,2025-10-01 23:59:00\n\
                   ,Tanpa Id,1,1,,,,,\n";

        let records = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quota, 2);
        assert_eq!(records[0].registered_count, 0);
        assert_eq!(records[0].acceptance_probability, 1.0);
        assert!(records[0].program_fields.is_empty());
        assert_eq!(records[0].registration_deadline, NaiveDate::from_ymd_opt(2025, 10, 1));
    }

    #[test]
    fn test_file_round_trip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("posisi.csv");

        write_snapshot(&path, &[sample()]).unwrap();
        let records = read_snapshot(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position_id, "1f2e");
    }
}
