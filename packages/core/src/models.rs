//! Domain records built from raw listing payloads.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MagangError, Result};
use crate::json::{as_i64, as_id, object_field, str_field};
use crate::probability::acceptance_probability;

/// One advertised internship position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub position_id: String,
    pub position_title: String,
    pub quota: i64,
    pub registered_count: i64,
    pub company_name: String,
    /// Province.
    pub region: String,
    /// Regency or city.
    pub district: String,
    pub program_fields: BTreeSet<String>,
    pub registration_deadline: Option<NaiveDate>,
    pub acceptance_probability: f64,
}

impl ListingRecord {
    /// Minimal record; the remaining attributes start empty.
    pub fn new(
        position_id: impl Into<String>,
        position_title: impl Into<String>,
        quota: i64,
        registered_count: i64,
    ) -> Self {
        Self {
            position_id: position_id.into(),
            position_title: position_title.into(),
            quota,
            registered_count,
            company_name: String::new(),
            region: String::new(),
            district: String::new(),
            program_fields: BTreeSet::new(),
            registration_deadline: None,
            acceptance_probability: acceptance_probability(quota, registered_count),
        }
    }

    /// Build a record from one item of the vacancy listing.
    ///
    /// `program_studi` arrives as a JSON-encoded string holding
    /// `[{"title": ...}, ...]`; a bare array is accepted as well.
    pub fn from_vacancy(item: &Value) -> Result<Self> {
        let position_id = item
            .get("id_posisi")
            .and_then(as_id)
            .ok_or_else(|| MagangError::MalformedResponse("vacancy without id_posisi".into()))?;

        let quota = item.get("jumlah_kuota").and_then(as_i64).unwrap_or(0).max(0);
        let registered_count = item
            .get("jumlah_terdaftar")
            .and_then(as_i64)
            .unwrap_or(0)
            .max(0);

        let company = object_field(item, "perusahaan");
        let schedule = object_field(item, "jadwal");

        let mut record = Self::new(
            position_id,
            str_field(item, "posisi").unwrap_or_default(),
            quota,
            registered_count,
        );
        record.company_name = str_field(company, "nama_perusahaan")
            .unwrap_or_default()
            .to_string();
        record.district = str_field(company, "nama_kabupaten")
            .unwrap_or_default()
            .to_string();
        record.region = str_field(company, "nama_provinsi")
            .unwrap_or_default()
            .to_string();
        record.program_fields = parse_program_fields(item.get("program_studi"))?;
        record.registration_deadline = str_field(schedule, "tanggal_pendaftaran_akhir")
            .and_then(parse_api_date)
            .map(|dt| dt.date());

        Ok(record)
    }

    /// Overlay live counters, keeping snapshot values where the live ones are
    /// missing, and recompute the probability.
    #[must_use]
    pub fn with_counters(mut self, counters: &LiveCounters) -> Self {
        if let Some(quota) = counters.quota {
            self.quota = quota.max(0);
        }
        if let Some(registered) = counters.registered_count {
            self.registered_count = registered.max(0);
        }
        self.refresh_probability()
    }

    #[must_use]
    pub fn refresh_probability(mut self) -> Self {
        self.acceptance_probability = acceptance_probability(self.quota, self.registered_count);
        self
    }

    /// Program fields joined the way the snapshot file stores them.
    pub fn program_fields_joined(&self) -> String {
        self.program_fields
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn parse_program_fields(raw: Option<&Value>) -> Result<BTreeSet<String>> {
    let parsed;
    let entries = match raw {
        None | Some(Value::Null) => return Ok(BTreeSet::new()),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(BTreeSet::new()),
        Some(Value::String(s)) => {
            parsed = serde_json::from_str::<Value>(s).map_err(|e| {
                MagangError::MalformedResponse(format!("program_studi is not valid JSON: {e}"))
            })?;
            &parsed
        }
        Some(other) => other,
    };

    let items = entries
        .as_array()
        .ok_or_else(|| MagangError::MalformedResponse("program_studi is not a list".into()))?;

    Ok(items
        .iter()
        .filter_map(|p| str_field(p, "title"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect())
}

/// Fresh counters for one position from the detail lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiveCounters {
    pub quota: Option<i64>,
    pub registered_count: Option<i64>,
}

impl LiveCounters {
    pub fn from_detail(item: &Value) -> Self {
        Self {
            quota: item.get("jumlah_kuota").and_then(as_i64),
            registered_count: item.get("jumlah_terdaftar").and_then(as_i64),
        }
    }
}

/// Outcome of one application, as encoded by `ref_status_seleksi.id_status_seleksi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Accepted,
    AcceptedElsewhere,
    /// Pending, rejected or anything else; not counted separately.
    Other(i64),
}

impl SelectionStatus {
    pub const ACCEPTED_CODE: i64 = 2;
    pub const ACCEPTED_ELSEWHERE_CODE: i64 = 4;

    pub fn from_code(code: i64) -> Self {
        match code {
            Self::ACCEPTED_CODE => Self::Accepted,
            Self::ACCEPTED_ELSEWHERE_CODE => Self::AcceptedElsewhere,
            other => Self::Other(other),
        }
    }

    /// Status of one roster participant; `None` when the code is absent.
    pub fn of_participant(participant: &Value) -> Option<Self> {
        object_field(participant, "ref_status_seleksi")
            .get("id_status_seleksi")
            .and_then(as_i64)
            .map(Self::from_code)
    }
}

/// One person's application to one position, with roster statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStatusRow {
    pub position_id: Option<String>,
    pub position_title: String,
    pub company_name: String,
    pub company_address: String,
    pub application_date: Option<NaiveDateTime>,
    pub selection_status_label: String,
    pub accepted_count: usize,
    pub total_applicants: u64,
    pub accepted_elsewhere_count: usize,
}

/// Parse the date formats the API uses (RFC 3339, `YYYY-MM-DD HH:MM:SS`,
/// plain `YYYY-MM-DD`).
pub fn parse_api_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
