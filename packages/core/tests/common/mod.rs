#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maganghub_core::cache::TtlCache;
use maganghub_core::{Aggregator, ApiClient, ClientConfig, StatusLookup};

pub const TOKEN: &str = "test-token";
pub const PARTICIPANTS: &str = "/crud-program-participants";
pub const VACANCIES: &str = "/vacancies-aktif";

/// Config pointing at the mock server with short timeouts.
pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder(server.uri())
        .api_token(TOKEN)
        .timeout(Duration::from_secs(2))
        .lookup_timeout(Duration::from_millis(300))
        .build()
}

pub fn client(config: &ClientConfig) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(config).unwrap())
}

pub fn status_lookup(config: &ClientConfig) -> StatusLookup<ApiClient> {
    let aggregator = Aggregator::from_config(client(config), config);
    StatusLookup::new(aggregator, config, Arc::new(TtlCache::new(config.cache_ttl)))
}

/// Participant-shaped page: `meta.pagination.{total, per_page}`.
pub fn participant_page(records: Vec<Value>, total: u64, per_page: u64) -> Value {
    json!({
        "data": records,
        "meta": {"pagination": {"total": total, "per_page": per_page}}
    })
}

/// Vacancy-shaped page: `pagination.total_page`.
pub fn vacancy_page(records: Vec<Value>, total_pages: u64) -> Value {
    json!({
        "data": records,
        "pagination": {"total_page": total_pages, "limit": 20}
    })
}

pub fn roster_entry(status: i64) -> Value {
    json!({"ref_status_seleksi": {"id_status_seleksi": status}})
}

pub fn participation(position_id: &str, title: &str, applied_at: &str) -> Value {
    json!({
        "program_posisi": {"id_posisi": position_id, "posisi": title},
        "perusahaan": {"nama_perusahaan": format!("PT {title}"), "alamat": "Jl. Merdeka 1"},
        "jadwal": {"tanggal_pendaftaran_awal": applied_at},
        "ref_status_seleksi": {"id_status_seleksi": 1, "nama_status_seleksi": "Menunggu"}
    })
}

pub fn vacancy(id: &str, quota: i64, registered: i64) -> Value {
    json!({
        "id_posisi": id,
        "posisi": format!("Posisi {id}"),
        "jumlah_kuota": quota,
        "jumlah_terdaftar": registered,
        "program_studi": "[{\"title\":\"Informatika\"}]",
        "perusahaan": {
            "nama_perusahaan": "PT Contoh",
            "nama_kabupaten": "KOTA BANDUNG",
            "nama_provinsi": "JAWA BARAT"
        },
        "jadwal": {"tanggal_pendaftaran_akhir": "2025-12-01"}
    })
}

/// Serve a position's roster from `statuses`, split into pages of `per_page`.
pub async fn mount_roster(server: &MockServer, position_id: &str, statuses: &[i64], per_page: usize) {
    let total = statuses.len() as u64;
    let chunks: Vec<&[i64]> = if statuses.is_empty() {
        vec![statuses]
    } else {
        statuses.chunks(per_page).collect()
    };

    for (index, chunk) in chunks.into_iter().enumerate() {
        let records = chunk.iter().map(|s| roster_entry(*s)).collect();
        Mock::given(method("GET"))
            .and(path(PARTICIPANTS))
            .and(query_param("id_posisi", position_id))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(participant_page(records, total, per_page as u64)),
            )
            .mount(server)
            .await;
    }
}
