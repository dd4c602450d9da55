mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maganghub_core::MagangError;

use common::{config, mount_roster, participation, status_lookup, PARTICIPANTS};

async fn mount_participations(server: &MockServer, email: &str, rows: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(PARTICIPANTS))
        .and(query_param("email", email))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": rows })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_roster_counts_for_one_application() {
    let server = MockServer::start().await;
    mount_participations(
        &server,
        "budi@example.com",
        vec![participation("p-1", "Analis Data", "2025-10-02 08:00:00")],
    )
    .await;
    mount_roster(&server, "p-1", &[1, 2, 1, 2, 4, 1, 2, 1, 3, 1], 20).await;

    let report = status_lookup(&config(&server))
        .lookup_status("budi@example.com")
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.position_id.as_deref(), Some("p-1"));
    assert_eq!(row.position_title, "Analis Data");
    assert_eq!(row.company_name, "PT Analis Data");
    assert_eq!(row.selection_status_label, "Menunggu");
    assert_eq!(row.accepted_count, 3);
    assert_eq!(row.accepted_elsewhere_count, 1);
    assert_eq!(row.total_applicants, 10);
    assert!(report.sorted_by_date);
    assert_eq!(report.failed_roster_pages, 0);
}

#[tokio::test]
async fn test_rows_sorted_newest_first() {
    let server = MockServer::start().await;
    mount_participations(
        &server,
        "sari@example.com",
        vec![
            participation("p-old", "Old", "2025-09-01"),
            participation("p-new", "New", "2025-10-15T09:30:00Z"),
        ],
    )
    .await;
    mount_roster(&server, "p-old", &[2], 20).await;
    mount_roster(&server, "p-new", &[1, 1], 20).await;

    let report = status_lookup(&config(&server))
        .lookup_status("sari@example.com")
        .await
        .unwrap();

    let titles: Vec<_> = report.rows.iter().map(|r| r.position_title.as_str()).collect();
    assert_eq!(titles, vec!["New", "Old"]);
    assert_eq!(report.rows[1].accepted_count, 1);
}

#[tokio::test]
async fn test_unparseable_date_keeps_lookup_order() {
    let server = MockServer::start().await;
    mount_participations(
        &server,
        "ani@example.com",
        vec![
            participation("p-1", "First", "kemarin"),
            participation("p-2", "Second", "2025-10-15"),
        ],
    )
    .await;
    mount_roster(&server, "p-1", &[], 20).await;
    mount_roster(&server, "p-2", &[], 20).await;

    let report = status_lookup(&config(&server))
        .lookup_status("ani@example.com")
        .await
        .unwrap();

    assert!(!report.sorted_by_date);
    let titles: Vec<_> = report.rows.iter().map(|r| r.position_title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(report.rows[0].total_applicants, 0);
}

#[tokio::test]
async fn test_shared_position_roster_fetched_once() {
    let server = MockServer::start().await;
    mount_participations(
        &server,
        "dua@example.com",
        vec![
            participation("p-1", "A", "2025-10-01"),
            participation("p-1", "A", "2025-10-03"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path(PARTICIPANTS))
        .and(query_param("id_posisi", "p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::participant_page(
            vec![common::roster_entry(2)],
            1,
            20,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let report = status_lookup(&config(&server))
        .lookup_status("dua@example.com")
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.accepted_count == 1));
}

#[tokio::test]
async fn test_failed_roster_is_counted_not_fatal() {
    let server = MockServer::start().await;
    mount_participations(
        &server,
        "tiga@example.com",
        vec![participation("p-9", "Broken", "2025-10-01")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path(PARTICIPANTS))
        .and(query_param("id_posisi", "p-9"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = status_lookup(&config(&server))
        .lookup_status("tiga@example.com")
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].accepted_count, 0);
    assert_eq!(report.failed_roster_pages, 1);
}

#[tokio::test]
async fn test_unknown_email_is_not_found() {
    let server = MockServer::start().await;
    mount_participations(&server, "nobody@example.com", vec![]).await;

    let err = status_lookup(&config(&server))
        .lookup_status("nobody@example.com")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_answer_without_data_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARTICIPANTS))
        .and(query_param("email", "nobody@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = status_lookup(&config(&server))
        .lookup_status("nobody@example.com")
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
}

#[tokio::test]
async fn test_non_list_data_stays_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARTICIPANTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "oops"})))
        .mount(&server)
        .await;

    let err = status_lookup(&config(&server))
        .lookup_status("x@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, MagangError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_empty_email_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = status_lookup(&config(&server))
        .lookup_status("   ")
        .await
        .unwrap_err();

    assert!(matches!(err, MagangError::InvalidInput(_)));
}

#[tokio::test]
async fn test_remote_error_on_email_query_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PARTICIPANTS))
        .and(query_param("email", "x@example.com"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let err = status_lookup(&config(&server))
        .lookup_status("x@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, MagangError::RemoteService { status: 500, ref body } if body == "database down"));
}
