//! Email status lookup page.

use maud::{html, Markup};

use maganghub_core::catalog::ListingQuery;
use maganghub_core::status::StatusReport;
use maganghub_core::ApplicationStatusRow;

use super::layout::{notice, page};
use super::{listing_href, status_href, Theme};

/// What the status page shows under the form.
#[derive(Debug)]
pub enum StatusView {
    /// No search submitted yet.
    Form,
    MissingEmail,
    NotFound,
    /// The API refused the lookup; its raw payload is shown.
    RemoteError { status: u16, body: String },
    Failed(String),
    Report(StatusReport),
}

pub fn status_page(email: Option<&str>, view: &StatusView, theme: Theme) -> Markup {
    let nav = [
        ("Lowongan", listing_href(&ListingQuery::default(), theme)),
        ("Cek status", status_href(None, theme)),
    ];

    page(
        "Cek Data Peserta",
        theme,
        &status_href(email, theme.toggled()),
        &nav,
        html! {
            form class="status-form" method="get" action="/status" {
                label for="email" { "Email" }
                input type="email" id="email" name="email" placeholder="nama@gmail.com" value=(email.unwrap_or_default());
                @if theme == Theme::Light {
                    input type="hidden" name="theme" value="light";
                }
                button type="submit" { "Cari Data" }
            }
            @match view {
                StatusView::Form => {}
                StatusView::MissingEmail => (notice("warning", "Masukkan email terlebih dahulu.")),
                StatusView::NotFound => (notice("info", "Tidak ada data peserta ditemukan.")),
                StatusView::RemoteError { status, body } => {
                    (notice("error", &format!("Server error: {status}")))
                    pre class="raw-payload" { (body) }
                }
                StatusView::Failed(message) => (notice("error", message)),
                StatusView::Report(report) => (results(report)),
            }
        },
    )
}

fn results(report: &StatusReport) -> Markup {
    html! {
        @if report.failed_roster_pages > 0 {
            (notice("warning", &format!(
                "{} halaman data pendaftar gagal dimuat; angka bisa lebih kecil dari sebenarnya.",
                report.failed_roster_pages
            )))
        }
        div class="result-grid" {
            @for row in &report.rows {
                (status_card(row))
            }
        }
    }
}

fn status_card(row: &ApplicationStatusRow) -> Markup {
    let applied = row
        .application_date
        .map(|d| d.date().format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    html! {
        div class="status-card" {
            div class="card-title" { (row.position_title) }
            div class="subtext" {
                b { (row.company_name) }
                br;
                (row.company_address)
                br;
                "Tanggal Daftar: " (applied)
            }
            div class="metric-grid" {
                (metric("Status Seleksi", &row.selection_status_label))
                (metric("Diterima", &row.accepted_count.to_string()))
                (metric("Total Pendaftar", &row.total_applicants.to_string()))
                (metric("Diterima Perusahaan Lain", &row.accepted_elsewhere_count.to_string()))
            }
        }
    }
}

fn metric(label: &str, value: &str) -> Markup {
    html! {
        div class="metric-box" {
            div class="metric-label" { (label) }
            div class="metric-value" { (value) }
        }
    }
}
