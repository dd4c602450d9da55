//! Vacancy catalog: filter form, card grid and page pills.

use maud::{html, Markup};

use maganghub_core::catalog::{CatalogPage, ListingQuery};
use maganghub_core::config::position_view_url;
use maganghub_core::probability::{percent_label, ProbabilityBand};
use maganghub_core::ListingRecord;

use super::layout::{notice, page};
use super::{initials, listing_href, status_href, title_case, Theme};

pub fn listing_page(result: &CatalogPage, query: &ListingQuery, theme: Theme) -> Markup {
    let shown = query.with_page(result.page);
    let nav = [
        ("Lowongan", listing_href(&ListingQuery::default(), theme)),
        ("Cek status", status_href(None, theme)),
    ];

    page(
        "Lowongan Magang",
        theme,
        &listing_href(&shown, theme.toggled()),
        &nav,
        html! {
            (filter_form(result, query, theme))
            p class="summary" { (result.total_rows) " lowongan" }
            div class="card-grid" {
                @for record in &result.records {
                    (card(record))
                }
            }
            @if result.records.is_empty() {
                (notice("info", "Tidak ada lowongan yang cocok dengan filter yang dipilih."))
            }
            (pagination(result, &shown, theme))
        },
    )
}

fn filter_form(result: &CatalogPage, query: &ListingQuery, theme: Theme) -> Markup {
    let options = &result.options;
    html! {
        form class="filters" method="get" action="/lowongan" {
            label {
                "Program Studi"
                select name="program" {
                    option value="" { "(Semua)" }
                    @for program in &options.programs {
                        option value=(program) selected[query.program.as_ref() == Some(program)] { (program) }
                    }
                }
            }
            label {
                "Provinsi"
                select name="province" multiple {
                    @for province in &options.provinces {
                        option value=(province) selected[query.provinces.contains(province)] { (province) }
                    }
                }
            }
            label {
                "Kabupaten/Kota"
                select name="district" multiple {
                    @for district in &options.districts {
                        option value=(district) selected[query.districts.contains(district)] { (title_case(district)) }
                    }
                }
            }
            @if theme == Theme::Light {
                input type="hidden" name="theme" value="light";
            }
            button type="submit" { "Terapkan" }
        }
    }
}

fn card(record: &ListingRecord) -> Markup {
    let band = ProbabilityBand::of(record.acceptance_probability);
    let corner = match band {
        ProbabilityBand::High => "corner-green",
        ProbabilityBand::Medium => "corner-orange",
        ProbabilityBand::Low => "corner-red",
    };
    let deadline = record
        .registration_deadline
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| "-".to_string());

    html! {
        a class="card" href=(position_view_url(&record.position_id)) target="_blank" rel="noopener" {
            div class={ "corner " (corner) } data-band=(band.as_str()) {}
            div class="card-head" {
                div class="avatar" { (initials(&record.position_title)) }
                div {
                    div class="card-title" { (record.position_title) }
                    div class="card-company" { (record.company_name) }
                }
            }
            div class="card-body" {
                div class="card-location" { (title_case(&record.district)) }
                div class="tags" {
                    @for program in &record.program_fields {
                        span class="tag-chip" { (program) }
                    }
                }
                table class="stat-table" {
                    tr {
                        th class="stat-header" { "Terdaftar" }
                        th class="stat-header" { "Kuota" }
                        th class="stat-header" { "Peluang" }
                    }
                    tr {
                        td class="stat-value" { (record.registered_count) }
                        td class="stat-value" { (record.quota) }
                        td class="stat-value probability" { (percent_label(record.acceptance_probability)) }
                    }
                }
            }
            div class="card-footer" { "Batas: " (deadline) }
        }
    }
}

fn pagination(result: &CatalogPage, query: &ListingQuery, theme: Theme) -> Markup {
    html! {
        nav class="pagination" aria-label="Halaman" {
            @if result.page > 1 {
                a class="page-pill" href=(listing_href(&query.with_page(result.page - 1), theme)) { "‹" }
            }
            @for number in &result.page_numbers {
                @if *number == result.page {
                    span class="page-pill page-pill-active" aria-current="page" { (number) }
                } @else {
                    a class="page-pill" href=(listing_href(&query.with_page(*number), theme)) { (number) }
                }
            }
            @if result.page < result.total_pages {
                a class="page-pill" href=(listing_href(&query.with_page(result.page + 1), theme)) { "›" }
            }
        }
    }
}
