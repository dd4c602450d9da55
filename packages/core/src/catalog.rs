//! Filtering, ordering and paging over the snapshot dataset.
//!
//! Filter options cascade: province options are computed after the program
//! filter, district options after the province filter. Results are ordered by
//! acceptance probability, highest first.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::ListingRecord;

pub const CATALOG_PAGE_SIZE: usize = 20;

/// Maximum number of page links shown at once.
pub const PAGE_WINDOW: usize = 7;

/// Catalog request: filters plus the requested page.
///
/// An empty province or district list means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub program: Option<String>,
    pub provinces: Vec<String>,
    pub districts: Vec<String>,
    /// 1-based; clamped into range when the query runs.
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            program: None,
            provinces: Vec::new(),
            districts: Vec::new(),
            page: 1,
        }
    }
}

impl ListingQuery {
    /// Build a query from decoded `key=value` pairs, where `province` and
    /// `district` may repeat. Unknown keys and unparseable pages are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "program" => query.program = Some(value.to_string()),
                "province" => query.provinces.push(value.to_string()),
                "district" => query.districts.push(value.to_string()),
                "page" => {
                    if let Ok(page) = value.parse() {
                        query.page = page;
                    }
                }
                _ => {}
            }
        }
        query
    }

    /// Same filters, different page.
    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// `key=value` pairs for building links back to this query.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(program) = &self.program {
            pairs.push(("program", program.clone()));
        }
        pairs.extend(self.provinces.iter().map(|p| ("province", p.clone())));
        pairs.extend(self.districts.iter().map(|d| ("district", d.clone())));
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

/// Values offered by the filter controls for the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub programs: Vec<String>,
    pub provinces: Vec<String>,
    pub districts: Vec<String>,
}

/// One page of filtered results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub records: Vec<ListingRecord>,
    /// The page actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub page_numbers: Vec<usize>,
    pub options: FilterOptions,
}

/// The snapshot dataset, loaded once and queried per request.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ListingRecord>,
    programs: Vec<String>,
}

impl Catalog {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        let programs = records
            .iter()
            .flat_map(|r| r.program_fields.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self { records, programs }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted union of every record's program fields.
    pub fn program_options(&self) -> &[String] {
        &self.programs
    }

    /// Filter, order and slice out the requested page.
    pub fn query(&self, query: &ListingQuery, page_size: usize) -> CatalogPage {
        let by_program: Vec<&ListingRecord> = match &query.program {
            Some(program) => self
                .records
                .iter()
                .filter(|r| r.program_fields.contains(program))
                .collect(),
            None => self.records.iter().collect(),
        };
        let provinces = distinct(by_program.iter().map(|r| r.region.as_str()));

        let by_province = keep_matching(by_program, &query.provinces, |r| &r.region);
        let districts = distinct(by_province.iter().map(|r| r.district.as_str()));

        let mut selected = keep_matching(by_province, &query.districts, |r| &r.district);
        selected.sort_by(|a, b| b.acceptance_probability.total_cmp(&a.acceptance_probability));

        let total_rows = selected.len();
        let (page, total_pages) = clamp_page(query.page, total_rows, page_size);
        let page_size = page_size.max(1);
        let records = selected
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        CatalogPage {
            records,
            page,
            total_pages,
            total_rows,
            page_numbers: page_numbers(page, total_pages),
            options: FilterOptions {
                programs: self.program_options().to_vec(),
                provinces,
                districts,
            },
        }
    }
}

fn keep_matching<'a>(
    records: Vec<&'a ListingRecord>,
    wanted: &[String],
    field: impl Fn(&ListingRecord) -> &String,
) -> Vec<&'a ListingRecord> {
    if wanted.is_empty() {
        return records;
    }
    let wanted: HashSet<&String> = wanted.iter().collect();
    records.into_iter().filter(|r| wanted.contains(field(r))).collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// `(page, total_pages)`: at least one page, requested page clamped into range.
pub fn clamp_page(requested: usize, total_rows: usize, page_size: usize) -> (usize, usize) {
    let total_pages = total_rows.div_ceil(page_size.max(1)).max(1);
    (requested.clamp(1, total_pages), total_pages)
}

/// Up to [`PAGE_WINDOW`] consecutive page numbers centred on `current`.
pub fn page_numbers(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let half = PAGE_WINDOW / 2;
    let current = current.clamp(1, total_pages);
    let end = (current.saturating_sub(half).max(1) + PAGE_WINDOW - 1).min(total_pages);
    let start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
    (start..=end).collect()
}
