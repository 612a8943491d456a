use async_trait::async_trait;
use chrono::DateTime;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use super::{Provider, ProviderKind, SearchPage, text_field};
use crate::error::ProviderError;
use crate::models::region::RegionNode;
use crate::models::vacancy::{DisplayListing, SearchCriteria, SortBy, salary_text};
use crate::utils::config::ProviderConfig;
use crate::utils::http::{get_json, url_with_params};
use crate::utils::json::{lookup, lookup_i64, lookup_str};

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub struct HeadHunter {
    settings: ProviderConfig,
    client: Client,
}

impl HeadHunter {
    pub fn new(settings: ProviderConfig, client: Client) -> Self {
        HeadHunter { settings, client }
    }

    fn search_params(&self, criteria: &SearchCriteria, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("text", criteria.keyword.clone()),
            ("area", criteria.area_id.to_string()),
            ("page", page.to_string()),
            ("per_page", criteria.page_size.to_string()),
            ("only_with_salary", criteria.only_salaried.to_string()),
            ("order_by", order_by(criteria.sort_by).to_string()),
        ];
        if criteria.min_salary != 0 {
            params.push(("salary", criteria.min_salary.to_string()));
        }
        params
    }
}

fn order_by(sort_by: SortBy) -> &'static str {
    match sort_by {
        SortBy::Date => "publication_time",
        SortBy::Salary => "salary_desc",
    }
}

/// Splits a vacancies response into its `items`. `pages` is the total page
/// count, so there is more when a page follows `page`.
fn page_from_body(mut body: Value, page: u32, url: &str) -> Result<SearchPage, ProviderError> {
    let pages = lookup_i64(&body, &["pages"]).unwrap_or(0);
    let listings = match body.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(ProviderError::MissingKey {
                url: url.to_string(),
                key: "items",
            });
        }
    };
    debug!("hh.ru page {} of {}: {} items", page, pages, listings.len());

    Ok(SearchPage {
        listings,
        has_more: pages - i64::from(page) > 1,
    })
}

/// Converts an `{id, name, areas: [...]}` object into a region subtree.
fn area_node(value: &Value) -> Option<RegionNode> {
    let id = u64::try_from(lookup_i64(value, &["id"])?).ok()?;
    let name = lookup_str(value, &["name"])?;
    let children = lookup(value, &["areas"])
        .and_then(Value::as_array)
        .map(|areas| areas.iter().filter_map(area_node).collect())
        .unwrap_or_default();

    Some(RegionNode::new(id, name).with_children(children))
}

#[async_trait]
impl Provider for HeadHunter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HeadHunter
    }

    fn settings(&self) -> &ProviderConfig {
        &self.settings
    }

    async fn fetch_regions(&self) -> Result<RegionNode, ProviderError> {
        let url = url_with_params(&self.settings.areas_url, &[])?;
        let url_str = url.to_string();
        let body = get_json(&self.client, url, &[]).await?;

        let root = area_node(&body).ok_or(ProviderError::MissingKey {
            url: url_str,
            key: "id",
        })?;
        info!("loaded {} hh.ru areas under {}", root.node_count(), root.name);
        Ok(root)
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<SearchPage, ProviderError> {
        let url = url_with_params(&self.settings.vacancies_url, &self.search_params(criteria, page))?;
        let url_str = url.to_string();
        let body = get_json(&self.client, url, &[]).await?;
        page_from_body(body, page, &url_str)
    }

    fn normalize(&self, raw: &Value) -> DisplayListing {
        let salary_from = lookup_i64(raw, &["salary", "from"]);
        let salary_to = lookup_i64(raw, &["salary", "to"]);
        let currency = lookup_str(raw, &["salary", "currency"]);

        DisplayListing {
            published_at: lookup_str(raw, &["published_at"]).and_then(|s| {
                DateTime::parse_from_str(s, DATE_FORMAT)
                    .or_else(|_| DateTime::parse_from_rfc3339(s))
                    .ok()
            }),
            title: text_field(raw, &["name"]),
            employer: text_field(raw, &["employer", "name"]),
            location: text_field(raw, &["area", "name"]),
            address: text_field(raw, &["address", "raw"]),
            salary: salary_text(salary_from, salary_to, currency),
            salary_from,
            salary_to,
            currency: text_field(raw, &["salary", "currency"]),
            schedule: text_field(raw, &["schedule", "name"]),
            employment: text_field(raw, &["employment", "name"]),
            experience: text_field(raw, &["experience", "name"]),
            requirements: text_field(raw, &["snippet", "requirement"]),
            responsibilities: text_field(raw, &["snippet", "responsibility"]),
            url: text_field(raw, &["alternate_url"]),
        }
    }
}
