use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
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

const API_KEY_HEADER: &str = "X-Api-App-Id";
/// `date_published` is a unix timestamp; listings are dated in Moscow time
/// like hh.ru's.
const MOSCOW_UTC_OFFSET: i32 = 3 * 3600;

pub struct SuperJob {
    settings: ProviderConfig,
    api_key: String,
    client: Client,
}

impl SuperJob {
    pub fn new(settings: ProviderConfig, client: Client) -> Result<Self, ProviderError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::MissingCredentials("superjob.ru"))?;

        Ok(SuperJob {
            settings,
            api_key,
            client,
        })
    }

    fn search_params(&self, criteria: &SearchCriteria, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("keyword", criteria.keyword.clone()),
            ("town", criteria.area_id.to_string()),
            ("page", page.to_string()),
            ("count", criteria.page_size.to_string()),
            ("order_field", order_field(criteria.sort_by).to_string()),
            ("order_direction", "desc".to_string()),
        ];
        if criteria.only_salaried {
            params.push(("no_agreement", "1".to_string()));
        }
        if criteria.min_salary != 0 {
            params.push(("payment_from", criteria.min_salary.to_string()));
        }
        params
    }

    async fn get(&self, url: reqwest::Url) -> Result<Value, ProviderError> {
        get_json(&self.client, url, &[(API_KEY_HEADER, self.api_key.as_str())]).await
    }
}

fn order_field(sort_by: SortBy) -> &'static str {
    match sort_by {
        SortBy::Date => "date",
        SortBy::Salary => "payment",
    }
}

fn town_node(value: &Value) -> Option<RegionNode> {
    let id = u64::try_from(lookup_i64(value, &["id"])?).ok()?;
    let name = lookup_str(value, &["title"])?;
    Some(RegionNode::new(id, name))
}

fn towns(value: &Value) -> Vec<RegionNode> {
    lookup(value, &["towns"])
        .and_then(Value::as_array)
        .map(|towns| towns.iter().filter_map(town_node).collect())
        .unwrap_or_default()
}

/// Folds a combined-regions country object into a tree: federal towns and
/// regions side by side under the country, towns under their region.
fn country_node(value: &Value) -> Option<RegionNode> {
    let mut children = towns(value);

    let regions = lookup(value, &["regions"])
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|region| Some(town_node(region)?.with_children(towns(region))));
    children.extend(regions);

    Some(town_node(value)?.with_children(children))
}

/// Splits a vacancies response into its `objects` and the `more` flag.
fn page_from_body(mut body: Value, page: u32, url: &str) -> Result<SearchPage, ProviderError> {
    let more = lookup(&body, &["more"]).and_then(Value::as_bool).unwrap_or(false);
    let listings = match body.get_mut("objects").map(Value::take) {
        Some(Value::Array(objects)) => objects,
        _ => {
            return Err(ProviderError::MissingKey {
                url: url.to_string(),
                key: "objects",
            });
        }
    };
    debug!("superjob.ru page {}: {} objects, more: {}", page, listings.len(), more);

    Ok(SearchPage {
        listings,
        has_more: more,
    })
}

/// A zero payment bound means the employer left it blank.
fn payment(raw: &Value, key: &str) -> Option<i64> {
    lookup_i64(raw, &[key]).filter(|amount| *amount > 0)
}

#[async_trait]
impl Provider for SuperJob {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SuperJob
    }

    fn settings(&self) -> &ProviderConfig {
        &self.settings
    }

    async fn fetch_regions(&self) -> Result<RegionNode, ProviderError> {
        let url = url_with_params(&self.settings.areas_url, &[])?;
        let url_str = url.to_string();
        let body = self.get(url).await?;

        // the endpoint lists countries, Russia first
        let country = body
            .as_array()
            .and_then(|countries| countries.first())
            .or_else(|| {
                lookup(&body, &["objects"])
                    .and_then(Value::as_array)
                    .and_then(|countries| countries.first())
            })
            .and_then(country_node)
            .ok_or(ProviderError::MissingKey {
                url: url_str,
                key: "regions",
            })?;
        info!(
            "loaded {} superjob.ru areas under {}",
            country.node_count(),
            country.name
        );
        Ok(country)
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<SearchPage, ProviderError> {
        let url = url_with_params(&self.settings.vacancies_url, &self.search_params(criteria, page))?;
        let url_str = url.to_string();
        let body = self.get(url).await?;
        page_from_body(body, page, &url_str)
    }

    fn normalize(&self, raw: &Value) -> DisplayListing {
        let salary_from = payment(raw, "payment_from");
        let salary_to = payment(raw, "payment_to");
        let currency = lookup_str(raw, &["currency"]);

        DisplayListing {
            published_at: lookup_i64(raw, &["date_published"])
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .zip(FixedOffset::east_opt(MOSCOW_UTC_OFFSET))
                .map(|(utc, moscow)| utc.with_timezone(&moscow)),
            title: text_field(raw, &["profession"]),
            employer: text_field(raw, &["firm_name"]),
            location: text_field(raw, &["town", "title"]),
            address: text_field(raw, &["address"]),
            salary: salary_text(salary_from, salary_to, currency),
            salary_from,
            salary_to,
            currency: text_field(raw, &["currency"]),
            schedule: text_field(raw, &["place_of_work", "title"]),
            employment: text_field(raw, &["type_of_work", "title"]),
            experience: text_field(raw, &["experience", "title"]),
            requirements: text_field(raw, &["candidat"]),
            responsibilities: text_field(raw, &["work"]),
            url: text_field(raw, &["link"]),
        }
    }
}
