pub mod headhunter;
pub mod superjob;

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::models::region::RegionNode;
use crate::models::vacancy::{DisplayListing, NO_DATA, SearchCriteria};
use crate::utils::config::{Config, ProviderConfig};
use crate::utils::json::lookup_str;

pub use headhunter::HeadHunter;
pub use superjob::SuperJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    HeadHunter,
    SuperJob,
}

impl ProviderKind {
    /// Short name used for cache directories.
    pub fn tag(self) -> &'static str {
        match self {
            ProviderKind::HeadHunter => "hh",
            ProviderKind::SuperJob => "sj",
        }
    }

    pub fn domain(self) -> &'static str {
        match self {
            ProviderKind::HeadHunter => "hh.ru",
            ProviderKind::SuperJob => "superjob.ru",
        }
    }

    pub fn areas_dir(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.tag()).join("areas")
    }

    pub fn vacancies_dir(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.tag()).join("vacancies")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::HeadHunter => write!(f, "HeadHunter ({})", self.domain()),
            ProviderKind::SuperJob => write!(f, "SuperJob ({})", self.domain()),
        }
    }
}

/// One page of raw search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub listings: Vec<Value>,
    /// Whether the service reports pages after this one.
    pub has_more: bool,
}

/// Adapter over one vacancy service: where its data lives, how to ask for
/// it and how to flatten what comes back.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn settings(&self) -> &ProviderConfig;

    /// Downloads the provider's area hierarchy, rooted at its default country.
    async fn fetch_regions(&self) -> Result<RegionNode, ProviderError>;

    /// Fetches page `page` (zero-based) of results for `criteria`.
    async fn search(&self, criteria: &SearchCriteria, page: u32)
    -> Result<SearchPage, ProviderError>;

    fn normalize(&self, raw: &Value) -> DisplayListing;
}

pub fn build(kind: ProviderKind, config: &Config) -> eyre::Result<Box<dyn Provider>> {
    let client = crate::utils::http::client(&config.http)?;
    let provider: Box<dyn Provider> = match kind {
        ProviderKind::HeadHunter => Box::new(HeadHunter::new(config.headhunter.clone(), client)),
        ProviderKind::SuperJob => Box::new(SuperJob::new(config.superjob.clone(), client)?),
    };
    Ok(provider)
}

/// Reads a text field for a `DisplayListing`, falling back to `NO_DATA`.
fn text_field(raw: &Value, path: &[&str]) -> String {
    lookup_str(raw, path).unwrap_or(NO_DATA).to_string()
}
