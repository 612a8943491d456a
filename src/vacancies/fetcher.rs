use std::path::Path;
use std::time::Duration;

use eyre::{Result, WrapErr};
use log::{debug, info};

use crate::models::vacancy::{DisplayListing, SearchCriteria};
use crate::providers::Provider;
use crate::utils::cache::CacheDir;

/// Pages through a provider's search results and stores them, normalized,
/// as one JSON file per page.
pub struct VacancyFetcher<'a> {
    provider: &'a dyn Provider,
    cache: CacheDir,
    delay: Duration,
}

impl<'a> VacancyFetcher<'a> {
    pub fn new(provider: &'a dyn Provider, data_dir: &Path, delay: Duration) -> Result<Self> {
        let cache = CacheDir::init(provider.kind().vacancies_dir(data_dir))?;
        Ok(Self {
            provider,
            cache,
            delay,
        })
    }

    /// Replaces the page cache with the results for `criteria` and returns
    /// how many listings were stored. Pages written before a failure stay on
    /// disk.
    ///
    /// `progress` is called after every page with the number of pages done
    /// and the page ceiling.
    pub async fn fetch_all(
        &self,
        criteria: &SearchCriteria,
        mut progress: impl FnMut(u32, u32) -> Result<()>,
    ) -> Result<u64> {
        let kind = self.provider.kind();
        let max_pages = self.provider.settings().max_pages;
        let full_page = criteria.page_size as usize;

        self.cache.clear();
        info!(
            "searching {} for '{}' in area {} (up to {} pages)",
            kind, criteria.keyword, criteria.area_id, max_pages
        );

        let mut total: u64 = 0;
        for page in 0..max_pages {
            let result = self
                .provider
                .search(criteria, page)
                .await
                .wrap_err_with(|| format!("failed to fetch page {} from {}", page, kind))?;

            let count = result.listings.len();
            if count > 0 {
                let listings: Vec<DisplayListing> = result
                    .listings
                    .iter()
                    .map(|raw| self.provider.normalize(raw))
                    .collect();
                self.cache.write_page(page, &listings)?;
                total += count as u64;
            }
            debug!("page {}: {} listings, {} so far", page, count, total);
            progress(page + 1, max_pages)?;

            if !result.has_more || count < full_page {
                break;
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "stored {} listings from {} in {}",
            total,
            kind,
            self.cache.path().display()
        );
        Ok(total)
    }
}
