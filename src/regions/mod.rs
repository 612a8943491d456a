pub mod resolver;

use std::path::Path;

use eyre::{Result, WrapErr};
use log::info;

use crate::models::region::RegionNode;
use crate::providers::Provider;
use crate::utils::cache::CacheDir;

pub use resolver::resolve;

const AREAS_FILE: &str = "areas.json";

/// The cached area hierarchy of one provider.
pub struct RegionDirectory {
    cache: CacheDir,
}

impl RegionDirectory {
    pub fn open(provider: &dyn Provider, data_dir: &Path) -> Result<Self> {
        let cache = CacheDir::init(provider.kind().areas_dir(data_dir))?;
        Ok(Self { cache })
    }

    /// Replaces the cached hierarchy with a fresh download. The old file is
    /// removed first, so a failed download leaves no stale tree behind.
    pub async fn refresh(&self, provider: &dyn Provider) -> Result<RegionNode> {
        self.cache.clear();

        let root = provider
            .fetch_regions()
            .await
            .wrap_err_with(|| format!("failed to load the {} area list", provider.kind()))?;

        let file = self.cache.save_json(AREAS_FILE, &root)?;
        info!("saved {} areas to {}", root.node_count(), file.display());
        Ok(root)
    }

    pub fn load(&self) -> Result<RegionNode> {
        self.cache.load_json(AREAS_FILE)
    }
}
