use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Placeholder for any listing field the provider left out.
pub const NO_DATA: &str = "нет данных";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    Date,
    Salary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub keyword: String,
    pub area_id: u64,
    pub only_salaried: bool,
    /// `0` leaves the salary filter unset.
    pub min_salary: u64,
    pub page_size: u32,
    pub sort_by: SortBy,
}

/// Provider-agnostic vacancy as stored in page files and rendered to the
/// terminal. Text fields hold `NO_DATA` when the source had nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayListing {
    pub published_at: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub employer: String,
    pub location: String,
    pub address: String,
    pub salary: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: String,
    pub schedule: String,
    pub employment: String,
    pub experience: String,
    pub requirements: String,
    pub responsibilities: String,
    pub url: String,
}

impl Default for DisplayListing {
    fn default() -> Self {
        let no_data = || NO_DATA.to_string();
        Self {
            published_at: None,
            title: no_data(),
            employer: no_data(),
            location: no_data(),
            address: no_data(),
            salary: no_data(),
            salary_from: None,
            salary_to: None,
            currency: no_data(),
            schedule: no_data(),
            employment: no_data(),
            experience: no_data(),
            requirements: no_data(),
            responsibilities: no_data(),
            url: no_data(),
        }
    }
}

impl DisplayListing {
    /// Midpoint of the salary range. A single bound stands for both ends and
    /// a listing without any bound ranks as zero.
    pub fn salary_key(&self) -> f64 {
        match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => (from as f64 + to as f64) / 2.0,
            (Some(bound), None) | (None, Some(bound)) => bound as f64,
            (None, None) => 0.0,
        }
    }
}

/// Builds the salary line from raw bounds, e.g. `от 50000 до 70000 (RUR)`.
pub fn salary_text(from: Option<i64>, to: Option<i64>, currency: Option<&str>) -> String {
    let range = match (from, to) {
        (Some(from), Some(to)) => format!("от {from} до {to}"),
        (Some(from), None) => format!("от {from}"),
        (None, Some(to)) => format!("до {to}"),
        (None, None) => return NO_DATA.to_string(),
    };

    format!("{range} ({})", currency.unwrap_or(NO_DATA))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_salary(from: Option<i64>, to: Option<i64>) -> DisplayListing {
        DisplayListing {
            salary_from: from,
            salary_to: to,
            ..Default::default()
        }
    }

    #[test]
    fn salary_key_averages_and_falls_back() {
        assert_eq!(with_salary(Some(40_000), Some(60_000)).salary_key(), 50_000.0);
        assert_eq!(with_salary(Some(40_000), None).salary_key(), 40_000.0);
        assert_eq!(with_salary(None, Some(60_000)).salary_key(), 60_000.0);
        assert_eq!(with_salary(None, None).salary_key(), 0.0);
    }

    #[test]
    fn salary_text_describes_the_available_bounds() {
        assert_eq!(
            salary_text(Some(50_000), Some(70_000), Some("RUR")),
            "от 50000 до 70000 (RUR)"
        );
        assert_eq!(salary_text(Some(50_000), None, Some("rub")), "от 50000 (rub)");
        assert_eq!(salary_text(None, Some(70_000), Some("RUR")), "до 70000 (RUR)");
        assert_eq!(salary_text(None, None, Some("RUR")), NO_DATA);
    }

    #[test]
    fn default_listing_is_all_placeholders() {
        let listing = DisplayListing::default();
        assert_eq!(listing.title, NO_DATA);
        assert_eq!(listing.url, NO_DATA);
        assert!(listing.published_at.is_none());
        assert_eq!(listing.salary_key(), 0.0);
    }
}
