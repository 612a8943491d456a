use std::cmp::Reverse;
use std::io::{BufRead, Write};
use std::path::Path;

use eyre::Result;
use log::{debug, info};

use crate::models::vacancy::{DisplayListing, NO_DATA, SortBy};
use crate::providers::ProviderKind;
use crate::utils::cache::CacheDir;
use crate::utils::text::{clean, wrap};

const CONTINUATION_INDENT: usize = 2;
const FIELD_INDENT: &str = "  ";

/// How a listing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Completed,
    /// The reader asked to stop before the last listing.
    Quit,
}

/// Orders listings best first: newest publication date, or highest salary
/// midpoint. The sort is stable, so ties keep their fetch order.
pub fn sort_listings(listings: &mut [DisplayListing], sort_by: SortBy) {
    match sort_by {
        SortBy::Date => listings.sort_by_key(|listing| Reverse(listing.published_at)),
        SortBy::Salary => {
            listings.sort_by(|a, b| b.salary_key().total_cmp(&a.salary_key()));
        }
    }
}

/// Sorts and keeps the top `count` listings.
pub fn select(mut listings: Vec<DisplayListing>, count: usize, sort_by: SortBy) -> Vec<DisplayListing> {
    sort_listings(&mut listings, sort_by);
    listings.truncate(count);
    listings
}

fn value(text: &str) -> String {
    let text = clean(text);
    let text = if text.is_empty() { NO_DATA.to_string() } else { text };
    if text.ends_with(['.', '!', '?', '…']) {
        text
    } else {
        format!("{text}.")
    }
}

/// Renders one listing as a framed header followed by its fields, one per
/// line. Requirements and responsibilities are wrapped at `wrap_width`.
pub fn render(seq: usize, listing: &DisplayListing, wrap_width: usize) -> String {
    let date = listing
        .published_at
        .map(|date| format!(" от {}", date.format("%d.%m.%Y")))
        .unwrap_or_default();
    let header = format!("№ {seq},{date}: {}", value(&listing.title));
    let rule = "-".repeat(header.chars().count());

    let mut out = format!("{rule}\n{header}\n{rule}\n");

    let fields = [
        ("Работодатель", value(&listing.employer)),
        ("Населённый пункт", value(&listing.location)),
        ("Адрес", value(&listing.address)),
        ("Зарплата", value(&listing.salary)),
        ("График работы", value(&listing.schedule)),
        ("Занятость", value(&listing.employment)),
        ("Опыт работы", value(&listing.experience)),
    ];
    for (label, text) in fields {
        out.push_str(&format!("{FIELD_INDENT}{label}: {text}\n"));
    }

    let wrapped = [
        ("Требования к соискателю", value(&listing.requirements)),
        ("Обязанности", value(&listing.responsibilities)),
    ];
    let width = wrap_width.saturating_sub(FIELD_INDENT.len());
    for (label, text) in wrapped {
        for line in wrap(&format!("{label}: {text}"), width, CONTINUATION_INDENT).lines() {
            out.push_str(&format!("{FIELD_INDENT}{line}\n"));
        }
    }

    let url = clean(&listing.url);
    let url = if url.is_empty() { NO_DATA } else { url.as_str() };
    out.push_str(&format!("{FIELD_INDENT}Подробнее здесь (URL): {url}\n"));

    out
}

/// Renders cached listings of one provider.
pub struct Presenter {
    cache: CacheDir,
    wrap_width: usize,
}

impl Presenter {
    pub fn open(kind: ProviderKind, data_dir: &Path, wrap_width: usize) -> Result<Self> {
        let cache = CacheDir::init(kind.vacancies_dir(data_dir))?;
        Ok(Self { cache, wrap_width })
    }

    pub fn load(&self) -> Vec<DisplayListing> {
        let listings: Vec<DisplayListing> = self.cache.read_pages();
        debug!("loaded {} cached listings", listings.len());
        listings
    }

    /// Prints the best `count` cached listings under `sort_by`. With
    /// `one_at_a_time` the reader confirms each listing and may stop early.
    pub fn print<R: BufRead, W: Write>(
        &self,
        count: usize,
        sort_by: SortBy,
        one_at_a_time: bool,
        input: &mut R,
        output: &mut W,
    ) -> Result<Presentation> {
        let listings = select(self.load(), count, sort_by);
        info!("printing {} listings sorted by {:?}", listings.len(), sort_by);

        for (i, listing) in listings.iter().enumerate() {
            write!(output, "{}", render(i + 1, listing, self.wrap_width))?;

            if one_at_a_time && !advance(input, output)? {
                return Ok(Presentation::Quit);
            }
        }

        writeln!(output, "----------------------\nВыведены все вакансии.")?;
        Ok(Presentation::Completed)
    }
}

/// Asks whether to show the next listing. `q` or end of input means stop.
fn advance<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    write!(
        output,
        "\n ✅ Нажмите [Enter], чтобы продолжить\n ❌ Введите 'q', чтобы выйти из программы: "
    )?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    writeln!(output)?;
    Ok(!answer.trim().eq_ignore_ascii_case("q"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::DateTime;
    use tempfile::TempDir;

    use super::*;

    fn listing(title: &str, published: &str, from: Option<i64>, to: Option<i64>) -> DisplayListing {
        DisplayListing {
            published_at: DateTime::parse_from_rfc3339(published).ok(),
            title: title.to_string(),
            salary_from: from,
            salary_to: to,
            ..Default::default()
        }
    }

    fn sample() -> Vec<DisplayListing> {
        vec![
            listing("a", "2023-06-01T10:00:00+03:00", Some(50_000), Some(70_000)),
            listing("b", "2023-06-03T09:00:00+03:00", None, Some(65_000)),
            listing("c", "2023-05-20T18:00:00+03:00", None, None),
            listing("d", "2023-06-02T23:00:00+00:00", Some(90_000), None),
            listing("e", "not a date", Some(10_000), Some(20_000)),
        ]
    }

    fn titles(listings: &[DisplayListing]) -> Vec<&str> {
        listings.iter().map(|l| l.title.as_str()).collect()
    }

    #[test]
    fn date_sort_is_newest_first_with_undated_last() {
        let mut listings = sample();
        sort_listings(&mut listings, SortBy::Date);

        assert_eq!(titles(&listings), ["b", "d", "a", "c", "e"]);
        for pair in listings.windows(2) {
            assert!(pair[0].published_at >= pair[1].published_at);
        }
    }

    #[test]
    fn salary_sort_uses_range_midpoint() {
        let mut listings = sample();
        sort_listings(&mut listings, SortBy::Salary);

        assert_eq!(titles(&listings), ["d", "b", "a", "e", "c"]);
        for pair in listings.windows(2) {
            assert!(pair[0].salary_key() >= pair[1].salary_key());
        }
    }

    #[test]
    fn select_truncates_after_sorting() {
        assert_eq!(titles(&select(sample(), 2, SortBy::Salary)), ["d", "b"]);
        assert_eq!(select(sample(), 5, SortBy::Date).len(), 5);
        assert_eq!(select(sample(), 50, SortBy::Date).len(), 5);
        assert!(select(sample(), 0, SortBy::Date).is_empty());
    }

    #[test]
    fn render_frames_header_and_lists_fields_in_order() {
        let mut item = listing("Водитель", "2023-06-01T12:30:00+03:00", Some(60_000), None);
        item.salary = "от 60000 (RUR)".to_string();
        item.employer = "ООО  <b>Ромашка</b>".to_string();
        item.url = "https://hh.ru/vacancy/1".to_string();

        let text = render(1, &item, 100);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "№ 1, от 01.06.2023: Водитель.");
        assert_eq!(lines[0], "-".repeat(lines[1].chars().count()));
        assert_eq!(lines[2], lines[0]);
        assert_eq!(lines[3], "  Работодатель: ООО Ромашка.");
        assert_eq!(lines[4], "  Населённый пункт: нет данных.");
        assert_eq!(lines[6], "  Зарплата: от 60000 (RUR).");
        assert_eq!(lines[10], "  Требования к соискателю: нет данных.");
        assert_eq!(lines[11], "  Обязанности: нет данных.");
        assert_eq!(lines[12], "  Подробнее здесь (URL): https://hh.ru/vacancy/1");
        assert_eq!(lines.len(), 13);
    }

    #[test]
    fn render_wraps_long_requirements() {
        let mut item = listing("Курьер", "2023-06-01T12:30:00+03:00", None, None);
        item.requirements = "слово ".repeat(40);

        let text = render(7, &item, 60);
        let block: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.contains("Требования"))
            .take_while(|l| !l.contains("Обязанности"))
            .collect();

        assert!(block.len() > 1);
        assert!(block[0].starts_with("  Требования к соискателю: слово"));
        for line in &block {
            assert!(line.chars().count() <= 60, "{line:?}");
        }
        for line in &block[1..] {
            assert!(line.starts_with("    слово"));
        }
        assert!(block.last().unwrap().ends_with("слово."));
    }

    #[test]
    fn render_is_deterministic() {
        let item = sample().remove(0);
        assert_eq!(render(3, &item, 80), render(3, &item, 80));
    }

    fn presenter_with(listings: &[DisplayListing]) -> (TempDir, Presenter) {
        let tmp = TempDir::new().unwrap();
        let presenter = Presenter::open(ProviderKind::HeadHunter, tmp.path(), 100).unwrap();
        presenter.cache.write_page(0, &listings[..2]).unwrap();
        presenter.cache.write_page(1, &listings[2..]).unwrap();
        (tmp, presenter)
    }

    #[test]
    fn print_all_at_once() {
        let (_tmp, presenter) = presenter_with(&sample());
        let mut out = Vec::new();

        let result = presenter
            .print(3, SortBy::Date, false, &mut Cursor::new(""), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(result, Presentation::Completed);
        assert!(text.contains("№ 1, от 03.06.2023: b."));
        assert!(text.contains("№ 3, от 01.06.2023: a."));
        assert!(!text.contains("№ 4"));
        assert!(text.ends_with("Выведены все вакансии.\n"));
    }

    #[test]
    fn quitting_stops_after_the_current_listing() {
        let (_tmp, presenter) = presenter_with(&sample());
        let mut out = Vec::new();

        let result = presenter
            .print(5, SortBy::Date, true, &mut Cursor::new("\n Q \n"), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(result, Presentation::Quit);
        assert!(text.contains("№ 2,"));
        assert!(!text.contains("№ 3,"));
        assert!(!text.contains("Выведены все вакансии."));
    }

    #[test]
    fn end_of_input_counts_as_quit() {
        let (_tmp, presenter) = presenter_with(&sample());
        let mut out = Vec::new();

        let result = presenter
            .print(5, SortBy::Salary, true, &mut Cursor::new(""), &mut out)
            .unwrap();

        assert_eq!(result, Presentation::Quit);
        assert_eq!(String::from_utf8(out).unwrap().matches("№ ").count(), 1);
    }
}
