use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips markup and squeezes whitespace, the cleanup every rendered value gets.
pub fn clean(text: &str) -> String {
    collapse_whitespace(&strip_html(text))
}

/// Breaks `text` into lines of at most `width` characters. Lines after the
/// first start with `indent` spaces, which count towards the width. Words that
/// cannot fit on a line of their own are split.
pub fn wrap(text: &str, width: usize, indent: usize) -> String {
    let width = width.max(indent + 1);
    let pad = " ".repeat(indent);

    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let start_len = if lines.is_empty() { 0 } else { indent };
            let sep = usize::from(line_len > start_len);

            if line_len + sep + word.len() <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.extend(word.iter());
                line_len += sep + word.len();
                break;
            }

            if line_len > start_len {
                // current line is full, retry the word on a fresh one
                lines.push(std::mem::replace(&mut line, pad.clone()));
                line_len = indent;
                continue;
            }

            let room = width - line_len;
            let rest = word.split_off(room);
            line.extend(word.iter());
            lines.push(std::mem::replace(&mut line, pad.clone()));
            line_len = indent;
            word = rest;
        }
    }

    if line_len > if lines.is_empty() { 0 } else { indent } {
        lines.push(line);
    }

    lines.join("\n")
}

/// Picks the Russian noun form agreeing with `n`: `[one, few, many]`,
/// e.g. `["вакансия", "вакансии", "вакансий"]`.
pub fn plural<'a>(n: u64, forms: [&'a str; 3]) -> &'a str {
    let [one, few, many] = forms;
    match (n % 10, n % 100) {
        (1, rem) if rem != 11 => one,
        (2..=4, rem) if !(12..=14).contains(&rem) => few,
        _ => many,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VACANCY: [&str; 3] = ["вакансия", "вакансии", "вакансий"];

    #[test]
    fn clean_removes_tags_and_squeezes_spaces() {
        let raw = "  Опыт работы с <highlighttext>Python</highlighttext>\n\n от  3 лет ";
        assert_eq!(clean(raw), "Опыт работы с Python от 3 лет");
    }

    #[test]
    fn wrap_keeps_lines_within_width() {
        let text = "раз два три четыре пять шесть семь восемь девять десять";
        let wrapped = wrap(text, 20, 4);

        for line in wrapped.lines() {
            assert!(line.chars().count() <= 20, "line too long: {line:?}");
        }
        for line in wrapped.lines().skip(1) {
            assert!(line.starts_with("    "));
            assert!(!line.starts_with("     "));
        }
        assert_eq!(clean(&wrapped), text);
    }

    #[test]
    fn wrap_splits_words_longer_than_a_line() {
        let wrapped = wrap("abcdefghijklmnop", 10, 2);
        assert_eq!(wrapped, "abcdefghij\n  klmnop");
    }

    #[test]
    fn wrap_leaves_short_text_alone() {
        assert_eq!(wrap("коротко", 40, 4), "коротко");
        assert_eq!(wrap("", 40, 4), "");
    }

    #[test]
    fn plural_follows_russian_rules() {
        assert_eq!(plural(1, VACANCY), "вакансия");
        assert_eq!(plural(21, VACANCY), "вакансия");
        assert_eq!(plural(101, VACANCY), "вакансия");
        assert_eq!(plural(2, VACANCY), "вакансии");
        assert_eq!(plural(34, VACANCY), "вакансии");
        assert_eq!(plural(0, VACANCY), "вакансий");
        assert_eq!(plural(5, VACANCY), "вакансий");
        assert_eq!(plural(11, VACANCY), "вакансий");
        assert_eq!(plural(12, VACANCY), "вакансий");
        assert_eq!(plural(14, VACANCY), "вакансий");
        assert_eq!(plural(111, VACANCY), "вакансий");
        assert_eq!(plural(2000, VACANCY), "вакансий");
    }
}
