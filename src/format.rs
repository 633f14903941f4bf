use chrono::{DateTime, Locale, Utc};

use crate::post::Section;

/// Assumed reading speed, in words per minute.
const WORDS_PER_MINUTE: u32 = 200;

/// Estimate the minutes needed to read a post's content.
///
/// Counts whitespace-delimited words across every section heading and
/// paragraph body, then divides by the assumed reading speed, rounding up.
/// Empty content reads in zero minutes.
pub fn reading_time_minutes(sections: &[Section]) -> u32 {
    let total_words: u32 = sections
        .iter()
        .map(|section| {
            let heading_words = word_count(&section.heading);
            let body_words: u32 = section
                .body
                .iter()
                .map(|paragraph| paragraph.text.as_deref().map_or(0, word_count))
                .sum();
            heading_words + body_words
        })
        .sum();

    total_words.div_ceil(WORDS_PER_MINUTE)
}

fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Format a timestamp for display in the `pt-BR` locale, e.g. "10 mar 2021".
///
/// With `with_time`, a 24-hour clock suffix is appended: "10 mar 2021, às
/// 15:49". A missing timestamp formats as the empty string.
pub fn format_display_date(timestamp: Option<DateTime<Utc>>, with_time: bool) -> String {
    let Some(timestamp) = timestamp else {
        return String::new();
    };

    let date = strip_month_articles(
        &timestamp
            .format_localized("%d de %b de %Y", Locale::pt_BR)
            .to_string(),
    );

    if with_time {
        format!("{}, às {}", date, timestamp.format("%H:%M"))
    } else {
        date
    }
}

/// The locale tables write out "10 de mar. de 2021"; the display form drops
/// the articles and the abbreviation period.
fn strip_month_articles(formatted: &str) -> String {
    formatted.replace("de ", "").replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Paragraph;
    use chrono::TimeZone;

    fn section(heading: &str, texts: &[Option<&str>]) -> Section {
        Section {
            heading: heading.to_string(),
            body: texts
                .iter()
                .map(|text| Paragraph {
                    text: text.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_content_reads_in_zero_minutes() {
        assert_eq!(reading_time_minutes(&[]), 0);
        assert_eq!(reading_time_minutes(&[section("", &[None])]), 0);
    }

    #[test]
    fn short_post_reads_in_one_minute() {
        let sections = [
            section("Intro", &[Some("one two three")]),
            section("", &[Some("four five")]),
        ];
        assert_eq!(reading_time_minutes(&sections), 1);
    }

    #[test]
    fn reading_time_rounds_up() {
        let over = vec!["word"; 201].join(" ");
        assert_eq!(reading_time_minutes(&[section("", &[Some(&over)])]), 2);

        let exact = vec!["word"; 400].join(" ");
        assert_eq!(reading_time_minutes(&[section("", &[Some(&exact)])]), 2);
    }

    #[test]
    fn reading_time_ignores_section_order() {
        let a = section("Um dois", &[Some("três quatro cinco")]);
        let b = section("", &[Some("seis"), None]);
        assert_eq!(
            reading_time_minutes(&[a.clone(), b.clone()]),
            reading_time_minutes(&[b, a]),
        );
    }

    #[test]
    fn display_date_without_time() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 10, 15, 49, 0).unwrap();
        assert_eq!(format_display_date(Some(ts), false), "10 mar 2021");
    }

    #[test]
    fn display_date_with_time() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 10, 15, 49, 0).unwrap();
        assert_eq!(format_display_date(Some(ts), true), "10 mar 2021, às 15:49");
    }

    #[test]
    fn missing_timestamp_formats_as_empty() {
        assert_eq!(format_display_date(None, false), "");
        assert_eq!(format_display_date(None, true), "");
    }

    #[test]
    fn display_dates_never_contain_articles_or_periods() {
        for month in 1..=12 {
            let ts = Utc.with_ymd_and_hms(2021, month, 10, 8, 5, 0).unwrap();
            let formatted = format_display_date(Some(ts), true);
            assert!(!formatted.contains("de "), "{formatted:?}");
            assert!(!formatted.contains('.'), "{formatted:?}");
        }
    }
}
