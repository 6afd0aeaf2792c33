use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::dates::parse_diary_date;
use crate::errors::{LetterboxdError, Result};

lazy_static! {
    static ref FILM_PATH: Regex = Regex::new(r"^/film/([^/]+)/").unwrap();
    static ref SLUG_CONTAINER: Selector = Selector::parse("div[data-film-slug]").unwrap();
    static ref ITEM_LINK_CONTAINER: Selector = Selector::parse("div[data-item-link]").unwrap();
    static ref MONTH_FRAGMENT: Selector = Selector::parse(r#"a[class*="month"]"#).unwrap();
    // "date" also matches the "daydate" class used by newer diary rows.
    static ref DAY_FRAGMENT: Selector = Selector::parse(r#"a[class*="date"]"#).unwrap();
    static ref YEAR_FRAGMENT: Selector = Selector::parse(r#"a[class*="year"]"#).unwrap();
}

const FILM_ID_ATTR: &str = "data-film-id";

pub fn slug_from_url(url: &Url) -> Option<String> {
    FILM_PATH
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|slug| slug.as_str().to_string())
        .filter(|slug| !slug.is_empty())
}

/// Film pages tag the id container either with `data-film-slug` or with
/// `data-item-link="/film/<slug>/"`; the former wins when both exist.
pub fn film_id_from_page(html: &str, slug: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let item_link = format!("/film/{slug}/");

    let container = find_by_attr(&document, &SLUG_CONTAINER, "data-film-slug", slug)
        .or_else(|| find_by_attr(&document, &ITEM_LINK_CONTAINER, "data-item-link", &item_link))
        .ok_or_else(|| {
            LetterboxdError::Resolution(format!(
                "no element carrying the film id was found for '{slug}'"
            ))
        })?;

    container
        .value()
        .attr(FILM_ID_ATTR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            LetterboxdError::Resolution(format!("{FILM_ID_ATTR} attribute is empty for '{slug}'"))
        })
}

fn find_by_attr<'a>(
    document: &'a Html,
    selector: &Selector,
    attr: &str,
    expected: &str,
) -> Option<ElementRef<'a>> {
    document
        .select(selector)
        .find(|element| element.value().attr(attr) == Some(expected))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFragments {
    pub months: Vec<String>,
    pub days: Vec<String>,
    pub years: Vec<String>,
}

pub fn date_fragments_from_page(html: &str) -> DateFragments {
    let document = Html::parse_document(html);
    DateFragments {
        months: fragment_texts(&document, &MONTH_FRAGMENT),
        days: fragment_texts(&document, &DAY_FRAGMENT),
        years: fragment_texts(&document, &YEAR_FRAGMENT),
    }
}

fn fragment_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

pub fn latest_date(fragments: &DateFragments) -> Option<NaiveDate> {
    fragments
        .months
        .iter()
        .zip(&fragments.days)
        .zip(&fragments.years)
        .filter(|((month, day), year)| !month.is_empty() && !day.is_empty() && !year.is_empty())
        .filter_map(|((month, day), year)| parse_diary_date(day, month, year))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn fragments(months: &[&str], days: &[&str], years: &[&str]) -> DateFragments {
        DateFragments {
            months: owned(months),
            days: owned(days),
            years: owned(years),
        }
    }

    #[test]
    fn slug_is_taken_from_film_path() {
        let url = Url::parse("https://letterboxd.com/film/example-film/").unwrap();
        assert_eq!(slug_from_url(&url).as_deref(), Some("example-film"));

        let url = Url::parse("https://letterboxd.com/film/example-film/crew/").unwrap();
        assert_eq!(slug_from_url(&url).as_deref(), Some("example-film"));
    }

    #[test]
    fn non_film_urls_have_no_slug() {
        for raw in [
            "https://letterboxd.com/tmdb/0",
            "https://letterboxd.com/",
            "https://letterboxd.com/search/film/",
            "https://letterboxd.com/film/no-trailing-slash",
        ] {
            let url = Url::parse(raw).unwrap();
            assert_eq!(slug_from_url(&url), None, "{raw}");
        }
    }

    #[test]
    fn film_id_prefers_slug_container() {
        let html = r#"
            <div data-item-link="/film/example-film/" data-film-id="999"></div>
            <div class="film-poster" data-film-slug="example-film" data-film-id="123"></div>
        "#;
        assert_eq!(film_id_from_page(html, "example-film").unwrap(), "123");
    }

    #[test]
    fn film_id_falls_back_to_item_link_container() {
        let html = r#"
            <div data-film-slug="another-film" data-film-id="1"></div>
            <div class="react-component" data-item-link="/film/example-film/" data-film-id="456"></div>
        "#;
        assert_eq!(film_id_from_page(html, "example-film").unwrap(), "456");
    }

    #[test]
    fn film_id_missing_container_or_attribute() {
        let err = film_id_from_page("<p>nothing here</p>", "example-film").unwrap_err();
        assert!(matches!(err, LetterboxdError::Resolution(_)));

        let html = r#"<div data-film-slug="example-film" data-film-id=""></div>"#;
        let err = film_id_from_page(html, "example-film").unwrap_err();
        assert!(err.to_string().contains("data-film-id"));
    }

    #[test]
    fn date_fragments_are_collected_per_marker() {
        let html = r#"
            <table><tr>
              <td><a class="month" href="/u/films/diary/for/2024/11/">Nov</a>
                  <a class="year" href="/u/films/diary/for/2024/">2024</a></td>
              <td><a class="daydate" href="/u/film/x/1/"> 24 </a></td>
            </tr></table>
        "#;
        let parsed = date_fragments_from_page(html);
        assert_eq!(parsed, fragments(&["Nov"], &["24"], &["2024"]));
    }

    #[test]
    fn latest_date_picks_most_recent_row() {
        let parsed = fragments(&["Nov", "Jan"], &["24", "3"], &["2024", "2025"]);
        assert_eq!(latest_date(&parsed), NaiveDate::from_ymd_opt(2025, 1, 3));
    }

    #[test]
    fn latest_date_single_row() {
        let parsed = fragments(&["Nov"], &["24"], &["2024"]);
        assert_eq!(latest_date(&parsed), NaiveDate::from_ymd_opt(2024, 11, 24));
    }

    #[test]
    fn latest_date_empty_or_mismatched() {
        assert_eq!(latest_date(&DateFragments::default()), None);
        assert_eq!(latest_date(&fragments(&["Nov"], &[], &["2024"])), None);
        // only the first row has all three parts
        let parsed = fragments(&["Nov", "Dec"], &["24"], &["2024", "2024"]);
        assert_eq!(latest_date(&parsed), NaiveDate::from_ymd_opt(2024, 11, 24));
    }

    #[test]
    fn latest_date_skips_unparseable_rows() {
        let parsed = fragments(&["Smarch", "Nov", ""], &["1", "24", "2"], &["2024", "2024", "2024"]);
        assert_eq!(latest_date(&parsed), NaiveDate::from_ymd_opt(2024, 11, 24));
    }
}
