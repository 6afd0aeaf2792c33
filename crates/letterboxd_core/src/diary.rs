use chrono::NaiveDate;
use reqwest::header::COOKIE;

use crate::client::{success_body, LetterboxdClient};
use crate::dates::{format_viewing_date, today};
use crate::envelope::{csrf_token, interpret, parse_json};
use crate::errors::{LetterboxdError, Result};
use crate::extract::{date_fragments_from_page, latest_date};
use crate::models::DiaryEntry;

pub const SAVE_DIARY_ENTRY_PATH: &str = "/s/save-diary-entry";

/// Tags are only sent together with an explicit date.
pub fn diary_form(csrf: &str, entry: &DiaryEntry, today: NaiveDate) -> Vec<(&'static str, String)> {
    let tags = if entry.date.is_some() && !entry.tags.is_empty() {
        format!("[{}]", entry.tags.join(","))
    } else {
        String::new()
    };

    vec![
        ("__csrf", csrf.to_string()),
        ("json", "true".to_string()),
        ("viewingId", String::new()),
        ("filmId", entry.film_id.clone()),
        ("specifiedDate", entry.date.is_some().to_string()),
        ("viewingDateStr", format_viewing_date(entry.date.unwrap_or(today))),
        ("review", String::new()),
        ("tags", tags),
        ("rating", "0".to_string()),
        ("liked", entry.liked.to_string()),
    ]
}

pub fn diary_path(username: &str, slug: &str) -> String {
    format!("/{username}/film/{slug}/diary/")
}

impl LetterboxdClient {
    pub async fn mark_watched(&mut self, entry: &DiaryEntry) -> Result<()> {
        self.require_username()?;
        let url = self.endpoint(SAVE_DIARY_ENTRY_PATH)?;
        let form = diary_form(&self.session.csrf, entry, today());

        log::debug!("saving diary entry for film {}", entry.film_id);
        let response = self
            .http(None)?
            .post(url)
            .header(COOKIE, self.cookie_header()?)
            .form(&form)
            .send()
            .await?;
        let body = success_body(response, LetterboxdError::Diary).await?;

        let json = parse_json(&body)?;
        if let Some(token) = csrf_token(&json) {
            self.session.csrf = token;
        }
        let envelope = interpret(&json);
        if !envelope.success {
            return Err(LetterboxdError::Diary(envelope.message));
        }
        log::info!("logged film {} to the diary", entry.film_id);
        Ok(())
    }

    pub async fn last_logged_date(&self, slug: &str) -> Result<Option<NaiveDate>> {
        let username = self.require_username()?;
        let url = self.endpoint(&diary_path(username, slug))?;

        log::debug!("reading diary page {url}");
        let response = self
            .http(None)?
            .get(url)
            .header(COOKIE, self.cookie_header()?)
            .send()
            .await?;
        let html = success_body(response, LetterboxdError::Diary).await?;

        let fragments = date_fragments_from_page(&html);
        Ok(latest_date(&fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(form: &'a [(&'static str, String)], name: &str) -> &'a str {
        form.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn undated_entry_drops_tags_and_uses_today() {
        let entry = DiaryEntry {
            film_id: "51568".to_string(),
            date: None,
            tags: vec!["rewatch".to_string()],
            liked: false,
        };
        let form = diary_form("token", &entry, day(2025, 2, 1));

        assert_eq!(field(&form, "tags"), "");
        assert_eq!(field(&form, "specifiedDate"), "false");
        assert_eq!(field(&form, "viewingDateStr"), "2025-02-01");
        assert_eq!(field(&form, "liked"), "false");
    }

    #[test]
    fn dated_entry_sends_bracketed_tags() {
        let entry = DiaryEntry {
            film_id: "51568".to_string(),
            date: Some(day(2024, 11, 24)),
            tags: vec!["rewatch".to_string()],
            liked: true,
        };
        let form = diary_form("token", &entry, day(2025, 2, 1));

        assert_eq!(field(&form, "tags"), "[rewatch]");
        assert_eq!(field(&form, "specifiedDate"), "true");
        assert_eq!(field(&form, "viewingDateStr"), "2024-11-24");
        assert_eq!(field(&form, "liked"), "true");
    }

    #[test]
    fn fixed_fields() {
        let mut entry = DiaryEntry::new("7");
        entry.date = Some(day(2024, 1, 1));
        entry.tags = vec!["a".to_string(), "b".to_string()];
        let form = diary_form("token", &entry, day(2024, 1, 2));

        let names: Vec<_> = form.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            names,
            [
                "__csrf",
                "json",
                "viewingId",
                "filmId",
                "specifiedDate",
                "viewingDateStr",
                "review",
                "tags",
                "rating",
                "liked"
            ]
        );
        assert_eq!(field(&form, "__csrf"), "token");
        assert_eq!(field(&form, "json"), "true");
        assert_eq!(field(&form, "viewingId"), "");
        assert_eq!(field(&form, "review"), "");
        assert_eq!(field(&form, "rating"), "0");
        assert_eq!(field(&form, "tags"), "[a,b]");
    }

    #[test]
    fn diary_path_is_per_user() {
        assert_eq!(diary_path("alice", "heat-1995"), "/alice/film/heat-1995/diary/");
    }
}
