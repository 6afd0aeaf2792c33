use crate::client::LetterboxdClient;
use crate::errors::{LetterboxdError, Result};
use crate::extract::{film_id_from_page, slug_from_url};
use crate::models::FilmResult;

impl LetterboxdClient {
    pub async fn resolve_by_external_id(&self, tmdb_id: u64) -> Result<FilmResult> {
        let url = self.endpoint(&format!("/tmdb/{tmdb_id}"))?;
        log::debug!("resolving tmdb id {tmdb_id} via {url}");

        let response = self.http(None)?.get(url).send().await?;
        let landing = response.url().clone();
        let slug = slug_from_url(&landing).ok_or_else(|| {
            LetterboxdError::Resolution(format!(
                "tmdb id {tmdb_id} has no film (landed on {landing})"
            ))
        })?;

        let html = response.text().await?;
        let film_id = film_id_from_page(&html, &slug)?;
        log::debug!("tmdb id {tmdb_id} is {slug} ({film_id})");
        Ok(FilmResult::new(slug, film_id))
    }
}
