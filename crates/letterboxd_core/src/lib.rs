pub mod client;
pub mod dates;
pub mod diary;
pub mod envelope;
pub mod errors;
pub mod extract;
pub mod models;
pub mod resolver;
pub mod session;

pub use client::{ClientOptions, LetterboxdClient, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use diary::diary_form;
pub use envelope::parse_envelope;
pub use errors::{LetterboxdError, Result};
pub use extract::{date_fragments_from_page, film_id_from_page, latest_date, slug_from_url, DateFragments};
pub use models::{DiaryEntry, Envelope, FilmResult};
pub use session::Session;
