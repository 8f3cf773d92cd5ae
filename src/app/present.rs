// src/app/present.rs
use std::path::PathBuf;

use eframe::egui::TextureHandle;

use crate::app::types::{PosterState, Recommendation};

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_IMAGE_LABEL: &str = "No Image Available";

const VIDEO_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Trailer links are always derived from the title, never server-supplied.
pub fn trailer_search_url(title: &str) -> String {
    let query = format!("{title} official trailer");
    format!(
        "{VIDEO_SEARCH_URL}?search_query={}",
        urlencoding::encode(&query)
    )
}

/// Render-safe projection of one [`Recommendation`], backing one grid card.
/// The data fields come from `from_record` and never change afterwards; the
/// poster runtime fields (`path`/`tex`/`state`) are driven by the download
/// workers and the paint loop.
pub struct Card {
    pub title: String,
    pub overview: String,
    pub match_label: Option<String>,
    pub trailer_url: String,
    pub poster_url: Option<String>,
    pub path: Option<PathBuf>,
    pub tex: Option<TextureHandle>, // UI thread only
    pub state: PosterState,
}

impl Card {
    pub fn from_record(rec: &Recommendation) -> Self {
        let state = if rec.poster.is_some() {
            PosterState::Pending
        } else {
            PosterState::Failed // renders the placeholder directly
        };
        Self {
            title: rec.title.clone(),
            overview: rec
                .overview
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            match_label: rec.match_label.clone(),
            trailer_url: trailer_search_url(&rec.title),
            poster_url: rec.poster.clone(),
            path: None,
            tex: None,
            state,
        }
    }

    /// True when the "no image" block should be painted instead of artwork.
    pub fn poster_unavailable(&self) -> bool {
        self.poster_url.is_none() || self.state == PosterState::Failed
    }
}
