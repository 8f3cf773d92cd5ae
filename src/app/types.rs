// src/app/types.rs
use std::path::PathBuf;

use crate::app::api::FetchError;

/// Mutually-exclusive status of the recommendation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PosterState {
    Pending, // queued or downloading
    Cached,  // file present on disk (ready to upload)
    Ready,   // texture uploaded
    Failed,  // no poster URL, or permanent download/decode failure
}

/// One suggested movie as returned by the backend. Every field except the
/// title is optional; defective records degrade at render time instead of
/// failing the response.
#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub poster: Option<String>,
    pub overview: Option<String>,
    pub match_label: Option<String>,
}

/// Outcome of one lookup request, tagged with the token of the `start()`
/// call that issued it.
#[derive(Debug)]
pub struct Completion {
    pub token: u64,
    pub result: Result<Vec<Recommendation>, FetchError>,
}

pub struct PosterDone {
    pub card_idx: usize,
    pub token: u64,
    pub result: Result<PathBuf, String>,
}

// (card_idx, token, url)
pub type PosterJob = (usize, u64, String);
