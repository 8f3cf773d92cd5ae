// src/app/posters.rs
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use eframe::egui as eg;
use tracing::warn;

use crate::app::cache::{
    download_and_store_resized, find_cached_by_key, load_rgba, url_to_cache_key,
};
use crate::app::types::{PosterDone, PosterJob, PosterState};
use crate::app::RecoApp;

impl RecoApp {
    /// Queue poster downloads for the freshly-mapped cards. Jobs and
    /// completions carry the session token, so artwork belonging to a
    /// superseded result set is dropped on arrival.
    pub(crate) fn start_poster_fetch(&mut self, ctx: &eg::Context) {
        let token = self.session.active_token();

        let jobs: Vec<PosterJob> = self
            .cards
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| {
                card.poster_url.as_ref().map(|url| (idx, token, url.clone()))
            })
            .collect();
        if jobs.is_empty() {
            return;
        }

        // Cache hits skip the workers entirely.
        let mut remote: Vec<PosterJob> = Vec::new();
        for (idx, token, url) in jobs {
            let key = url_to_cache_key(&url);
            if let Some(path) = find_cached_by_key(&key) {
                if let Some(card) = self.cards.get_mut(idx) {
                    card.path = Some(path);
                    card.state = PosterState::Cached;
                }
            } else {
                remote.push((idx, token, url));
            }
        }
        if remote.is_empty() {
            ctx.request_repaint();
            return;
        }

        self.ensure_poster_workers();
        if let Some(tx) = &self.poster_tx {
            for job in remote {
                let _ = tx.send(job);
            }
        }
        ctx.request_repaint();
    }

    /// Spin up the worker pool on first use. Workers live for the lifetime of
    /// the app and pull jobs off a shared channel.
    fn ensure_poster_workers(&mut self) {
        if self.poster_tx.is_some() {
            return;
        }
        let Some(client) = self.http.clone() else {
            return;
        };

        let (work_tx, work_rx) = mpsc::channel::<PosterJob>();
        let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
        self.poster_tx = Some(work_tx);
        self.poster_rx = Some(done_rx);

        let work_rx = Arc::new(Mutex::new(work_rx));

        for _ in 0..super::POSTER_WORKERS {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);

            std::thread::spawn(move || loop {
                let job = {
                    let rx = work_rx.lock().unwrap();
                    rx.recv()
                };
                let (card_idx, token, url) = match job {
                    Ok(t) => t,
                    Err(_) => break,
                };

                let key = url_to_cache_key(&url);
                let result = download_and_store_resized(
                    &client,
                    &url,
                    &key,
                    super::RESIZE_MAX_W,
                    super::RESIZE_QUALITY,
                );

                let _ = done_tx.send(PosterDone {
                    card_idx,
                    token,
                    result,
                });
            });
        }
    }

    /// Drain poster completions (bounded per frame) and mark cards
    /// cached/failed. Stale completions are silently dropped.
    pub(crate) fn poll_poster_done(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;
        let active_token = self.session.active_token();

        while drained < super::MAX_DONE_PER_FRAME {
            let Some(rx) = &self.poster_rx else {
                break;
            };
            match rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    if msg.token != active_token {
                        continue; // artwork for a superseded result set
                    }
                    if let Some(card) = self.cards.get_mut(msg.card_idx) {
                        match msg.result {
                            Ok(path) => {
                                card.path = Some(path);
                                card.state = PosterState::Cached; // uploaded lazily during paint
                            }
                            Err(e) => {
                                warn!("poster fetch failed: {} — {}", card.title, e);
                                card.state = PosterState::Failed;
                            }
                        }
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        if drained > 0 {
            ctx.request_repaint();
        }
    }

    /// Upload the texture for one card if its cached file is ready.
    /// Returns true if a texture was uploaded this call.
    pub(crate) fn try_lazy_upload_card(&mut self, ctx: &eg::Context, idx: usize) -> bool {
        let Some(card) = self.cards.get_mut(idx) else {
            return false;
        };
        if card.tex.is_some() || !matches!(card.state, PosterState::Cached) {
            return false;
        }
        let Some(path) = card.path.clone() else {
            return false;
        };

        match load_rgba(&path.to_string_lossy()) {
            Ok((w, h, bytes)) => {
                let img = eg::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &bytes);
                let name = card
                    .poster_url
                    .as_deref()
                    .map(url_to_cache_key)
                    .unwrap_or_else(|| card.title.clone());
                card.tex = Some(ctx.load_texture(name, img, eg::TextureOptions::LINEAR));
                card.state = PosterState::Ready;
                true
            }
            Err(e) => {
                warn!("poster decode failed: {} — {}", card.title, e);
                card.state = PosterState::Failed;
                false
            }
        }
    }
}
