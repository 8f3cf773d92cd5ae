// src/app/mod.rs — query input, one-request session loop, poster workers
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use eframe::egui as eg;
use tracing::warn;

pub mod api;
pub mod cache;
pub mod posters;
pub mod present;
pub mod session;
pub mod types;
pub mod ui;

use crate::app::present::Card;
use crate::app::session::Session;
use crate::app::types::{Completion, Phase, PosterDone, PosterJob};
use crate::config::{load_config, DEFAULT_BACKEND_URL};

// ---- Tunables ----
const POSTER_WORKERS: usize = 4;
const RESIZE_MAX_W: u32 = 342;
const RESIZE_QUALITY: u8 = 80;
const MAX_DONE_PER_FRAME: usize = 8;
const MAX_UPLOADS_PER_FRAME: usize = 4;

pub struct RecoApp {
    // input controller
    query: String,

    // one outstanding request
    session: Session,
    session_tx: Option<Sender<Completion>>,
    session_rx: Option<Receiver<Completion>>,

    // render-safe projection of the last success
    cards: Vec<Card>,

    // poster plumbing
    poster_tx: Option<Sender<PosterJob>>,
    poster_rx: Option<Receiver<PosterDone>>,

    http: Option<Arc<reqwest::blocking::Client>>,
    backend_url: String,

    // one-time init guard
    did_init: bool,
}

impl Default for RecoApp {
    fn default() -> Self {
        Self {
            query: String::new(),

            session: Session::default(),
            session_tx: None,
            session_rx: None,

            cards: Vec::new(),

            poster_tx: None,
            poster_rx: None,

            http: None,
            backend_url: DEFAULT_BACKEND_URL.to_string(),

            did_init: false,
        }
    }
}

impl RecoApp {
    fn init(&mut self) {
        let cfg = load_config();
        self.backend_url = cfg.backend_url;

        let (tx, rx) = mpsc::channel::<Completion>();
        self.session_tx = Some(tx);
        self.session_rx = Some(rx);

        match api::build_client() {
            Ok(c) => self.http = Some(Arc::new(c)),
            Err(e) => warn!("{e}; lookups will fail until restart"),
        }
    }

    /// Single submit path for both the button and the Enter key.
    pub(crate) fn submit(&mut self) {
        // Clearing happens before the request goes out, so the result region
        // never shows stale content next to an in-flight lookup.
        self.cards.clear();
        if let Some((token, title)) = self.session.submit(&self.query) {
            self.start_lookup(token, title);
        }
    }

    fn start_lookup(&mut self, token: u64, title: String) {
        let Some(tx) = self.session_tx.clone() else {
            return;
        };
        let Some(client) = self.http.clone() else {
            // No client means the transport is unusable; report it the same
            // way a failed request would be.
            let _ = self.session.apply(Completion {
                token,
                result: Err(api::FetchError::Transport("no http client".into())),
            });
            return;
        };
        let base_url = self.backend_url.clone();

        std::thread::spawn(move || {
            let result = api::fetch_recommendations(&client, &base_url, &title);
            let _ = tx.send(Completion { token, result });
        });
    }

    /// Drain lookup completions; on an accepted success, map records to cards
    /// and kick off poster downloads.
    fn poll_session(&mut self, ctx: &eg::Context) {
        let mut accepted_success = false;
        let mut seen_any = false;

        if let Some(rx) = &self.session_rx {
            while let Ok(done) = rx.try_recv() {
                seen_any = true;
                if self.session.apply(done) && self.session.phase() == Phase::Success {
                    accepted_success = true;
                }
            }
        }

        if accepted_success {
            self.cards = self
                .session
                .results()
                .iter()
                .map(Card::from_record)
                .collect();
            self.start_poster_fetch(ctx);
        }
        if seen_any {
            ctx.request_repaint();
        }
    }
}

// ========== App impl ==========
impl eframe::App for RecoApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        if !self.did_init {
            self.did_init = true;
            self.init();
        }

        self.poll_session(ctx);
        self.poll_poster_done(ctx);

        // A lookup or poster download may complete while no input arrives;
        // keep frames coming until everything has settled.
        if self.session.phase() == Phase::Loading {
            ctx.request_repaint();
        }

        eg::CentralPanel::default().show(ctx, |ui| {
            self.ui_render_topbar(ui);
            ui.separator();

            // Result region: exactly one of prompt / spinner / error / grid.
            match self.session.phase() {
                Phase::Idle => self.ui_render_idle_prompt(ui),
                Phase::Loading => self.ui_render_loading(ui),
                Phase::Error => self.ui_render_error(ui),
                Phase::Success => {
                    if self.cards.is_empty() {
                        self.ui_render_no_matches(ui);
                    } else {
                        self.ui_render_grid(ui, ctx);
                    }
                }
            }
        });
    }
}
