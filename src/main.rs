use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};

use eframe::egui::{self, RichText};
use reelrows_core::{
    CatalogClient, CategoryFeed, FetchOutcome, FetchTicket, GENRES, Row, default_feeds, discover_by_genre, run_fetch,
};

mod app_state;
mod config;
mod images;
mod logger;
mod ui;

use app_state::Msg;
use config::Config;
use images::ImageManager;

const BROWSE_ROW_ID: &str = "browse";

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    let logging = logger::init();
    let config = config::load();

    let client = match CatalogClient::new(config.catalog()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!(error = %e, "cannot create catalog client");
            eprintln!("reelrows: {e}");
            drop(logging);
            std::process::exit(1);
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_title("ReelRows")
        .with_inner_size([1280.0, 860.0]);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let result = eframe::run_native(
        "ReelRows",
        options,
        Box::new(move |cc| Box::new(ReelRows::new(cc, config, client))),
    );
    drop(logging);
    result
}

struct ReelRows {
    config: Config,
    client: Arc<CatalogClient>,
    rows: Vec<Row>,
    browse_genre: u32,
    images: ImageManager,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,
}

impl ReelRows {
    fn new(cc: &eframe::CreationContext<'_>, config: Config, client: Arc<CatalogClient>) -> Self {
        let ctx = &cc.egui_ctx;
        ctx.set_visuals(egui::Visuals::dark());
        if (config.font_scale - 1.0).abs() > f32::EPSILON {
            let mut style = (*ctx.style()).clone();
            for font in style.text_styles.values_mut() {
                font.size *= config.font_scale;
            }
            ctx.set_style(style);
        }

        let (browse_genre, _) = GENRES[0];
        let mut feeds = default_feeds();
        feeds.push(CategoryFeed::new(BROWSE_ROW_ID, "Browse by Genre", discover_by_genre(browse_genre)));

        let (tx, rx) = app_state::channel();
        let images = ImageManager::new(
            reqwest::Client::new(),
            config.image_parallel as usize,
            config.texture_cache_limit as usize,
        );
        let mut app = Self {
            config,
            client,
            rows: feeds.into_iter().map(Row::new).collect(),
            browse_genre,
            images,
            tx,
            rx,
        };

        let tickets: Vec<FetchTicket> = app.rows.iter_mut().filter_map(Row::mount).collect();
        for ticket in tickets {
            app.spawn_fetch(ticket, ctx);
        }
        app
    }

    fn spawn_fetch(&self, ticket: FetchTicket, ctx: &egui::Context) {
        tracing::debug!(row = %ticket.row_id, path = %ticket.path, "spawning feed fetch");
        let client = self.client.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let (ticket, result) = run_fetch(client.as_ref(), ticket).await;
            let _ = tx.send(Msg::FeedLoaded { ticket, result });
            ctx.request_repaint();
        });
    }

    fn process_messages(&mut self, ctx: &egui::Context) {
        for msg in app_state::drain(&self.rx) {
            match msg {
                Msg::FeedLoaded { ticket, result } => {
                    let Some(row) = self.rows.iter_mut().find(|r| r.id() == ticket.row_id) else {
                        tracing::debug!(row = %ticket.row_id, "result for unknown row");
                        continue;
                    };
                    if let FetchOutcome::Applied { .. } = row.apply(&ticket, result) {
                        row.pager.reset();
                    }
                }
                Msg::CoverDecoded { url, rgba, w, h } => self.images.on_decoded(ctx, url, &rgba, w, h),
                Msg::CoverFailed { url, error } => self.images.on_failed(url, &error),
            }
        }
    }

    fn set_browse_genre(&mut self, genre: u32, ctx: &egui::Context) {
        self.browse_genre = genre;
        let ticket = self
            .rows
            .iter_mut()
            .find(|r| r.id() == BROWSE_ROW_ID)
            .and_then(|row| row.set_path(discover_by_genre(genre)));
        if let Some(ticket) = ticket {
            self.spawn_fetch(ticket, ctx);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("ReelRows").strong().color(egui::Color32::from_rgb(229, 9, 20)));
                if self.config.api_key.is_empty() {
                    ui.label(
                        RichText::new(format!(
                            "No API key configured: set {} or edit {}",
                            config::API_KEY_ENV,
                            config::config_file_path().display()
                        ))
                        .color(egui::Color32::YELLOW),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let loading = self.images.loading_count();
                    if loading > 0 {
                        ui.spinner();
                        ui.label(RichText::new(format!("{loading} images")).weak());
                    }
                });
            });
        });
    }
}

impl eframe::App for ReelRows {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_messages(ctx);
        self.render_top_bar(ctx);

        let mut picked_genre = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_source("rows").show(ui, |ui| {
                for row in self.rows.iter_mut() {
                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        ui.heading(row.title());
                        if row.id() == BROWSE_ROW_ID {
                            let current = GENRES
                                .iter()
                                .find(|(code, _)| *code == self.browse_genre)
                                .map(|(_, name)| *name)
                                .unwrap_or_default();
                            egui::ComboBox::from_id_source("browse_genre")
                                .selected_text(current)
                                .show_ui(ui, |ui| {
                                    for (code, name) in GENRES {
                                        if ui.selectable_label(*code == self.browse_genre, *name).clicked() {
                                            picked_genre = Some(*code);
                                        }
                                    }
                                });
                        }
                    });
                    ui::render_row(
                        ui,
                        row,
                        &mut self.images,
                        &self.config.image_base,
                        self.config.thumbnail_height,
                        &self.tx,
                    );
                }
            });
        });

        for row in self.rows.iter_mut() {
            if row.overlay_open() {
                ui::render_overlay(ctx, row, &mut self.images, &self.config.image_base, &self.tx);
            }
        }

        if let Some(genre) = picked_genre.filter(|g| *g != self.browse_genre) {
            self.set_browse_genre(genre, ctx);
        }
    }
}
