use std::sync::mpsc::Sender;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Ui};
use reelrows_core::{OverlayView, Row, Thumbnail};

use crate::app_state::Msg;
use crate::images::ImageManager;

const ARROW_WIDTH: f32 = 28.0;
const OVERLAY_WIDTH: f32 = 640.0;

pub fn thumbnail_size(height: f32) -> egui::Vec2 {
    egui::vec2(height * 16.0 / 9.0, height)
}

/// Painter clipped to one thumbnail, so long titles stay inside it.
fn placeholder_painter(ui: &Ui, rect: egui::Rect) -> egui::Painter {
    ui.painter_at(rect)
}

/// Draws one backdrop, or a labelled placeholder while it loads or when there is none.
fn render_thumbnail(
    ui: &mut Ui,
    thumb: &Thumbnail,
    size: egui::Vec2,
    images: &mut ImageManager,
    tx: &Sender<Msg>,
) -> egui::Response {
    if let Some(url) = &thumb.image_url {
        if let Some(tex) = images.texture(url) {
            return ui
                .add(egui::Image::new(tex).fit_to_exact_size(size).rounding(4.0).sense(egui::Sense::click()))
                .on_hover_text(&thumb.alt);
        }
        if !images.has_failed(url) {
            images.request(url, tx, ui.ctx());
        }
    }
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let painter = placeholder_painter(ui, rect);
    painter.rect_filled(rect, 4.0, Color32::from_gray(45));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &thumb.alt,
        FontId::proportional(14.0),
        Color32::LIGHT_GRAY,
    );
    response.on_hover_text(&thumb.alt)
}

/// Heading, arrows and the horizontal strip of one row. Clicking a thumbnail selects it.
pub fn render_row(
    ui: &mut Ui,
    row: &mut Row,
    images: &mut ImageManager,
    image_base: &str,
    thumbnail_height: f32,
    tx: &Sender<Msg>,
) {
    let view = row.view(image_base);
    let size = thumbnail_size(thumbnail_height);
    let mut clicked = None;

    ui.horizontal(|ui| {
        let left = ui.add_enabled(
            row.pager.can_page_left(),
            egui::Button::new(RichText::new("<").size(20.0)).min_size(egui::vec2(ARROW_WIDTH, size.y)),
        );
        if left.clicked() {
            row.pager.page_left();
        }

        let mut area = egui::ScrollArea::horizontal()
            .id_source(("row_strip", view.id.as_str()))
            .auto_shrink([false, true])
            .max_width((ui.available_width() - ARROW_WIDTH - 8.0).max(size.x));
        if let Some(offset) = row.pager.take_jump() {
            area = area.horizontal_scroll_offset(offset);
        }
        let output = area.show(ui, |ui| {
            ui.horizontal(|ui| {
                if view.thumbnails.is_empty() {
                    ui.allocate_exact_size(egui::vec2(size.x, size.y), egui::Sense::hover());
                }
                for (i, thumb) in view.thumbnails.iter().enumerate() {
                    ui.push_id(thumb.key, |ui| {
                        if render_thumbnail(ui, thumb, size, images, tx).clicked() {
                            clicked = Some(i);
                        }
                    });
                }
            });
        });
        row.pager
            .observe(output.state.offset.x, output.inner_rect.width(), output.content_size.x);

        let right = ui.add_enabled(
            row.pager.can_page_right(),
            egui::Button::new(RichText::new(">").size(20.0)).min_size(egui::vec2(ARROW_WIDTH, size.y)),
        );
        if right.clicked() {
            row.pager.page_right();
        }
    });

    if let Some(i) = clicked {
        row.select(i);
    }
}

fn render_overlay_body(ui: &mut Ui, overlay: &OverlayView, images: &mut ImageManager, tx: &Sender<Msg>) -> bool {
    let mut close = false;
    let backdrop = egui::vec2(OVERLAY_WIDTH, OVERLAY_WIDTH * 9.0 / 16.0);
    match overlay.image_url.as_deref() {
        Some(url) => match images.texture(url) {
            Some(tex) => {
                ui.add(egui::Image::new(tex).fit_to_exact_size(backdrop).rounding(6.0));
            }
            None => {
                if !images.has_failed(url) {
                    images.request(url, tx, ui.ctx());
                }
                let (rect, _) = ui.allocate_exact_size(backdrop, egui::Sense::hover());
                ui.painter().rect_filled(rect, 6.0, Color32::from_gray(35));
            }
        },
        None => {
            ui.label(RichText::new("No image available").italics().weak());
        }
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if let Some(date) = &overlay.release_date {
            ui.label(RichText::new(date).strong());
        }
        if let Some(vote) = overlay.vote_average {
            ui.label(RichText::new(format!("★ {:.1}", vote)).color(Color32::GOLD));
        }
    });
    ui.heading(&overlay.title);
    ui.add_space(4.0);
    if overlay.overview.is_empty() {
        ui.label(RichText::new("No overview.").weak());
    } else {
        ui.label(&overlay.overview);
    }
    ui.add_space(8.0);
    if ui.button("Close").clicked() {
        close = true;
    }
    close
}

/// Detail window for the row's selected item; closes on the button, the title bar or Escape.
pub fn render_overlay(
    ctx: &egui::Context,
    row: &mut Row,
    images: &mut ImageManager,
    image_base: &str,
    tx: &Sender<Msg>,
) {
    let Some(overlay) = row.view(image_base).overlay else {
        return;
    };
    let mut open = true;
    let mut close = false;
    egui::Window::new(RichText::new(&overlay.title).strong())
        .id(egui::Id::new(("overlay", row.id())))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(OVERLAY_WIDTH)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            close = render_overlay_body(ui, &overlay, images, tx);
        });
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        close = true;
    }
    if !open || close {
        row.close_overlay();
    }
}
