//! Colored banner for success / info / warning / error notices.

use crate::notice::{Notice, NoticeLevel};
use egui::{Color32, RichText};

fn colors(level: NoticeLevel) -> (Color32, Color32) {
    match level {
        NoticeLevel::Success => (Color32::from_rgb(212, 237, 218), Color32::from_rgb(21, 87, 36)),
        NoticeLevel::Info => (Color32::from_rgb(209, 236, 241), Color32::from_rgb(12, 84, 96)),
        NoticeLevel::Warning => (Color32::from_rgb(255, 243, 205), Color32::from_rgb(133, 100, 4)),
        NoticeLevel::Error => (Color32::from_rgb(248, 215, 218), Color32::from_rgb(114, 28, 36)),
    }
}

/// Draw a full-width banner.
pub fn show(ui: &mut egui::Ui, notice: &Notice) {
    let (fill, text) = colors(notice.level);
    egui::Frame::none()
        .fill(fill)
        .rounding(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&notice.message).size(13.0).color(text));
        });
    ui.add_space(6.0);
}
