use eframe::egui::{self, Color32, RichText, Ui};

use ftth_viewer::data::views::NetworkSummary;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open results folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(summary_text(&state.views.summary));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// One-line overview of the ONT table.
pub fn summary_text(summary: &NetworkSummary) -> String {
    let counts = format!(
        "{} ONTs: {} OK, {} FAIL, {} DOWN",
        summary.ont_count, summary.ok_count, summary.fail_count, summary.down_count
    );
    match summary.rx_range {
        Some((best, worst, avg)) => format!(
            "{counts}  |  RX best {best:.2} / worst {worst:.2} / avg {avg:.2} dBm"
        ),
        None => counts,
    }
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open FTTH results folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Opening results folder {}", dir.display());
        state.open_dir(dir);
    }
}
