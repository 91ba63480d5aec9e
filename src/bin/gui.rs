// ADAS Log Finder desktop GUI (eframe/egui).
// Draws the FinderSession model and forwards user events to it.

use anyhow::Result;
use eframe::egui::{self, Align2, ComboBox, Context, TextEdit};
use eframe::{App, Frame, NativeOptions};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use adas_finder::app::{FinderSession, Notice};
use adas_finder::config::FinderConfig;
use adas_finder::models::{Combinator, ATTRIBUTES};

const WINDOW_TITLE: &str = "ADAS DB Finder 0.1";
const CHECKBOX_ROWS: usize = 6;

#[derive(Default)]
struct DialogAction {
    submit: bool,
    cancel: bool,
}

struct GuiApp {
    session: FinderSession,
    cfg: FinderConfig,
    rt: Runtime,
    show_about: bool,
}

impl GuiApp {
    fn new(cfg: FinderConfig, rt: Runtime) -> Self {
        let mut app = Self { session: FinderSession::new(cfg.row_limit), cfg, rt, show_about: false };
        if let Some(path) = app.cfg.database.clone() {
            app.open_path(path);
        }
        app
    }

    fn open_db(&mut self) {
        let dialog = rfd::FileDialog::new()
            .set_title("Open ADAS Database")
            .add_filter("ADAS Database", &["db", "sqlite", "sqlite3"])
            .add_filter("All Files", &["*"]);
        if let Some(path) = dialog.pick_file() {
            self.open_path(path);
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        let rt = &self.rt;
        if let Err(e) = rt.block_on(self.session.open_database(&path)) {
            error!("{:#}", e);
            self.session.notice = Some(Notice::Warning(format!("Failed to open {}: {}", path.display(), e)));
        }
    }

    fn search(&mut self) {
        let rt = &self.rt;
        if let Err(e) = rt.block_on(self.session.search()) {
            self.session.notice = Some(Notice::Warning(format!("{:#}", e)));
        }
    }

    fn save_dialog(&self, title: &str, filter: &str, ext: &str, default_name: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title(title)
            .add_filter(filter, &[ext])
            .add_filter("All Files", &["*"])
            .set_file_name(default_name);
        if let Some(dir) = &self.cfg.export_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }

    fn export_csv(&mut self) {
        if let Some(path) = self.save_dialog("Save Results to CSV", "Comma Separated Values", "csv", "results.csv") {
            if let Err(e) = self.session.export_csv(&path) {
                self.session.status = format!("Failed to export: {}", e);
            }
        }
    }

    fn export_mat(&mut self) {
        if let Some(path) = self.save_dialog("Save Results to Matlab (*.mat) Compatible files", "MATLAB .mat files", "mat", "results.mat") {
            if let Err(e) = self.session.export_mat(&path) {
                self.session.status = format!("Failed to export: {}", e);
            }
        }
    }

    fn ui_menu(&mut self, ctx: &Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Exit").on_hover_text("Exit ADAS Finder...").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.menu_button("Database", |ui| {
                if ui.button("Open").on_hover_text("Open ADAS database...").clicked() {
                    ui.close_menu();
                    self.open_db();
                }
            });
            let enabled = self.session.front_end_enabled();
            ui.add_enabled_ui(enabled, |ui| {
                ui.menu_button("Add Query", |ui| {
                    for a in ATTRIBUTES.iter() {
                        if ui.button(a.display_label()).on_hover_text(a.help).clicked() {
                            ui.close_menu();
                            self.session.open_dialog(a);
                        }
                    }
                });
            });
            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close_menu();
                    self.show_about = true;
                }
            });
        });
    }

    fn ui_query_box(&mut self, ui: &mut egui::Ui) {
        let enabled = self.session.front_end_enabled();
        ui.group(|ui| {
            ui.label("Queries Configurations");
            ui.horizontal(|ui| {
                let sql = self.session.sql_display().to_string();
                ui.add_enabled(
                    enabled,
                    TextEdit::multiline(&mut sql.as_str()).desired_rows(CHECKBOX_ROWS).desired_width(420.0),
                );
                let columns = ATTRIBUTES.len().div_ceil(CHECKBOX_ROWS);
                egui::Grid::new("attribute_grid").num_columns(columns).spacing([10.0, 4.0]).show(ui, |ui| {
                    for row in 0..CHECKBOX_ROWS {
                        for col in 0..columns {
                            let Some(a) = ATTRIBUTES.get(col * CHECKBOX_ROWS + row) else {
                                ui.label("");
                                continue;
                            };
                            let mut checked = self.session.is_checked(a);
                            let resp = ui.add_enabled(enabled, egui::Checkbox::new(&mut checked, a.display_label())).on_hover_text(a.help);
                            if resp.changed() {
                                self.session.toggle_checkbox(a, checked);
                            }
                        }
                        ui.end_row();
                    }
                });
            });
            ui.horizontal(|ui| {
                if ui.add_enabled(enabled, egui::Button::new("Reset")).clicked() {
                    self.session.clear_query();
                }
                if ui.add_enabled(enabled, egui::Button::new("Search")).clicked() {
                    self.search();
                }
            });
        });
    }

    fn ui_result_box(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(format!("Filtered log files ({})", self.session.results().len()));
            let text = self.session.results().join("\n");
            egui::ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                ui.add(TextEdit::multiline(&mut text.as_str()).desired_rows(8).desired_width(f32::INFINITY));
            });
        });
        ui.horizontal(|ui| {
            if ui.button("Clear").clicked() {
                self.session.clear_results();
            }
            let has_results = !self.session.results().is_empty();
            if ui.add_enabled(has_results, egui::Button::new("To CSV")).clicked() {
                self.export_csv();
            }
            if ui.add_enabled(has_results, egui::Button::new("To MAT")).clicked() {
                self.export_mat();
            }
        });
        ui.separator();
        ui.label(&self.session.status);
    }

    fn ui_query_dialog(&mut self, ctx: &Context) {
        let mut action = DialogAction::default();
        let Some(d) = self.session.dialog_mut() else { return };
        let mut open = true;
        egui::Window::new(d.title())
            .id(egui::Id::new("query_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.group(|ui| {
                    ui.label("Query");
                    ui.horizontal(|ui| {
                        ComboBox::from_label("Operator")
                            .selected_text(d.operator.as_str())
                            .show_ui(ui, |ui| {
                                for op in d.operators() {
                                    ui.selectable_value(&mut d.operator, *op, op.as_str());
                                }
                            });
                        ui.label("Values");
                        let resp = ui.add(TextEdit::singleline(&mut d.value).desired_width(140.0));
                        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            action.submit = true;
                        }
                        ComboBox::from_label("Combinator")
                            .selected_text(d.combinator.as_str())
                            .show_ui(ui, |ui| {
                                for c in Combinator::CHOICES {
                                    ui.selectable_value(&mut d.combinator, c, c.as_str());
                                }
                            });
                    });
                });
                ui.group(|ui| {
                    ui.label("Information");
                    ui.label(d.help());
                });
                if let Some(err) = &d.error {
                    ui.colored_label(egui::Color32::RED, err.as_str());
                }
                if ui.button("OK").clicked() {
                    action.submit = true;
                }
            });
        if !open {
            action.cancel = true;
        }
        if action.submit {
            if let Err(e) = self.session.submit_dialog() {
                info!("[Query] rejected: {}", e);
            }
        } else if action.cancel {
            self.session.cancel_dialog();
        }
    }

    fn ui_notice(&mut self, ctx: &Context) {
        let Some(notice) = self.session.notice.clone() else { return };
        let title = match notice {
            Notice::Info(_) => "Information",
            Notice::Warning(_) => "Warning",
        };
        let mut dismiss = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, -60.0])
            .show(ctx, |ui| {
                ui.label(notice.text());
                if ui.button("OK").clicked() {
                    dismiss = true;
                }
            });
        if dismiss {
            self.session.notice = None;
        }
    }

    fn ui_about(&mut self, ctx: &Context) {
        egui::Window::new("About Application")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("ADAS Logfinder v.0.1");
                ui.label("SQLite3 based database finder for ADAS");
                ui.add_space(6.0);
                ui.label("Searches all ADAS related logs within a database. Databases are populated during upload; this tool only reads them.");
                ui.add_space(6.0);
                ui.label("Written using eframe/egui and sqlx.");
            });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let modal_open = self.session.dialog().is_some() || self.session.notice.is_some();
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.ui_menu(ctx, ui));
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                    self.ui_query_box(ui);
                    ui.add_space(6.0);
                    self.ui_result_box(ui);
                });
            });
        });
        self.ui_query_dialog(ctx);
        self.ui_notice(ctx);
        self.ui_about(ctx);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = FinderConfig::from_env()?;
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 500.0]).with_title(WINDOW_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        opts,
        Box::new(|_cc| Ok::<Box<dyn App>, Box<(dyn std::error::Error + Send + Sync + 'static)>>(Box::new(GuiApp::new(cfg, rt)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
