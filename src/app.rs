use crate::advisor::{protocol, AdvisorClient};
use crate::catalog::{Catalog, CatalogView, Product, ProductFilter};
use crate::chat::ChatController;
use crate::event::AppEvent;
use crate::session::store::StateStore;
use crate::session::Role;
use crate::shelf::Shelf;
use crate::theme::Theme;
use crate::typewriter::Typewriter;
use eframe::egui::{self, RichText, ScrollArea};
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub struct ShelfieApp {
    rx: Receiver<AppEvent>,
    advisor: AdvisorClient,
    catalog: Catalog,
    filter: ProductFilter,
    view: CatalogView,
    shelf: Shelf,
    chat: ChatController,
    store: StateStore,
    input_buffer: String,
    typewriter: Option<Typewriter>,
    next_reveal: Option<Instant>,
    markdown: CommonMarkCache,
    theme: Theme,
    rtl: bool,
    diagnostics_log: Vec<String>,
    scroll_to_bottom: bool,
    style_applied: bool,
}

impl ShelfieApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        advisor: AdvisorClient,
        catalog: Catalog,
        store: StateStore,
        rtl: bool,
    ) -> Self {
        let (selection, selection_warning) = store.load_selection();
        let (transcript, transcript_warning) = store.load_transcript();
        let view = CatalogView::new(&catalog);

        let mut app = Self {
            rx,
            advisor,
            catalog,
            filter: ProductFilter::default(),
            view,
            shelf: Shelf::from_items(selection),
            chat: ChatController::from_transcript(transcript),
            store,
            input_buffer: String::new(),
            typewriter: None,
            next_reveal: None,
            markdown: CommonMarkCache::default(),
            theme: Theme::default(),
            rtl,
            diagnostics_log: Vec::new(),
            scroll_to_bottom: true,
            style_applied: false,
        };

        for warning in [selection_warning, transcript_warning].into_iter().flatten() {
            app.log_diagnostic(warning);
        }

        app
    }

    /// Input stays disabled from submission until the reveal animation
    /// has finished, not just until the reply arrives.
    fn busy(&self) -> bool {
        self.chat.is_awaiting() || self.typewriter.is_some()
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message));
    }

    fn persist_selection(&mut self) {
        if let Err(err) = self.store.save_selection(self.shelf.items()) {
            self.log_diagnostic(format!("failed to persist selection: {err}"));
        }
    }

    fn persist_transcript(&mut self) {
        if let Err(err) = self.store.save_transcript(self.chat.transcript()) {
            self.log_diagnostic(format!("failed to persist transcript: {err}"));
        }
    }

    fn dispatch_request(&self) {
        let request =
            protocol::build_request(self.advisor.model(), &self.catalog, self.chat.transcript());
        self.advisor.send(request);
    }

    fn submit_message(&mut self) {
        if self.chat.try_begin_user_turn(&self.input_buffer).is_none() {
            return;
        }
        self.input_buffer.clear();
        self.persist_transcript();
        self.dispatch_request();
        self.scroll_to_bottom = true;
    }

    fn generate_routine(&mut self) {
        if self.chat.try_begin_routine_turn(&self.shelf).is_some() {
            self.persist_transcript();
            self.dispatch_request();
        }
        self.scroll_to_bottom = true;
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: &egui::Context) {
        match event {
            AppEvent::AdvisorReply(reply) => {
                if self.chat.complete_turn(reply.clone()) {
                    self.persist_transcript();
                    self.typewriter = Some(Typewriter::new(reply));
                    self.next_reveal = Some(Instant::now());
                    self.scroll_to_bottom = true;
                    ctx.request_repaint();
                }
            }
            AppEvent::AdvisorFailed(message) => {
                self.log_diagnostic(message);
                self.chat.fail_turn();
                self.scroll_to_bottom = true;
                ctx.request_repaint();
            }
        }
    }

    fn advance_typewriter(&mut self, ctx: &egui::Context) {
        let Some(typewriter) = self.typewriter.as_mut() else {
            return;
        };
        let deadline = self.next_reveal.unwrap_or_else(Instant::now);
        let now = Instant::now();

        if now < deadline {
            ctx.request_repaint_after(deadline - now);
            return;
        }

        match typewriter.advance() {
            Some(delay) => {
                self.next_reveal = Some(now + delay);
                self.scroll_to_bottom = true;
                ctx.request_repaint_after(delay);
            }
            None => {
                self.typewriter = None;
                self.next_reveal = None;
                self.scroll_to_bottom = true;
                ctx.request_repaint();
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let (status_label, status_color) = if self.chat.is_awaiting() {
            ("Advisor thinking...", self.theme.warning)
        } else if self.typewriter.is_some() {
            ("Replying...", self.theme.warning)
        } else {
            ("Ready", self.theme.success)
        };

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Shelfie");
                ui.separator();
                ui.label(RichText::new(status_label).color(status_color));
                ui.separator();
                ui.label(
                    RichText::new(format!("{} on the shelf", self.shelf.len()))
                        .color(self.theme.text_muted),
                );
                if self.rtl {
                    ui.separator();
                    ui.label(RichText::new("RTL").color(self.theme.text_muted));
                }
            });
        });
    }

    fn render_catalog_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("catalog_panel")
            .resizable(true)
            .default_width(330.0)
            .show(ctx, |ui| {
                ui.heading("Products");

                let mut filter_changed = false;
                let selected_label = self
                    .filter
                    .category
                    .clone()
                    .unwrap_or_else(|| "All categories".to_string());
                egui::ComboBox::from_id_salt("category_filter")
                    .selected_text(selected_label)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_value(&mut self.filter.category, None, "All categories")
                            .changed()
                        {
                            filter_changed = true;
                        }
                        for category in self.catalog.categories() {
                            if ui
                                .selectable_value(
                                    &mut self.filter.category,
                                    Some(category.clone()),
                                    &category,
                                )
                                .changed()
                            {
                                filter_changed = true;
                            }
                        }
                    });

                let search_response = ui.add(
                    egui::TextEdit::singleline(&mut self.filter.search)
                        .hint_text("Search products")
                        .desired_width(f32::INFINITY),
                );
                if search_response.changed() {
                    filter_changed = true;
                }
                if filter_changed {
                    self.view.refilter(&self.catalog, &self.filter);
                }

                ui.separator();
                ScrollArea::vertical().id_salt("product_list").show(ui, |ui| {
                    if self.view.is_empty_result() {
                        ui.label(
                            RichText::new(
                                "No products found matching your search criteria. \
                                 Try adjusting your filters.",
                            )
                            .color(self.theme.text_muted)
                            .italics(),
                        );
                        return;
                    }

                    let mut toggled: Option<Product> = None;
                    for product in self.view.visible() {
                        let selected = self.shelf.contains(&product.id);
                        let response = ui
                            .selectable_label(
                                selected,
                                format!("{}\n{}", product.name, product.brand),
                            )
                            .on_hover_text(&product.description);
                        if response.clicked() {
                            toggled = Some(product.clone());
                        }
                    }
                    if let Some(product) = toggled {
                        self.shelf.toggle(&product);
                        self.persist_selection();
                    }

                    if self.view.has_overflow() {
                        let label = if self.view.showing_all() {
                            "Show fewer products"
                        } else {
                            "Show more products"
                        };
                        if ui.button(label).clicked() {
                            self.view.toggle_show_all();
                        }
                    }
                });
            });
    }

    fn render_shelf_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("shelf_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Your Shelf");
                ui.separator();

                if self.shelf.is_empty() {
                    ui.label(
                        RichText::new("No products selected")
                            .color(self.theme.text_muted)
                            .italics(),
                    );
                } else {
                    let mut removed: Option<String> = None;
                    for item in self.shelf.items() {
                        ui.horizontal(|ui| {
                            if ui.small_button("x").clicked() {
                                removed = Some(item.id.clone());
                            }
                            ui.label(format!("{} - {}", item.name, item.brand));
                        });
                    }
                    if let Some(product_id) = removed {
                        self.shelf.remove(&product_id);
                        self.persist_selection();
                    }
                }

                ui.separator();
                let busy = self.busy();
                if ui
                    .add_enabled(!busy, egui::Button::new("Generate Routine"))
                    .clicked()
                {
                    self.generate_routine();
                }
                if ui
                    .add_enabled(!self.shelf.is_empty(), egui::Button::new("Clear All"))
                    .clicked()
                {
                    self.shelf.clear();
                    self.persist_selection();
                }
            });
    }

    fn render_chat_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Routine Advisor");
            ui.separator();

            let transcript_height = (ui.available_height() - 150.0).max(120.0);
            let align = if self.rtl {
                egui::Align::Max
            } else {
                egui::Align::Min
            };

            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .max_height(transcript_height)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(align), |ui| {
                        let last_assistant = self
                            .chat
                            .transcript()
                            .iter()
                            .rposition(|message| message.role == Role::Assistant);

                        for (index, message) in self.chat.transcript().iter().enumerate() {
                            match message.role {
                                Role::User => {
                                    ui.label(
                                        RichText::new("You")
                                            .strong()
                                            .color(self.theme.accent_primary),
                                    );
                                    ui.label(&message.content);
                                }
                                Role::Assistant => {
                                    ui.label(
                                        RichText::new("Advisor")
                                            .strong()
                                            .color(self.theme.accent_muted),
                                    );
                                    let animating =
                                        Some(index) == last_assistant && self.typewriter.is_some();
                                    self.theme.card_frame().show(ui, |ui| {
                                        if animating {
                                            if let Some(typewriter) = &self.typewriter {
                                                CommonMarkViewer::new().show(
                                                    ui,
                                                    &mut self.markdown,
                                                    typewriter.visible(),
                                                );
                                            }
                                        } else {
                                            CommonMarkViewer::new().show(
                                                ui,
                                                &mut self.markdown,
                                                &message.content,
                                            );
                                        }
                                    });
                                }
                            }
                            ui.add_space(self.theme.spacing_8);
                        }

                        if self.chat.is_awaiting() {
                            ui.label(
                                RichText::new("Thinking...")
                                    .italics()
                                    .color(self.theme.text_muted),
                            );
                        }
                        if let Some(error) = self.chat.error_line() {
                            ui.label(RichText::new(error).color(self.theme.danger));
                        }
                        if let Some(notice) = self.chat.notice() {
                            ui.label(RichText::new(notice).color(self.theme.warning));
                        }

                        if self.scroll_to_bottom {
                            ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                        }
                    });
                });
            self.scroll_to_bottom = false;

            ui.separator();
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(80.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(entry);
                            }
                        });
                });

            ui.separator();
            let busy = self.busy();
            let hint = if busy {
                "Waiting for the advisor..."
            } else {
                "Ask about products or routines..."
            };

            let mut send_now = false;
            self.theme.composer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.input_buffer)
                            .desired_width(ui.available_width() - 70.0)
                            .hint_text(hint),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                    }

                    let clicked = ui
                        .add_enabled(
                            !busy && !self.input_buffer.trim().is_empty(),
                            egui::Button::new("Send"),
                        )
                        .clicked();
                    send_now |= clicked;
                });
            });

            if send_now && !busy {
                self.submit_message();
            }
        });
    }
}

impl eframe::App for ShelfieApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_applied {
            self.theme.apply_visuals(ctx);
            self.style_applied = true;
        }

        self.drain_events(ctx);
        self.advance_typewriter(ctx);

        if self.chat.is_awaiting() {
            ctx.request_repaint_after(Duration::from_millis(120));
        }

        self.render_top_bar(ctx);
        self.render_catalog_panel(ctx);
        self.render_shelf_panel(ctx);
        self.render_chat_panel(ctx);
    }
}
