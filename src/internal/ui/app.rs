use anyhow::Result;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Frame;

use crate::api::{LoadedManifest, ManifestLoader, ManifestSource};
use crate::config::AppConfig;
use crate::internal::anchors::{AnchorOutcome, AnchorScroller, Link, ScrollAnimation};
use crate::internal::catalog::CatalogView;
use crate::internal::notification::Notice;
use crate::internal::theme::{PreferenceStore, ThemeController};
use crate::internal::ui::sort::SortMode;
use crate::internal::ui::view::{self, PageInput, PageLayout};
use crate::utils::palette::TuiTheme;
use crate::utils::url::join_url;

/// Input modes for the UI.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Search,
}

/// Messages delivered to the event loop from background tasks.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ManifestLoaded(LoadedManifest),
    /// The start-up chain died before a manifest arrived.
    BootstrapFailed(String),
}

pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub input_mode: InputMode,
    pub theme: ThemeController,
    pub palette: TuiTheme,
    pub nav_links: Vec<Link>,
    pub anchors: AnchorScroller,
    pub catalog: CatalogView,
    pub manifest_source: Option<ManifestSource>,
    pub loading: bool,
    pub selected: Option<usize>,
    pub scroll: u16,
    pub scroll_animation: Option<ScrollAnimation>,
    pub page_width: u16,
    pub viewport_height: u16,
    pub notice: Option<Notice>,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    /// Build the application state: theme first, then anchor interception.
    /// No network traffic happens here; see [`App::bootstrap`].
    #[tracing::instrument(skip(config, store))]
    pub fn new(config: AppConfig, store: Box<dyn PreferenceStore>) -> Self {
        let start = Instant::now();
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let theme = ThemeController::init(store);
        let palette = TuiTheme::for_theme(theme.theme());

        let nav_links = view::nav_links();
        let anchors = AnchorScroller::register(&nav_links);

        let sort_mode = SortMode::from_token(&config.default_sort);
        let catalog = CatalogView::with_prefix(Vec::new(), sort_mode, &config.pages_prefix);

        tracing::info!(elapsed = ?start.elapsed(), "App initialized");

        Self {
            running: true,
            config,
            input_mode: InputMode::Normal,
            theme,
            palette,
            nav_links,
            anchors,
            catalog,
            manifest_source: None,
            loading: true,
            selected: None,
            scroll: 0,
            scroll_animation: None,
            page_width: 80,
            viewport_height: 20,
            notice: None,
            action_tx,
            action_rx,
        }
    }

    /// Full start-up sequence: state from [`App::new`], then the manifest
    /// fetch on the runtime. Must be called inside a tokio runtime.
    pub fn bootstrap(config: AppConfig, store: Box<dyn PreferenceStore>) -> Self {
        let app = Self::new(config, store);
        app.spawn_manifest_load();
        app
    }

    /// Fetch the manifest in the background and post the result as an
    /// [`Action`]. A panicking fetch surfaces as `BootstrapFailed`.
    pub fn spawn_manifest_load(&self) {
        let loader = ManifestLoader::from_config(&self.config);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { loader.load().await });
            let action = match fetch.await {
                Ok(manifest) => Action::ManifestLoaded(manifest),
                Err(e) => Action::BootstrapFailed(e.to_string()),
            };
            let _ = tx.send(action);
        });
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            self.tick(Instant::now());

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
            }

            if !self.running {
                break;
            }
        }
        Ok(())
    }

    /// Advance time-driven state: scroll animation and notice expiry.
    pub fn tick(&mut self, now: Instant) {
        if let Some(anim) = &self.scroll_animation {
            self.scroll = anim.offset_at(now);
            if anim.is_finished(now) {
                self.scroll_animation = None;
            }
        }

        if let Some(notice) = &self.notice
            && notice.is_expired(now)
        {
            self.notice = None;
        }
    }

    #[tracing::instrument(skip(self, action))]
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.running = false;
            }
            Action::ManifestLoaded(manifest) => {
                let count = manifest.pages.len();
                self.notice = Some(match &manifest.source {
                    ManifestSource::Remote => Notice::info(format!("Loaded {} guides", count)),
                    ManifestSource::Fallback { .. } => {
                        Notice::warning(format!("Using built-in catalog ({} guides)", count))
                    }
                });
                self.install_catalog(manifest.pages);
                self.manifest_source = Some(manifest.source);
            }
            Action::BootstrapFailed(msg) => {
                tracing::error!(error = %msg, "Start-up failed; showing empty state");
                self.install_catalog(Vec::new());
            }
        }
    }

    fn install_catalog(&mut self, pages: Vec<crate::internal::models::PageDescriptor>) {
        let search = self.catalog.search_text().to_string();
        self.catalog =
            CatalogView::with_prefix(pages, self.catalog.sort_mode(), &self.config.pages_prefix);
        self.catalog.set_search(search);
        self.loading = false;
        self.clamp_selection();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Search => self.handle_search_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                let mut text = self.catalog.search_text().to_string();
                text.push(c);
                self.set_search(text);
            }
            KeyCode::Backspace => {
                let mut text = self.catalog.search_text().to_string();
                text.pop();
                self.set_search(text);
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.set_search(String::new());
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Quit);
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('s') => {
                self.cycle_sort_mode();
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                self.activate_link(index, Instant::now());
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::PageDown => self.scroll_by(i32::from(self.viewport_height.max(1))),
            KeyCode::PageUp => self.scroll_by(-i32::from(self.viewport_height.max(1))),
            KeyCode::Home => {
                self.scroll_animation = None;
                self.scroll = 0;
            }
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    pub fn set_search(&mut self, text: String) {
        self.catalog.set_search(text);
        self.clamp_selection();
    }

    pub fn cycle_sort_mode(&mut self) {
        let next = self.catalog.sort_mode().next();
        self.catalog.set_sort_mode(next);
        self.clamp_selection();
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.theme.toggle();
        self.palette = TuiTheme::for_theme(theme);
        let suffix = match self.theme.is_persistent() {
            true => "",
            false => " (this session only)",
        };
        self.notice = Some(Notice::info(format!("Theme: {}{}", theme, suffix)));
    }

    /// Activate the `index`-th navigation link as if it had been clicked.
    pub fn activate_link(&mut self, index: usize, now: Instant) -> Option<AnchorOutcome> {
        let href = self.nav_links.get(index)?.href.clone();
        let layout = self.page_layout();
        let outcome = self.anchors.activate(&href, &layout, self.scroll, now);
        match &outcome {
            AnchorOutcome::Scroll(anim) => {
                self.scroll_animation = Some(anim.clone());
            }
            AnchorOutcome::Suppressed => {}
            AnchorOutcome::NotIntercepted => {
                tracing::debug!(%href, "Link not intercepted");
            }
        }
        Some(outcome)
    }

    /// Lay out the page body at the last known viewport size.
    pub fn page_layout(&self) -> PageLayout {
        let input = PageInput {
            catalog: &self.catalog,
            loading: self.loading,
            selected: self.selected,
            palette: &self.palette,
        };
        view::build_page(&input, self.page_width, self.viewport_height)
    }

    fn scroll_by(&mut self, delta: i32) {
        self.scroll_animation = None;
        let max = i32::from(self.page_layout().max_scroll());
        let next = (i32::from(self.scroll) + delta).clamp(0, max);
        self.scroll = u16::try_from(next).unwrap_or(0);
    }

    fn clamp_selection(&mut self) {
        let len = self.catalog.visible().len();
        self.selected = match (len, self.selected) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
    }

    fn select_next(&mut self) {
        let len = self.catalog.visible().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
        self.scroll_to_selection();
    }

    fn select_prev(&mut self) {
        if self.catalog.visible().is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
        self.scroll_to_selection();
    }

    fn scroll_to_selection(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        let layout = self.page_layout();
        let Some(&top) = layout.card_offsets.get(selected) else {
            return;
        };
        let bottom = layout
            .card_offsets
            .get(selected + 1)
            .copied()
            .unwrap_or(top.saturating_add(5));
        self.scroll_animation = None;
        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll.saturating_add(self.viewport_height) {
            self.scroll = bottom
                .saturating_sub(self.viewport_height)
                .min(layout.max_scroll());
        }
    }

    /// Absolute URL of the selected card, if any.
    pub fn selected_url(&self) -> Option<String> {
        let card = self.catalog.visible().cards().get(self.selected?)?;
        Some(join_url(&self.config.base_url, &card.open_href))
    }

    fn open_selected(&mut self) {
        let Some(url) = self.selected_url() else {
            return;
        };
        match open::that(&url) {
            Ok(()) => {
                tracing::info!(%url, "Opened guide in browser");
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "Failed to open browser");
                self.notice = Some(Notice::warning(format!("Could not open {}", url)));
            }
        }
    }

    pub fn ui(&mut self, f: &mut Frame) {
        view::draw(self, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::anchors::SMOOTH_SCROLL_DURATION;
    use crate::internal::theme::{MemoryPreferences, THEME_KEY, Theme};
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(AppConfig::default(), Box::new(MemoryPreferences::new()))
    }

    fn loaded_app() -> App {
        let mut app = app();
        app.handle_action(Action::ManifestLoaded(LoadedManifest::fallback("test")));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn visible_files(app: &App) -> Vec<String> {
        app.catalog
            .visible()
            .cards()
            .iter()
            .map(|c| c.file.clone())
            .collect()
    }

    #[test]
    fn test_starts_loading_with_empty_catalog() {
        let app = app();
        assert!(app.loading);
        assert!(app.catalog.visible().is_empty());
        assert_eq!(app.theme.theme(), Theme::Light);
    }

    #[test]
    fn test_manifest_loaded_fills_catalog() {
        let app = loaded_app();
        assert!(!app.loading);
        assert_eq!(app.catalog.visible().len(), 7);
        assert_eq!(app.selected, Some(0));
        assert!(matches!(
            app.manifest_source,
            Some(ManifestSource::Fallback { .. })
        ));
    }

    #[test]
    fn test_search_via_keys() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        type_text(&mut app, "machine");
        assert_eq!(
            visible_files(&app),
            vec!["InteractiveGuidetoMachineLearning.html", "ML.html"]
        );

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.catalog.search_text(), "machine");
    }

    #[test]
    fn test_escape_clears_search() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz");
        assert!(app.catalog.visible().shows_empty_state());
        assert_eq!(app.selected, None);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.catalog.visible().len(), 7);
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_search_typed_before_load_is_kept() {
        let mut app = app();
        app.set_search("roadmap".to_string());
        app.handle_action(Action::ManifestLoaded(LoadedManifest::fallback("test")));
        assert_eq!(app.catalog.search_text(), "roadmap");
        assert_eq!(app.catalog.visible().len(), 3);
    }

    #[test]
    fn test_sort_key_cycles_modes() {
        let mut app = loaded_app();
        assert_eq!(app.catalog.sort_mode(), SortMode::Original);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.catalog.sort_mode(), SortMode::Alphabetical);
        assert_eq!(visible_files(&app)[0], "EthicalHacking.html");
        assert_eq!(visible_files(&app)[6], "ML.html");

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.catalog.sort_mode(), SortMode::Recent);
        let files = visible_files(&app);
        assert_eq!(files.first().unwrap(), "knowledge-webpage.html");
        assert_eq!(files.last().unwrap(), "EthicalHacking.html");
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme.theme(), Theme::Dark);
        assert_eq!(app.theme.persisted(), Some(Theme::Dark));
        assert_eq!(app.palette, TuiTheme::dark());

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme.theme(), Theme::Light);
        assert_eq!(app.theme.persisted(), Some(Theme::Light));
    }

    #[test]
    fn test_persisted_theme_applied_on_start() {
        let mut store = MemoryPreferences::new();
        store.set(THEME_KEY, "dark").unwrap();
        let app = App::new(AppConfig::default(), Box::new(store));
        assert_eq!(app.theme.theme(), Theme::Dark);
        assert_eq!(app.palette, TuiTheme::dark());
    }

    #[test]
    fn test_anchor_link_scrolls_smoothly() {
        let mut app = loaded_app();
        let now = Instant::now();

        let outcome = app.activate_link(1, now).unwrap();
        let target = match outcome {
            AnchorOutcome::Scroll(anim) => anim.to,
            other => panic!("expected scroll, got {other:?}"),
        };
        assert!(target > 0);

        app.tick(now);
        assert_eq!(app.scroll, 0);
        app.tick(now + SMOOTH_SCROLL_DURATION);
        assert_eq!(app.scroll, target);
        assert!(app.scroll_animation.is_none());
    }

    #[test]
    fn test_missing_anchor_is_a_no_op() {
        let mut app = loaded_app();
        app.scroll = 3;
        let outcome = app.activate_link(2, Instant::now());
        assert_eq!(outcome, Some(AnchorOutcome::Suppressed));
        assert!(app.scroll_animation.is_none());
        assert_eq!(app.scroll, 3);

        assert_eq!(app.activate_link(8, Instant::now()), None);
    }

    #[test]
    fn test_bootstrap_failure_forces_empty_state() {
        let mut app = app();
        app.handle_action(Action::BootstrapFailed("task panicked".to_string()));
        assert!(!app.loading);
        assert!(app.catalog.visible().shows_empty_state());
        let text = app.page_layout().text();
        assert!(text.iter().any(|l| l.contains(view::EMPTY_STATE_TEXT)));
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, Some(2));
        for _ in 0..20 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected, Some(6));

        app.set_search("machine".to_string());
        assert_eq!(app.selected, Some(1));

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_selected_url() {
        let mut app = loaded_app();
        app.set_search("Machine Learning Roadmap".to_string());
        assert_eq!(
            app.selected_url().as_deref(),
            Some("http://localhost:8000/roadmaps/ML.html")
        );
    }

    #[test]
    fn test_quit_key_sends_action() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('q'));
        let action = app.action_rx.try_recv().unwrap();
        app.handle_action(action);
        assert!(!app.running);
    }
}
