use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use roadmap_catalog::api::LoadedManifest;
use roadmap_catalog::config::AppConfig;
use roadmap_catalog::internal::theme::MemoryPreferences;
use roadmap_catalog::internal::ui::app::{Action, App};
use roadmap_catalog::internal::ui::view::EMPTY_STATE_TEXT;

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn render(app: &mut App) -> String {
    let backend = TestBackend::new(100, 40);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| app.ui(f)).unwrap();
    buffer_text(terminal.backend().buffer())
}

fn loaded_app() -> App {
    let mut app = App::new(AppConfig::default(), Box::new(MemoryPreferences::new()));
    app.handle_action(Action::ManifestLoaded(LoadedManifest::fallback("offline")));
    app.notice = None;
    app
}

#[test]
fn test_renders_catalog_cards() {
    let mut app = loaded_app();
    let screen = render(&mut app);

    assert!(screen.contains("Roadmap Catalog"));
    assert!(screen.contains("Guides (7)"));
    assert!(screen.contains("Ethical Hacking"));
    assert!(screen.contains("Information Security Career Roadmap"));
    assert!(screen.contains("/roadmaps/EthicalHacking.html"));
    assert!(screen.contains("source: built-in"));
    // Viewport size is recorded for scrolling.
    assert_eq!(app.page_width, 98);
    assert_eq!(app.viewport_height, 33);
}

#[test]
fn test_renders_empty_state() {
    let mut app = loaded_app();
    app.set_search("nothing matches this".to_string());
    let screen = render(&mut app);

    assert!(screen.contains("Guides (0)"));
    assert!(screen.contains(EMPTY_STATE_TEXT));
    assert!(!screen.contains("/roadmaps/EthicalHacking.html"));
}

#[test]
fn test_renders_theme_icon() {
    let mut app = loaded_app();
    assert!(render(&mut app).contains("☾ light"));

    app.toggle_theme();
    app.notice = None;
    assert!(render(&mut app).contains("☀ dark"));
}
