use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::app::{App, InputMode};
use crate::api::ManifestSource;
use crate::internal::anchors::{AnchorTargets, Link};
use crate::internal::catalog::{CatalogView, RenderedList};
use crate::internal::notification::NoticeLevel;
use crate::utils::palette::TuiTheme;

pub const SECTION_CATALOG: &str = "catalog";
pub const SECTION_ABOUT: &str = "about";

pub const EMPTY_STATE_TEXT: &str = "No guides match your search.";
pub const LOADING_TEXT: &str = "Loading catalog…";

const ABOUT_TEXT: &str = "Free, self-paced learning guides covering security, machine learning \
and general web topics. Each guide is a single static page you can open in your browser.";

/// Navigation links shown in the top bar, in key order (`1`, `2`, ...).
pub fn nav_links() -> Vec<Link> {
    vec![
        Link::new("Catalog", format!("#{}", SECTION_CATALOG)),
        Link::new("About", format!("#{}", SECTION_ABOUT)),
        Link::new("Changelog", "#changelog"),
    ]
}

/// The scrollable page body as plain lines plus the offsets of its named
/// sections and of every card.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub lines: Vec<Line<'static>>,
    pub anchors: HashMap<String, u16>,
    pub card_offsets: Vec<u16>,
    pub viewport: u16,
}

impl PageLayout {
    pub fn height(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    pub fn max_scroll(&self) -> u16 {
        self.height().saturating_sub(self.viewport)
    }

    /// Plain text of every line, for tests and debugging.
    pub fn text(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }
}

impl AnchorTargets for PageLayout {
    fn target_offset(&self, id: &str) -> Option<u16> {
        self.anchors
            .get(id)
            .map(|offset| (*offset).min(self.max_scroll()))
    }
}

/// Everything the page body depends on.
pub struct PageInput<'a> {
    pub catalog: &'a CatalogView,
    pub loading: bool,
    pub selected: Option<usize>,
    pub palette: &'a TuiTheme,
}

pub fn build_page(input: &PageInput, width: u16, viewport: u16) -> PageLayout {
    let palette = input.palette;
    let wrap_width = usize::from(width.saturating_sub(6)).max(10);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut anchors = HashMap::new();
    let mut card_offsets = Vec::new();

    let offset = |lines: &[Line<'static>]| u16::try_from(lines.len()).unwrap_or(u16::MAX);

    anchors.insert(SECTION_CATALOG.to_string(), offset(&lines));
    let visible = input.catalog.visible();
    lines.push(Line::from(vec![
        Span::styled(
            "Guides",
            Style::default()
                .fg(palette.foreground)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", visible.len()),
            Style::default().fg(palette.muted),
        ),
    ]));
    lines.push(Line::default());

    match visible {
        RenderedList::Empty => {
            let text = match input.loading {
                true => LOADING_TEXT,
                false => EMPTY_STATE_TEXT,
            };
            lines.push(Line::from(Span::styled(
                format!("  {}", text),
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::default());
        }
        RenderedList::Cards(cards) => {
            for (idx, card) in cards.iter().enumerate() {
                card_offsets.push(offset(&lines));
                let is_selected = input.selected == Some(idx);
                let marker = match is_selected {
                    true => "▶ ",
                    false => "  ",
                };
                let title_style = match is_selected {
                    true => Style::default()
                        .fg(palette.selection_fg)
                        .bg(palette.selection_bg)
                        .add_modifier(Modifier::BOLD),
                    false => Style::default()
                        .fg(palette.link)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                };

                lines.push(Line::from(vec![
                    Span::styled(marker, Style::default().fg(palette.accent)),
                    Span::styled(card.title.clone(), title_style),
                ]));
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("    {}", card.href),
                        Style::default().fg(palette.muted),
                    ),
                    Span::styled(
                        format!("  [{}]", card.category),
                        Style::default().fg(palette.category),
                    ),
                ]));
                for row in textwrap::wrap(&card.description, wrap_width) {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", row),
                        Style::default().fg(palette.foreground),
                    )));
                }
                lines.push(Line::from(vec![
                    Span::styled("    open → ", Style::default().fg(palette.muted)),
                    Span::styled(card.open_href.clone(), Style::default().fg(palette.link)),
                ]));
                lines.push(Line::default());
            }
        }
    }

    anchors.insert(SECTION_ABOUT.to_string(), offset(&lines));
    lines.push(Line::from(Span::styled(
        "About",
        Style::default()
            .fg(palette.foreground)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    for row in textwrap::wrap(ABOUT_TEXT, wrap_width) {
        lines.push(Line::from(Span::styled(
            format!("  {}", row),
            Style::default().fg(palette.foreground),
        )));
    }

    PageLayout {
        lines,
        anchors,
        card_offsets,
        viewport,
    }
}

#[tracing::instrument(skip(app, f))]
pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_top_bar(app, f, chunks[0]);
    render_controls(app, f, chunks[1]);
    render_page(app, f, chunks[2]);
    render_status_bar(app, f, chunks[3]);
}

fn render_top_bar(app: &App, f: &mut Frame, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(area);

    let mut spans = vec![Span::styled(
        "Roadmap Catalog  ",
        Style::default()
            .fg(app.palette.foreground)
            .add_modifier(Modifier::BOLD),
    )];
    for (idx, link) in app.nav_links.iter().enumerate() {
        spans.push(Span::styled(
            format!("[{}] ", idx + 1),
            Style::default().fg(app.palette.muted),
        ));
        spans.push(Span::styled(
            format!("{}  ", link.label),
            Style::default().fg(app.palette.link),
        ));
    }

    let left = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(app.palette.background));
    f.render_widget(left, halves[0]);

    let toggle = Paragraph::new(format!("{} {} (t)", app.theme.icon(), app.theme.theme()))
        .alignment(Alignment::Right)
        .style(
            Style::default()
                .fg(app.palette.accent)
                .bg(app.palette.background),
        );
    f.render_widget(toggle, halves[1]);
}

fn render_controls(app: &App, f: &mut Frame, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let searching = app.input_mode == InputMode::Search;
    let search_border = match searching {
        true => app.palette.accent,
        false => app.palette.border,
    };
    let cursor = match searching {
        true => "█",
        false => "",
    };
    let search_text = match (app.catalog.search_text().is_empty(), searching) {
        (true, false) => Span::styled(
            "press / to search titles and descriptions",
            Style::default().fg(app.palette.muted),
        ),
        _ => Span::styled(
            format!("{}{}", app.catalog.search_text(), cursor),
            Style::default().fg(app.palette.foreground),
        ),
    };
    let search = Paragraph::new(Line::from(search_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(search_border))
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(app.palette.background)),
    );
    f.render_widget(search, halves[0]);

    let sort = Paragraph::new(Line::from(vec![
        Span::styled("◂ ", Style::default().fg(app.palette.muted)),
        Span::styled(
            app.catalog.sort_mode().label(),
            Style::default().fg(app.palette.foreground),
        ),
        Span::styled(" ▸", Style::default().fg(app.palette.muted)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.palette.border))
            .title(" Sort (s) ")
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(app.palette.background)),
    );
    f.render_widget(sort, halves[1]);
}

fn render_page(app: &mut App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.palette.border))
        .style(Style::default().bg(app.palette.background));
    let inner = block.inner(area);

    app.page_width = inner.width;
    app.viewport_height = inner.height;

    let layout = app.page_layout();
    let scroll = app.scroll.min(layout.max_scroll());
    let page = Paragraph::new(layout.lines)
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(page, area);
}

fn render_status_bar(app: &App, f: &mut Frame, area: Rect) {
    let (status, fg) = match &app.notice {
        Some(notice) => {
            let fg = match notice.level {
                NoticeLevel::Info => app.palette.selection_fg,
                NoticeLevel::Warning => app.palette.accent,
            };
            (notice.message.clone(), fg)
        }
        None => {
            let source = match &app.manifest_source {
                Some(ManifestSource::Remote) => " | source: remote",
                Some(ManifestSource::Fallback { .. }) => " | source: built-in",
                None => "",
            };
            let hints = match app.input_mode {
                InputMode::Search => "Type to filter | Enter: Done | Esc: Clear".to_string(),
                InputMode::Normal => format!(
                    "/: Search | s: Sort | t: Theme | 1-{}: Jump | Enter: Open | q: Quit{}",
                    app.nav_links.len(),
                    source
                ),
            };
            (hints, app.palette.selection_fg)
        }
    };

    let p = Paragraph::new(status)
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(app.palette.selection_bg)),
        )
        .style(Style::default().fg(fg));
    f.render_widget(p, area);
}
