//! Rendering. Every view shares the header and footer rows.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use medsearch_contracts::navigation::Route;

use crate::app::{App, Focus, LoginField, LoginForm, Screen, SearchView, UploadForm};

const ACCENT: Color = Color::Cyan;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // view
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    match &app.screen {
        Screen::Login(form) => render_login(f, chunks[1], form),
        Screen::Search(view) => render_search(f, chunks[1], view),
        Screen::Details(details) => render_details(f, chunks[1], details),
        Screen::Dashboard(dashboard) => render_dashboard(f, chunks[1], dashboard),
        Screen::Upload(form) => render_upload(f, chunks[1], app, form),
    }
    render_footer(f, chunks[2], app);
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    let color = if focused { ACCENT } else { Color::DarkGray };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn dim(s: impl Into<String>) -> Span<'static> {
    Span::styled(s.into(), Style::default().fg(Color::DarkGray))
}

fn highlighted(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

// ── Header / footer ───────────────────────────────────────────────────────────

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled("MedSearch    ", title_style)];

    if app.session.is_authenticated() {
        let tabs = [
            ("[F1]", "Search", matches!(app.route, Route::Search | Route::DrugDetails { .. })),
            ("[F2]", "Dashboard", app.route == Route::Dashboard),
            ("[F3]", "Upload", app.route == Route::Upload),
        ];
        for (key, name, active) in tabs {
            spans.push(Span::styled(format!("{} {}  ", key, name), highlighted(active)));
        }
        let since = app
            .session
            .established_at()
            .map(|t| t.format(" since %H:%M UTC").to_string())
            .unwrap_or_default();
        spans.push(dim(format!(
            "  {}{}",
            app.session.email().unwrap_or_default(),
            since
        )));
    } else {
        spans.push(dim("not signed in"));
    }

    let header = Paragraph::new(Line::from(spans)).block(panel(&app.route.path(), false));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &str| Span::styled(format!("[{}] ", k), Style::default().fg(ACCENT));
    let mut spans = vec![Span::raw(" ")];
    match &app.screen {
        Screen::Login(_) => {
            spans.extend([key("Tab"), Span::raw("Field  "), key("Enter"), Span::raw("Login  ")]);
        }
        Screen::Search(_) => spans.extend([
            key("Tab"),
            Span::raw("Focus  "),
            key("↑↓"),
            Span::raw("Move  "),
            key("Enter"),
            Span::raw("Select / Search  "),
        ]),
        Screen::Details(_) => spans.extend([key("Esc"), Span::raw("Back to search  ")]),
        Screen::Dashboard(_) => spans.extend([key("r"), Span::raw("Reload  ")]),
        Screen::Upload(_) => spans.extend([key("Enter"), Span::raw("Upload file  ")]),
    }
    if app.session.is_authenticated() {
        spans.extend([key("F4"), Span::raw("Logout  ")]);
    }
    spans.extend([key("Ctrl-C"), Span::raw("Quit")]);

    let footer = Paragraph::new(Line::from(spans)).block(panel("", false));
    f.render_widget(footer, area);
}

// ── Login ─────────────────────────────────────────────────────────────────────

fn render_login(f: &mut Frame, area: Rect, form: &LoginForm) {
    let field = |label: &str, value: String, active: bool| {
        Line::from(vec![
            Span::raw(format!("  {:<10}", label)),
            Span::styled(value, highlighted(active)),
            Span::raw(if active { "▏" } else { "" }),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        field("Email", form.email.clone(), form.field == LoginField::Email),
        Line::from(""),
        field(
            "Password",
            "•".repeat(form.password.chars().count()),
            form.field == LoginField::Password,
        ),
        Line::from(""),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(panel("Login", true)), area);
}

// ── Search ────────────────────────────────────────────────────────────────────

fn render_search(f: &mut Frame, area: Rect, view: &SearchView) {
    let wf = &view.workflow;
    let session = wf.session();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(rows[1]);

    let pending = if wf.suggestions_pending() { dim("  …") } else { Span::raw("") };
    let query = Paragraph::new(Line::from(vec![
        Span::raw(session.query().to_string()),
        Span::raw(if view.focus == Focus::Query { "▏" } else { "" }),
        pending,
    ]))
    .block(panel("Drug name or class", view.focus == Focus::Query));
    f.render_widget(query, rows[0]);

    let cursor_for = |focus: Focus| (view.focus == focus).then_some(view.cursor);
    let drug_rows = |drugs: &[medsearch_contracts::drug::Drug]| -> Vec<(String, bool)> {
        drugs
            .iter()
            .map(|d| {
                let selected = session.selected_drug().is_some_and(|s| s.id == d.id);
                (format!("{} · {}", d.name, d.class_name), selected)
            })
            .collect()
    };

    let suggestions = if session.suggestions_visible() {
        drug_rows(session.suggestions())
    } else {
        Vec::new()
    };
    render_list(f, cols[0], "Suggestions", suggestions, cursor_for(Focus::Suggestions));
    render_list(f, cols[1], "Results", drug_rows(session.results()), cursor_for(Focus::Results));

    let plans = session
        .insurance_options()
        .iter()
        .map(|i| {
            let selected = session.selected_insurance().is_some_and(|s| s.id == i.id);
            (i.name.clone(), selected)
        })
        .collect();
    render_list(f, cols[2], "Insurance", plans, cursor_for(Focus::Insurance));

    let codes = session
        .selected_drug()
        .map(|d| {
            d.ndc
                .iter()
                .map(|code| (code.clone(), session.selected_ndc() == Some(code.as_str())))
                .collect()
        })
        .unwrap_or_default();
    render_list(f, cols[3], "NDC", codes, cursor_for(Focus::Ndc));

    let status = match (wf.error(), session.navigation_target()) {
        (Some(e), _) => Line::from(Span::styled(e.to_string(), Style::default().fg(Color::Red))),
        (None, Some(target)) => Line::from(vec![
            Span::styled("Ready: ", Style::default().fg(Color::Green)),
            Span::raw(format!("Enter on the query opens {}", target.path())),
        ]),
        (None, None) => Line::from(dim(match session.selected_drug() {
            Some(d) => format!("{} selected; pick an NDC", d.name),
            None => "Type to see suggestions, Enter to search".to_string(),
        })),
    };
    f.render_widget(Paragraph::new(status).block(panel("Status", false)), rows[2]);
}

/// Rows marked `true` are the current selection; `cursor` is the highlight
/// when the list has focus.
fn render_list(f: &mut Frame, area: Rect, title: &str, rows: Vec<(String, bool)>, cursor: Option<usize>) {
    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (text, selected))| {
            let marker = if selected { "● " } else { "  " };
            let style = if cursor == Some(i) {
                highlighted(true)
            } else if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("{}{}", marker, text), style)))
        })
        .collect();
    f.render_widget(List::new(items).block(panel(title, cursor.is_some())), area);
}

// ── Details ───────────────────────────────────────────────────────────────────

fn render_details(
    f: &mut Frame,
    area: Rect,
    details: &Result<medsearch_core::DrugDetails, medsearch_contracts::error::MedSearchError>,
) {
    let details = match details {
        Ok(d) => d,
        Err(e) => {
            let msg = Paragraph::new(Span::styled(e.to_string(), Style::default().fg(Color::Red)))
                .block(panel("Drug details", true));
            f.render_widget(msg, area);
            return;
        }
    };

    let drug = &details.drug;
    let label = |s: &str| Span::styled(format!("  {:<12}", s), Style::default().fg(Color::Gray));
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", drug.name),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            label("NDC"),
            Span::raw(details.ndc.clone()),
            if details.ndc_listed {
                Span::raw("")
            } else {
                Span::styled("  (not listed for this drug)", Style::default().fg(Color::Yellow))
            },
        ]),
        Line::from(vec![label("Class"), Span::raw(drug.class_name.clone())]),
        Line::from(vec![label("Net price"), Span::raw(details.net_price_label())]),
        Line::from(""),
        Line::from(format!("  {}", drug.description)),
        Line::from(""),
        Line::from(Span::styled("  Alternatives", Style::default().add_modifier(Modifier::BOLD))),
    ];
    if details.alternatives().is_empty() {
        lines.push(Line::from(dim("    none listed")));
    }
    for alt in details.alternatives() {
        lines.push(Line::from(format!("    {} ({})", alt.name, alt.class_name)));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Drug details", true));
    f.render_widget(paragraph, area);
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    dashboard: &Result<medsearch_analytics::Dashboard, medsearch_contracts::error::MedSearchError>,
) {
    let dashboard = match dashboard {
        Ok(d) => d,
        Err(e) => {
            let msg = Paragraph::new(Span::styled(e.to_string(), Style::default().fg(Color::Red)))
                .block(panel("Dashboard", true));
            f.render_widget(msg, area);
            return;
        }
    };
    let a = &dashboard.analytics;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Min(4)])
        .split(area);

    let cards = Line::from(vec![
        dim(" Total sales "),
        Span::raw(format!("{:<8}", a.total_sales)),
        dim(" Scripts "),
        Span::raw(format!("{:<8}", a.total_scripts)),
        dim(" Revenue "),
        Span::raw(format!("${:<12.2}", a.total_revenue)),
        dim(" Below net "),
        Span::styled(
            a.below_net_price_count.to_string(),
            Style::default().fg(if a.below_net_price_count > 0 { Color::Red } else { Color::Green }),
        ),
    ]);
    f.render_widget(Paragraph::new(cards).block(panel("Pharmacy sales", false)), rows[0]);

    let alerts: Vec<ListItem> = dashboard
        .alerts
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<24}{:<20}", truncate(&s.pharmacy_name, 23), truncate(&s.drug_name, 19))),
                Span::raw(format!("${:>7.2}  ${:>7.2}  ", s.sale_price, s.net_price)),
                Span::styled(format!("-${:.2}", s.difference), Style::default().fg(Color::Red)),
            ]))
        })
        .collect();
    f.render_widget(List::new(alerts).block(panel("Below net price", false)), rows[1]);

    let by_drug: Vec<ListItem> = a
        .sales_by_drug
        .iter()
        .map(|d| {
            ListItem::new(format!(
                "{:<24}{:>4} scripts  ${:>10.2}",
                truncate(&d.drug_name, 23),
                d.scripts,
                d.revenue
            ))
        })
        .collect();
    f.render_widget(List::new(by_drug).block(panel("Sales by drug", false)), rows[2]);
}

// ── Upload ────────────────────────────────────────────────────────────────────

fn render_upload(f: &mut Frame, area: Rect, app: &App, form: &UploadForm) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let allowed = app.inbox.settings().allowed_extensions.join(", ");
    let input = Paragraph::new(Line::from(vec![Span::raw(form.path.clone()), Span::raw("▏")]))
        .block(panel(&format!("Spreadsheet path ({})", allowed), true));
    f.render_widget(input, rows[0]);

    let message = match &form.message {
        Some(Ok(m)) => Line::from(Span::styled(m.clone(), Style::default().fg(Color::Green))),
        Some(Err(m)) => Line::from(Span::styled(m.clone(), Style::default().fg(Color::Red))),
        None => Line::from(dim("Enter a file path and press Enter")),
    };
    f.render_widget(Paragraph::new(message).block(panel("Status", false)), rows[1]);

    let receipts: Vec<ListItem> = match app.receipts() {
        Ok(receipts) => receipts
            .iter()
            .map(|r| {
                ListItem::new(Line::from(vec![
                    dim(r.received_at.format("%H:%M:%S  ").to_string()),
                    Span::raw(format!("{:<28}{:>10} bytes  ", truncate(&r.file_name, 27), r.size_bytes)),
                    dim(shorten_hash(&r.sha256)),
                ]))
            })
            .collect(),
        Err(e) => vec![ListItem::new(Line::from(Span::styled(
            e.to_string(),
            Style::default().fg(Color::Red),
        )))],
    };
    f.render_widget(List::new(receipts).block(panel("Received this session", false)), rows[2]);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Truncate a string to at most `max` chars, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn shorten_hash(h: &str) -> String {
    if h.len() >= 8 {
        format!("{}...{}", &h[..4], &h[h.len() - 4..])
    } else {
        h.to_string()
    }
}
