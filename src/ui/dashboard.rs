// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine le cadre commun (header, footer, ligne de saisie) et la liste
// des objets du marketplace
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Widgets : Block, Paragraph, List
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::ui::{item_detail, login, reputation, wallet};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit l'exhaustivité (tous les écrans gérés)
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Login => login::render_login(frame, app, chunks[1]),
        Screen::Marketplace => render_marketplace(frame, app, chunks[1]),
        Screen::ItemDetail => item_detail::render_item_detail(frame, app, chunks[1]),
        Screen::Wallet => wallet::render_wallet(frame, app, chunks[1]),
        Screen::Reputation => reputation::render_reputation(frame, app, chunks[1]),
    }

    if app.is_in_input_mode() {
        render_input_footer(frame, app, chunks[2]);
    } else {
        render_footer(frame, app, chunks[2]);
    }
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(4), // Footer : 4 lignes (saisie + aide)
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : titre, utilisateur, réputation, solde VC
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyBid ")
        .title_alignment(Alignment::Center);

    let mut spans = vec![Span::styled(
        "Student Marketplace",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];

    if let Some(user) = &app.user {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("👤 {}", user.username),
            Style::default().fg(Color::White),
        ));
        if let Some(reputation) = user.reputation {
            spans.push(Span::styled(
                format!("  ★ {}", reputation),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    if let Some(balance) = &app.balance {
        spans.push(Span::styled(
            format!("   VC {:.2}", balance.balance),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Marketplace : liste des objets actifs
// ============================================================================

fn render_marketplace(frame: &mut Frame, app: &App, area: Rect) {
    let scope = match &app.search {
        Some(query) => format!("Search {}", query.label()),
        None => "Marketplace".to_string(),
    };
    let mut title = if app.is_loading {
        format!(" 🛒 {} (loading...) ", scope)
    } else {
        format!(" 🛒 {} ({}) ", scope, app.items.len())
    };
    if app.search.is_some() {
        title.push_str("· [ESC] clear ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if app.items.is_empty() {
        let message = match (&app.marketplace_error, &app.loading_message) {
            (Some(error), _) => Span::styled(error.clone(), Style::default().fg(Color::Red)),
            (None, Some(loading)) => Span::styled(loading.clone(), Style::default().fg(Color::Gray)),
            (None, None) if app.search.is_some() => {
                Span::styled("No items match this search", Style::default().fg(Color::Gray))
            }
            (None, None) => Span::styled("No active items", Style::default().fg(Color::Gray)),
        };

        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    // CONCEPT RUST : Iterator chaining
    let items: Vec<ListItem> = app
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let style = if item.is_active() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut list_item = ListItem::new(format!(" {}", item.display())).style(style);

            if index == app.selected_index {
                list_item = list_item.style(
                    style
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }

            list_item
        })
        .collect();

    let mut lines = Vec::new();
    if let Some(error) = &app.marketplace_error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    if lines.is_empty() {
        frame.render_widget(List::new(items).block(block), area);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(block.inner(area));
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(lines), chunks[0]);
        frame.render_widget(List::new(items), chunks[1]);
    }
}

// ============================================================================
// Footer : raccourcis clavier
// ============================================================================

fn key_span(key: &'static str, color: Color) -> Span<'static> {
    Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        match app.current_screen {
            Screen::Login => Line::from(vec![
                key_span("[Enter]", Color::Green),
                Span::raw(" Log in  "),
                key_span("[q]", Color::Yellow),
                Span::raw(" Quit"),
            ]),
            Screen::Marketplace => Line::from(vec![
                key_span("[q]", Color::Yellow),
                Span::raw(" Quit  "),
                key_span("[↑↓/jk]", Color::Yellow),
                Span::raw(" Move  "),
                key_span("[Enter]", Color::Yellow),
                Span::raw(" Open  "),
                key_span("[/]", Color::Green),
                Span::raw(" Search  "),
                key_span("[r]", Color::Green),
                Span::raw(" Refresh  "),
                key_span("[v]", Color::Magenta),
                Span::raw(" Wallet  "),
                key_span("[p]", Color::Magenta),
                Span::raw(" Profile  "),
                key_span("[L]", Color::Red),
                Span::raw(" Logout"),
            ]),
            Screen::ItemDetail => Line::from(vec![
                key_span("[ESC]", Color::Yellow),
                Span::raw(" Back  "),
                key_span("[b]", Color::Green),
                Span::raw(" Bid  "),
                key_span("[r]", Color::Green),
                Span::raw(" Refresh  "),
                key_span("[p]", Color::Magenta),
                Span::raw(" Seller  "),
                key_span("[q]", Color::Yellow),
                Span::raw(" Quit"),
            ]),
            Screen::Wallet | Screen::Reputation => Line::from(vec![
                key_span("[ESC]", Color::Yellow),
                Span::raw(" Back  "),
                key_span("[r]", Color::Green),
                Span::raw(" Refresh  "),
                key_span("[q]", Color::Yellow),
                Span::raw(" Quit"),
            ]),
        }
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Input Mode : ligne de saisie
// ============================================================================

fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)); // Vert pour indiquer mode input

    // Mot de passe masqué
    let shown = match &app.input_purpose {
        Some(purpose) if purpose.is_secret() => "•".repeat(app.input_buffer.chars().count()),
        _ => app.input_buffer.clone(),
    };

    let input_line = Line::from(vec![
        Span::styled(
            app.input_prompt.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(shown, Style::default().fg(Color::White)),
        Span::styled(
            "█", // Curseur
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        key_span("[Enter]", Color::Green),
        Span::raw(" Confirm  "),
        key_span("[ESC]", Color::Red),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
