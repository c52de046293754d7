// ============================================================================
// Reputation - Profil public d'un utilisateur
// ============================================================================
// Réputation agrégée, répartition des notes et feedbacks reçus
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{Feedback, UserReputation};

pub fn render_reputation(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.reputation.as_ref().and_then(|r| r.username.as_deref()) {
        Some(username) => format!(" 👤 {} ", username),
        None => " 👤 Profile ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(inner);

    render_summary(frame, app, chunks[0]);
    render_feedback(frame, &app.feedback, chunks[1]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(error) = &app.reputation_error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
        lines.push(Line::from(""));
    }

    match &app.reputation {
        Some(reputation) => lines.extend(summary_lines(reputation)),
        None => {
            let message = app
                .loading_message
                .clone()
                .filter(|_| app.is_loading)
                .unwrap_or_else(|| "No reputation data".to_string());
            lines.push(Line::from(Span::styled(message, Style::default().fg(Color::Gray))));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn summary_lines(reputation: &UserReputation) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Reputation: ", label),
            Span::styled(
                reputation
                    .reputation
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Average:    ", label),
            Span::raw(
                reputation
                    .average_rating
                    .map(|a| format!("{:.1} ★", a))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Reviews:    ", label),
            Span::raw(reputation.total_reviews.to_string()),
        ]),
        Line::from(""),
    ];

    for (stars, count) in reputation.star_counts() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ★  ", stars), Style::default().fg(Color::Yellow)),
            Span::raw(count.to_string()),
        ]));
    }

    lines
}

fn render_feedback(frame: &mut Frame, feedback: &[Feedback], area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Feedback ({}) ", feedback.len()));

    if feedback.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "No feedback yet",
            Style::default().fg(Color::Gray),
        ))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<ListItem> = feedback.iter().map(feedback_row).collect();
    frame.render_widget(List::new(rows).block(block), area);
}

fn feedback_row(feedback: &Feedback) -> ListItem<'static> {
    let stars = match feedback.stars() {
        Some(n) => "★".repeat(n as usize) + &"☆".repeat(5 - n as usize),
        None => feedback.score.clone(),
    };

    let header = Line::from(vec![
        Span::styled(format!(" {} ", stars), Style::default().fg(Color::Yellow)),
        Span::styled(
            feedback.giver_username.clone().unwrap_or_else(|| "?".to_string()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            feedback
                .item_title
                .as_ref()
                .map(|title| format!("  ({})", title))
                .unwrap_or_default(),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let comment = Line::from(Span::raw(format!(
        "   {}",
        feedback.comment.clone().unwrap_or_default()
    )));

    ListItem::new(vec![header, comment])
}
