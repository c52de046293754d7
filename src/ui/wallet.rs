// ============================================================================
// Wallet - Solde et historique de monnaie virtuelle
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::VcTransaction;

pub fn render_wallet(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💰 Wallet ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    render_summary(frame, app, chunks[0]);
    render_transactions(frame, app, chunks[1]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let balance = match &app.balance {
        Some(balance) => Span::styled(
            format!("Balance: VC {:.2}", balance.balance),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("Balance: -", Style::default().fg(Color::Gray)),
    };

    let status = match (&app.wallet_error, &app.loading_message) {
        (Some(error), _) => Span::styled(error.clone(), Style::default().fg(Color::Red)),
        (None, Some(loading)) if app.is_loading => {
            Span::styled(loading.clone(), Style::default().fg(Color::Gray))
        }
        _ => Span::raw(""),
    };

    let paragraph = Paragraph::new(vec![Line::from(balance), Line::from(status)])
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_transactions(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Transactions ({}) ", app.transactions.len()));

    if app.transactions.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No transactions yet",
            Style::default().fg(Color::Gray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    // Le signe dépend du côté de l'utilisateur dans la vente
    let user_id = app
        .balance
        .as_ref()
        .and_then(|b| b.user_id)
        .or_else(|| app.user.as_ref().map(|u| u.id));

    let rows: Vec<ListItem> = app
        .transactions
        .iter()
        .map(|tx| transaction_row(tx, user_id))
        .collect();

    frame.render_widget(List::new(rows).block(block), area);
}

fn transaction_row(tx: &VcTransaction, user_id: Option<i64>) -> ListItem<'static> {
    let amount = tx.signed_amount(user_id);
    let (sign, color) = if amount >= 0.0 {
        ("+", Color::Green)
    } else {
        ("-", Color::Red)
    };

    let date = tx
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".repeat(16));

    let detail = tx
        .related_item_title
        .clone()
        .or_else(|| tx.description.clone())
        .unwrap_or_default();

    ListItem::new(Line::from(vec![
        Span::styled(format!(" {}  ", date), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:<17}", tx.kind_label()), Style::default().fg(Color::White)),
        Span::styled(
            format!("{}{:>9.2}  ", sign, amount.abs()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(detail),
    ]))
}
