// ============================================================================
// Item Detail - Page détail d'un objet
// ============================================================================
// Affiche l'une des quatre vues décidées par ItemView :
// Loading, JustPurchased, NotFound, Active
//
// CONCEPT RUST : match exhaustif sur ViewState
// - Les vues sont mutuellement exclusives
// - Ajouter une vue sans la dessiner ne compile pas
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::item_view::{ItemView, ViewState};
use crate::models::Item;

pub fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.item_view else {
        render_message(frame, area, "No item selected", Color::Gray);
        return;
    };

    match view.view_state() {
        ViewState::Loading => render_message(frame, area, "Loading...", Color::Gray),
        ViewState::JustPurchased => render_just_purchased(frame, area),
        ViewState::NotFound => render_not_found(frame, view, area),
        ViewState::Active => {
            if let Some(item) = view.item() {
                render_active(frame, app, view, item, area);
            }
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(color))),
    ])
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_just_purchased(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Congratulations!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from("You have bought this item. The auction is over."),
        Line::from(""),
        Line::from(Span::styled(
            "[ESC] Back to Marketplace",
            Style::default().fg(Color::Yellow),
        )),
    ])
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_not_found(frame: &mut Frame, view: &ItemView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Item not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(error) = view.error() {
        text.push(Line::from(Span::styled(error, Style::default().fg(Color::Red))));
    }

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Vue active : détails à gauche, enchères à droite
// ============================================================================

fn render_active(frame: &mut Frame, app: &App, view: &ItemView, item: &Item, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_details(frame, item, chunks[0]);
    render_bidding(frame, app, view, item, chunks[1]);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<14}", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn render_details(frame: &mut Frame, item: &Item, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", item.title));

    let mut text = vec![
        Line::from(Span::styled(
            item.description.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        field("Category:", item.category.clone().unwrap_or_else(|| "-".to_string())),
        field("Condition:", item.condition.clone().unwrap_or_else(|| "-".to_string())),
        field("Current Price:", format!("${:.2}", item.current_price)),
    ];

    if let Some(buyout) = item.buyout_price {
        text.push(field("Buyout Price:", format!("${:.2}", buyout)));
    }

    text.push(field("Seller:", item.seller_label()));
    text.push(field("Status:", item.status.label().to_string()));

    if let Some(end) = item.auction_end_time {
        text.push(field("Auction Ends:", end.format("%Y-%m-%d %H:%M").to_string()));
    }

    let image_count = item.image_urls.len().max(usize::from(item.primary_image_url.is_some()));
    if image_count > 0 {
        text.push(field("Images:", image_count.to_string()));
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_bidding(frame: &mut Frame, app: &App, view: &ItemView, item: &Item, area: Rect) {
    let title = if view.refreshing() {
        " Bids (refreshing...) "
    } else {
        " Bids "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let mut text = Vec::new();

    // Panneau enchère la plus haute, ou "pas encore d'enchère"
    if view.no_bids() {
        text.push(Line::from(Span::styled(
            "No bids yet for this item.",
            Style::default().add_modifier(Modifier::BOLD),
        )));
    } else if let Some(bid) = view.highest_bid() {
        text.push(Line::from(Span::styled(
            "Highest Bid:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.push(Line::from(format!("${:.2} by User #{}", bid.bid_amount, bid.bidder_id)));
    }

    text.push(Line::from(""));

    if view.can_place_bid() {
        text.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("[b]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(format!(" to bid more than ${:.2}", item.current_price)),
        ]));
    } else {
        text.push(Line::from(Span::styled(
            bid_unavailable_reason(app, view, item),
            Style::default().fg(Color::Gray),
        )));
    }

    if let Some(error) = view.error() {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Explique pourquoi le formulaire d'enchère est masqué
fn bid_unavailable_reason(app: &App, view: &ItemView, item: &Item) -> &'static str {
    let Some(user) = &app.user else {
        return "Log in to place a bid.";
    };

    if !item.is_active() {
        "Bidding is closed for this item."
    } else if item.is_owned_by(user.id) {
        "You are the seller of this item."
    } else if view.highest_bid().is_some_and(|bid| bid.is_from(user.id)) {
        "You are the highest bidder."
    } else {
        "Bidding unavailable."
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::ApiError;
    use crate::app::App;
    use crate::item_view::ItemViewEvent;
    use crate::models::{AuthenticatedUser, Bid, Item, ItemStatus};
    use crate::session::Session;
    use crate::ui::dashboard::test_support::render_to_string;
    use crate::worker::{AppCommand, AppResult};

    fn item(buyout: Option<f64>) -> Item {
        Item {
            item_id: 7,
            title: "Vélo de ville".to_string(),
            description: "Révisé en septembre".to_string(),
            category: Some("SPORTS".to_string()),
            condition: Some("GOOD".to_string()),
            current_price: 100.0,
            starting_price: 50.0,
            buyout_price: buyout,
            auction_end_time: None,
            status: ItemStatus::Active,
            seller_id: Some(3),
            seller_username: Some("alice".to_string()),
            user: None,
            primary_image_url: None,
            image_urls: Vec::new(),
        }
    }

    fn app_on_item(highest: Result<Bid, ApiError>) -> (App, u64) {
        let mut app = App::new(Arc::new(Session::with_token("tok")));
        app.handle_result(AppResult::ProfileLoaded {
            user: Some(AuthenticatedUser {
                id: 9,
                username: "bob".to_string(),
                email: None,
                reputation: None,
            }),
        });

        let AppCommand::LoadItem { generation, .. } = app.open_item(7) else {
            panic!("expected LoadItem");
        };
        app.handle_result(AppResult::ItemView(ItemViewEvent::ItemLoaded {
            generation,
            result: Ok(item(Some(150.0))),
        }));
        app.handle_result(AppResult::ItemView(ItemViewEvent::HighestBidLoaded {
            generation,
            result: highest,
        }));
        (app, generation)
    }

    #[test]
    fn test_no_bids_panel() {
        let (app, _) = app_on_item(Err(ApiError::NotFound));
        let screen = render_to_string(&app);

        assert!(screen.contains("No bids yet for this item."));
        assert!(screen.contains("Buyout Price:"));
        assert!(screen.contains("[b]"));
    }

    #[test]
    fn test_highest_bid_panel() {
        let (app, _) = app_on_item(Ok(Bid {
            bid_id: Some(1),
            item_id: 7,
            bidder_id: 9,
            bid_amount: 120.0,
            timestamp: None,
        }));
        let screen = render_to_string(&app);

        assert!(screen.contains("$120.00 by User #9"));
        assert!(screen.contains("You are the highest bidder."));
    }

    #[test]
    fn test_just_purchased_screen() {
        let (mut app, generation) = app_on_item(Err(ApiError::NotFound));
        app.handle_result(AppResult::ItemView(ItemViewEvent::BidSubmitted {
            generation,
            amount: 160.0,
            buyout_before: Some(150.0),
        }));

        let screen = render_to_string(&app);
        assert!(screen.contains("Congratulations!"));
        assert!(!screen.contains("No bids yet"));
    }
}
