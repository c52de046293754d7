// ============================================================================
// Login - Écran de connexion
// ============================================================================
// La saisie elle-même se fait dans la ligne d'input du footer
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputPurpose};

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🔑 Login ");

    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome Back",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Please sign in to continue",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    if let Some(InputPurpose::Password { email }) = &app.input_purpose {
        text.push(Line::from(vec![
            Span::raw("Email: "),
            Span::styled(email.as_str(), Style::default().fg(Color::White)),
        ]));
    }

    if let Some(error) = &app.login_error {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::session::Session;
    use crate::ui::dashboard::test_support::render_to_string;
    use crate::worker::{AppResult, LOGIN_FAILED};
    use std::sync::Arc;

    #[test]
    fn test_login_error_is_shown() {
        let mut app = App::new(Arc::new(Session::in_memory()));
        app.handle_result(AppResult::LoginFailed {
            error: LOGIN_FAILED.to_string(),
        });

        let screen = render_to_string(&app);
        assert!(screen.contains("Welcome Back"));
        assert!(screen.contains(LOGIN_FAILED));
    }
}
