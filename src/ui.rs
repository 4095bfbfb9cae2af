//! UI rendering for the vocabulary drill.

use crate::app::{App, Feedback};
use crate::session::DrillState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // progress
            Constraint::Min(0),    // card
            Constraint::Length(3), // input
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    // Progress gauge with the mastery-level histogram
    let levels: Vec<String> = view
        .stats
        .per_level
        .iter()
        .enumerate()
        .map(|(level, n)| format!("{}:{}", level, n))
        .collect();
    let label = format!(
        "{:.0}% | {} words | levels {}",
        view.stats.percent,
        view.stats.total_items,
        levels.join(" ")
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" vocab-drill [{}] ", app.user())),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((view.stats.percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, chunks[0]);

    // Card area
    match view.state {
        DrillState::Finished => {
            let done = Paragraph::new("All words mastered!\n\nPress 'r' to start over.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(done, chunks[1]);
        }
        _ => {
            if let Some(item) = &view.item {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        item.prompt_sentence.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("meaning: ", Style::default().fg(Color::DarkGray)),
                        Span::raw(item.translation.clone()),
                        Span::styled("  (", Style::default().fg(Color::DarkGray)),
                        Span::styled(item.gloss.clone(), Style::default().fg(Color::DarkGray)),
                        Span::styled(")", Style::default().fg(Color::DarkGray)),
                    ]),
                ];
                if let Some(hint) = &view.hint {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!("hint: {}…", hint),
                        Style::default().fg(Color::Yellow),
                    )));
                }
                let card = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title(" Fill the blank "))
                    .wrap(Wrap { trim: true });
                f.render_widget(card, chunks[1]);
            }
        }
    }

    // Feedback banner during the between-card pause
    if let Some(feedback) = &app.feedback {
        let (text, color) = match feedback {
            Feedback::Correct => ("Correct!".to_string(), Color::Green),
            Feedback::Revealed(answer) => (format!("The answer was: {}", answer), Color::Red),
        };
        let area = centered_rect(40, 15, chunks[1]);
        f.render_widget(Clear, area);
        let banner = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, area);
    } else if view.show_error {
        let area = centered_rect(40, 15, chunks[1]);
        f.render_widget(Clear, area);
        let banner = Paragraph::new("Not quite - press any key to retry")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, area);
    }

    // Answer input
    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Your answer "));
    f.render_widget(input, chunks[2]);
    if view.state == DrillState::AwaitingAnswer && app.feedback.is_none() {
        f.set_cursor_position((
            chunks[2].x + 1 + cursor_offset(&app.input_buffer),
            chunks[2].y + 1,
        ));
    }

    // Footer
    let footer_text = match view.state {
        DrillState::Finished => "r:Start over  Tab:Last card  ?:Help  q:Quit",
        _ => "Enter:Submit  Tab:Last card  ?:Help  Esc:Quit",
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[3]);

    if let Some(last) = &view.last_card {
        let area = centered_rect(60, 50, f.area());
        f.render_widget(Clear, area);
        let lines = vec![
            Line::from(Span::styled(
                last.target_answer.clone(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(last.prompt_sentence.clone()),
            Line::from(last.example_sentence.clone()),
            Line::from(""),
            Line::from(format!("{} ({})", last.translation, last.gloss)),
        ];
        let popup = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Last card "))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }

    if app.show_help {
        draw_help(f);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg);
    }
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let help = r#"
vocab-drill keybindings

Drill:
  type + Enter    Submit your answer
  Tab             Toggle previous card
  Esc             Quit

After two wrong tries the answer is
revealed and the word loses one point.

Finished:
  r               Start the word set over

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_message(f: &mut Frame, msg: &str) {
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    );
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

/// Cursor column for the input line; counts characters, not bytes, so
/// accented answers keep the cursor at the end of the text.
fn cursor_offset(input: &str) -> u16 {
    input.chars().count() as u16
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
