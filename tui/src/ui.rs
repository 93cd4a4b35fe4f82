//! ratatui draw functions, one per screen.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::app::{App, Field, Notice, NoticeKind, Screen};
use crate::transport::Transport;

pub fn draw<T: Transport>(frame: &mut Frame, app: &App<T>) {
    match app.screen {
        Screen::Tasks => draw_tasks(frame, app),
        Screen::AddTask => draw_task_form(frame, app, "Add Task"),
        Screen::EditTask => draw_task_form(frame, app, "Edit Task"),
        Screen::Login => draw_auth(frame, app),
        Screen::Signup => draw_auth(frame, app),
    }
}

fn draw_tasks<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let title = Paragraph::new("myTodo")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    frame.render_widget(title, chunks[0]);

    if app.todos.is_empty() {
        let empty = Paragraph::new("No todos found. Add some tasks!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Tasks"));
        frame.render_widget(empty, chunks[1]);
    } else {
        let rows = app.todos.iter().map(|todo| {
            let marker = if todo.is_completed { "[x]" } else { "[ ]" };
            let style = if todo.is_completed {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(todo.content.as_str()),
            ])
            .style(style)
        });
        let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(10)])
            .header(
                Row::new(vec!["Done", "Task"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(Block::default().borders(Borders::ALL).title("Tasks"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = TableState::default();
        state.select(app.selected);
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    let help = Paragraph::new(
        "a: add | e: edit | d: delete | space: toggle | j/k: move | r: refresh | L: logout | q: quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    frame.render_widget(notice_line(&app.notice), chunks[3]);
}

fn draw_task_form<T: Transport>(frame: &mut Frame, app: &App<T>, title: &str) {
    let area = centered_rect(60, 7, frame.size());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let input = Paragraph::new(app.content.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!("{title} (3-54 chars)")),
    );
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new("enter: save | esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[1]);

    frame.render_widget(notice_line(&app.notice), chunks[2]);
}

fn draw_auth<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let signup = app.screen == Screen::Signup;
    let fields: &[(Field, &str)] = if signup {
        &[
            (Field::Username, "Username"),
            (Field::Email, "Email"),
            (Field::Password, "Password"),
        ]
    } else {
        &[(Field::Email, "Email"), (Field::Password, "Password")]
    };

    let height = 3 * fields.len() as u16 + 5;
    let area = centered_rect(50, height, frame.size());
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let title = Paragraph::new(if signup { "Sign Up" } else { "Login" })
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    frame.render_widget(title, chunks[0]);

    for (i, (field, label)) in fields.iter().enumerate() {
        let value = match field {
            Field::Username => app.username.clone(),
            Field::Email => app.email.clone(),
            // Never echo the password itself.
            Field::Password => "\u{2022}".repeat(app.password.chars().count()),
            Field::Content => String::new(),
        };
        let border = if app.focus == *field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(*label),
        );
        frame.render_widget(input, chunks[i + 1]);
    }

    let help = if signup {
        "enter: create account | tab: next field | left: back to login | esc: quit"
    } else {
        "enter: login | tab: next field | right: sign up | esc: quit"
    };
    let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[fields.len() + 1]);

    frame.render_widget(notice_line(&app.notice), chunks[fields.len() + 2]);
}

fn notice_line(notice: &Option<Notice>) -> Paragraph<'_> {
    match notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            Paragraph::new(notice.message.as_str()).style(Style::default().fg(color))
        }
        None => Paragraph::new(""),
    }
}

/// Center a fixed-height box of `percent_x` width inside `r`.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
