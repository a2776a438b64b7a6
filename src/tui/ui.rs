use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::form::FormField;
use crate::view::format_task_time;
use super::app::{App, DisplayItem, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search + filter
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help / error
        ].as_ref())
        .split(f.area());

    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Line::from(vec![
        Span::styled(format!("Search: {}", app.state.search), search_style),
        Span::raw("   "),
        Span::styled(
            format!("Filter: {}", app.state.filter.label()),
            Style::default().fg(Color::Cyan),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Todo List"));
    f.render_widget(search, chunks[0]);

    let rows: Vec<Row> = app
        .display_items
        .iter()
        .map(|item| match item {
            DisplayItem::DateHeader(date, count) => {
                let label = if date.is_empty() { "(no date)" } else { date.as_str() };
                Row::new(vec![
                    Cell::from(""),
                    Cell::from(format!("{} ({})", label, count)),
                ])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            }
            DisplayItem::Task(id) => match app.state.task(*id) {
                Some(t) => {
                    let style = if t.is_done {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::Red)
                    };
                    Row::new(vec![
                        Cell::from(t.id.to_string()),
                        Cell::from(t.code.clone()),
                        Cell::from(t.description.clone()),
                        Cell::from(format_task_time(&t.tasktime)),
                        Cell::from(t.project.clone()),
                        Cell::from(if t.is_done { "Done" } else { "Active" }),
                    ])
                    .style(style)
                }
                None => Row::new(vec![Cell::from(id.to_string())]),
            },
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Code", "Description", "Time", "Project", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.table_state);

    let (status_text, status_style) = match &app.state.last_error {
        Some(e) => (e.clone(), Style::default().fg(Color::Red)),
        None => {
            let help = match app.input_mode {
                InputMode::Normal => "q: Quit | a: Add | e/Enter: Edit | Space: Toggle Done | d: Del | /: Search | f: Filter | r: Reload",
                InputMode::Search => "Type to search | Enter/Esc: Done",
                InputMode::Form => "Tab: Next | Shift+Tab: Prev | ←/→: Pick Project | Del: Delete Project | Enter: Save | Esc: Cancel",
            };
            (help.to_string(), Style::default().fg(Color::Gray))
        }
    };
    let help = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Form {
        render_form(f, app);
    }
}

fn render_form(f: &mut Frame, app: &App) {
    let form = &app.state.form;
    let height = FormField::ORDER.len() as u16 + 2;
    let area = centered_rect(60, height, f.area());
    f.render_widget(Clear, area);

    let lines: Vec<Line> = FormField::ORDER
        .iter()
        .map(|&field| {
            let value = match field {
                FormField::Project if form.project.is_empty() => "< Select Project >".to_string(),
                FormField::Project => format!("< {} >", form.project),
                FormField::NewProject if field == app.focus => {
                    format!("{} (Enter: Add)", form.new_project)
                }
                _ => form.field(field).to_string(),
            };
            let style = if field == app.focus {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:>14}: ", field.label()), style),
                Span::styled(value, style),
            ])
        })
        .collect();

    let title = if form.is_editing() { "Edit Task" } else { "Add New Task" };
    let input = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let margin = (r.height - height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
