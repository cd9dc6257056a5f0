use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::task::TaskRecord;

use super::actions::{
    self, Control, HitRegion, HitTarget, EDIT_BINDINGS, INPUT_BINDINGS, LIST_BINDINGS,
};
use super::app::{AppState, Focus, StatusKind};
use super::editor::LineBuffer;
use super::model::{self, RowState};

const HELP_KEY_WIDTH: usize = 14;
const MARKER_WIDTH: usize = 4;
const LABEL_WIDTH: u16 = 3;
const PLACEHOLDER: &str = "What needs to be done?";
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_INPUT: Color = Color::Rgb(180, 156, 92);

pub fn render(frame: &mut Frame, app: &mut AppState, now: Instant) {
    app.hits.clear();

    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_input(frame, app, chunks[0]);
    render_list(frame, app, chunks[1], now);
    render_footer(frame, app, chunks[2]);

    if app.show_help {
        render_help_modal(frame, area);
    }
    if let Some(notice) = app.notice.as_ref() {
        render_notice_modal(frame, area, notice);
    }
}

fn render_input(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let focused = app.focus == Focus::Input && app.editor.is_none();
    let border = if focused {
        COLOR_BORDER_INPUT
    } else {
        COLOR_MUTED_DARK
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("New task")
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(LABEL_WIDTH + 1)].as_ref())
        .split(inner);
    let field = chunks[0];
    let button = chunks[1];

    let width = field.width as usize;
    let text_style = Style::default().fg(COLOR_TEXT);
    let spans = if focused {
        value_with_caret_spans(app.input.value(), app.input.cursor(), width, text_style)
    } else if app.input.is_empty() {
        vec![Span::styled(
            truncate_text(PLACEHOLDER, width),
            Style::default().fg(COLOR_MUTED_DARK),
        )]
    } else {
        vec![Span::styled(truncate_text(app.input.value(), width), text_style)]
    };
    frame.render_widget(Paragraph::new(Line::from(spans)), field);

    let label = Control::Add.label();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(label, control_style(Control::Add)),
        ])),
        button,
    );

    if button.width > LABEL_WIDTH && button.height > 0 {
        app.hits.push(HitRegion {
            area: Rect::new(button.x + 1, button.y, LABEL_WIDTH, 1),
            target: HitTarget::Control(Control::Add, None),
        });
    }
    app.hits.push(HitRegion {
        area,
        target: HitTarget::InputField,
    });
}

fn render_list(frame: &mut Frame, app: &mut AppState, area: Rect, now: Instant) {
    let title = format!("Tasks ({})", app.store().len());
    let border = if app.focus == Focus::List || app.editor.is_some() {
        COLOR_BORDER_LIST
    } else {
        COLOR_MUTED_DARK
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.store().is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "No tasks yet",
                Style::default().fg(COLOR_MUTED),
            ))),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let (start, end) = model::list_window(
        app.store().len(),
        app.selected_index(),
        inner.height as usize,
    );
    let mut regions = Vec::new();
    for (offset, index) in (start..end).enumerate() {
        let Some(task) = app.store().tasks().get(index) else {
            continue;
        };
        let state = app.row_state(task.id, now);
        let selected = app.focus == Focus::List && app.selected == Some(task.id);
        let buffer = match state {
            RowState::Editing => app.editor.as_ref().map(|session| session.buffer()),
            _ => None,
        };
        let (line, controls) = render_row(task, state, selected, buffer, width);

        let y = inner.y + offset as u16;
        frame.render_widget(Paragraph::new(line), Rect::new(inner.x, y, inner.width, 1));
        for (control, column) in controls {
            regions.push(HitRegion {
                area: Rect::new(inner.x + column, y, LABEL_WIDTH, 1),
                target: HitTarget::Control(control, Some(task.id)),
            });
        }
        regions.push(HitRegion {
            area: Rect::new(inner.x, y, inner.width, 1),
            target: HitTarget::Row(task.id),
        });
    }
    app.hits.extend(regions);
}

/// One list row plus the column offset of each control drawn on it
pub(crate) fn render_row(
    task: &TaskRecord,
    state: RowState,
    selected: bool,
    buffer: Option<&LineBuffer>,
    width: usize,
) -> (Line<'static>, Vec<(Control, u16)>) {
    let controls = actions::row_controls(state == RowState::Editing);
    let controls_width = controls.len() * (LABEL_WIDTH as usize + 1);
    let text_width = width.saturating_sub(1 + MARKER_WIDTH + controls_width);

    let marker = if task.completed { "[✓] " } else { "[ ] " };
    let marker_style = if task.completed {
        Style::default().fg(COLOR_SUCCESS)
    } else {
        Style::default().fg(COLOR_MUTED)
    };
    let text_style = if task.completed {
        Style::default()
            .fg(COLOR_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut text_spans = match (state, buffer) {
        (RowState::Editing, Some(buffer)) => value_with_caret_spans(
            buffer.value(),
            buffer.cursor(),
            text_width,
            Style::default().fg(COLOR_TEXT).bg(COLOR_BG_MUTED),
        ),
        _ => vec![Span::styled(truncate_text(&task.text, text_width), text_style)],
    };
    let used: usize = text_spans.iter().map(Span::width).sum();
    if used < text_width {
        text_spans.push(Span::raw(" ".repeat(text_width - used)));
    }
    if selected {
        for span in &mut text_spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    let mut spans = vec![
        Span::styled(if selected { ">" } else { " " }, Style::default().fg(COLOR_ACCENT)),
        Span::styled(marker, marker_style),
    ];
    spans.extend(text_spans);

    let mut offsets = Vec::with_capacity(controls.len());
    let mut column = 1 + MARKER_WIDTH + used.max(text_width);
    for control in controls {
        spans.push(Span::raw(" "));
        column += 1;
        offsets.push((*control, column as u16));
        spans.push(Span::styled(control.label(), control_style(*control)));
        column += LABEL_WIDTH as usize;
    }

    if let RowState::Removing { progress } = state {
        let fg = fade_color(progress);
        for span in &mut spans {
            span.style = span.style.fg(fg).add_modifier(Modifier::DIM);
        }
    }

    (Line::from(spans), offsets)
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = app.footer_hint();
    let hint_span = Span::styled(hint, Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn render_notice_modal(frame: &mut Frame, area: Rect, notice: &str) {
    let content_width = area.width.saturating_sub(8).min(40);
    let modal = centered_rect(content_width, 6, area);
    frame.render_widget(Clear, modal);

    let lines = vec![
        Line::from(Span::styled(
            notice.to_string(),
            Style::default()
                .fg(COLOR_WARNING)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Notice"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_help_modal(frame: &mut Frame, area: Rect) {
    let content_width = area.width.saturating_sub(8).min(56);
    let lines = build_help_lines(content_width.saturating_sub(2) as usize);
    let modal = centered_rect(content_width, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, modal);
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn build_help_lines(width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        help_header("List"),
        help_line("j/k or up/down", "move selection", width),
    ];
    for (keys, desc) in actions::binding_help(LIST_BINDINGS) {
        lines.push(help_line(keys, desc, width));
    }
    lines.push(help_line("tab", "switch to input", width));
    lines.push(help_line("q/esc", "quit", width));

    lines.push(help_header("Input"));
    for (keys, desc) in actions::binding_help(INPUT_BINDINGS) {
        lines.push(help_line(keys, desc, width));
    }
    lines.push(help_line("tab/down", "switch to list", width));

    lines.push(help_header("Editing"));
    for (keys, desc) in actions::binding_help(EDIT_BINDINGS) {
        lines.push(help_line(keys, desc, width));
    }
    lines.push(help_line("up/down/tab", "leave, keeping changes", width));

    lines.push(help_line("ctrl+c", "quit", width));
    lines.push(help_line("?", "hide help", width));
    lines
}

fn help_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD),
    ))
}

fn help_line(keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let desc_text = truncate_text(desc, desc_width);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(COLOR_MUTED)),
    ])
}

fn control_style(control: Control) -> Style {
    let color = match control {
        Control::Add | Control::Save => COLOR_SUCCESS,
        Control::Delete => COLOR_ERROR,
        Control::Cancel => COLOR_WARNING,
        Control::Edit | Control::ToggleComplete => COLOR_ACCENT,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Text color partway from normal to background
fn fade_color(progress: f32) -> Color {
    let progress = progress.clamp(0.0, 1.0);
    let blend = |from: u8, to: u8| -> u8 {
        let value = from as f32 + (to as f32 - from as f32) * progress;
        value.round() as u8
    };
    match (COLOR_TEXT, COLOR_BG_MUTED) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            Color::Rgb(blend(r1, r2), blend(g1, g2), blend(b1, b2))
        }
        _ => COLOR_MUTED_DARK,
    }
}

fn value_with_caret_spans(
    value: &str,
    cursor: usize,
    width: usize,
    style: Style,
) -> Vec<Span<'static>> {
    if width == 0 {
        return vec![Span::raw("")];
    }
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();
    let cursor = cursor.min(len);
    if len == 0 {
        return vec![Span::styled(
            " ".to_string(),
            style.add_modifier(Modifier::REVERSED),
        )];
    }

    // Window of chars, measured in cells, that always contains the caret.
    let cells = |c: &char| c.width().unwrap_or(0);
    let caret_at_end = cursor == len;
    let available = if caret_at_end {
        width.saturating_sub(1)
    } else {
        width
    };
    let mut end = if caret_at_end { len } else { cursor + 1 };
    let mut start = 0usize;
    let mut used: usize = chars[..end].iter().map(cells).sum();
    while used > available && start < cursor {
        used -= cells(&chars[start]);
        start += 1;
    }
    while end < len && used + cells(&chars[end]) <= available {
        used += cells(&chars[end]);
        end += 1;
    }
    while start > 0 && used + cells(&chars[start - 1]) <= available {
        start -= 1;
        used += cells(&chars[start]);
    }
    let window = &chars[start..end];

    if caret_at_end {
        let text: String = window.iter().collect();
        let mut spans = Vec::new();
        if !text.is_empty() {
            spans.push(Span::styled(text, style));
        }
        spans.push(Span::styled(
            " ".to_string(),
            style.add_modifier(Modifier::REVERSED),
        ));
        return spans;
    }

    let caret_index = cursor - start;
    let before: String = window[..caret_index].iter().collect();
    let caret_char = window.get(caret_index).copied().unwrap_or(' ');
    let after: String = window[caret_index.saturating_add(1)..].iter().collect();

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::styled(before, style));
    }
    spans.push(Span::styled(
        caret_char.to_string(),
        style.add_modifier(Modifier::REVERSED),
    ));
    if !after.is_empty() {
        spans.push(Span::styled(after, style));
    }
    spans
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn pad_text(value: &str, width: usize) -> String {
    let text = truncate_text(value, width);
    let used = text.width();
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

/// Cut `value` to at most `max` terminal cells, ending in "..." when cut
fn truncate_text(value: &str, max: usize) -> String {
    if value.width() <= max {
        return value.to_string();
    }
    let (budget, ellipsis) = if max <= 3 { (max, "") } else { (max - 3, "...") };
    let mut out = String::new();
    let mut used = 0;
    for c in value.chars() {
        let cells = c.width().unwrap_or(0);
        if used + cells > budget {
            break;
        }
        used += cells;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}
