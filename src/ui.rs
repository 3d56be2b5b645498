use crate::app::{App, RunStatus};
use crate::braille;
use crate::walker::Direction;
use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(9),  // Status
            Constraint::Length(10), // Tally
            Constraint::Min(4),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_tally_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn status_color(status: RunStatus) -> Color {
    match status {
        RunStatus::Waiting | RunStatus::Paused => HIGHLIGHT_COLOR,
        RunStatus::Complete => Color::Green,
        RunStatus::Running => BORDER_COLOR,
    }
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Lightning ");
    let sim = &app.simulation;
    let grid = sim.grid();
    let status = app.status();
    let (walker_x, walker_y) = sim.walker().position();
    let text = Style::default().fg(TEXT_COLOR);
    let dim = Style::default().fg(DIM_TEXT_COLOR);

    let content = vec![
        Line::from(Span::styled(
            format!("{0}x{0} r={1}", grid.side(), grid.radius()),
            text,
        )),
        Line::from(Span::styled(format!("Frozen: {}", sim.freezes()), text)),
        Line::from(Span::styled(format!("Steps:  {}", sim.steps()), text)),
        Line::from(Span::styled(format!("Walker: ({}, {})", walker_x, walker_y), dim)),
        Line::from(Span::styled(format!("Speed:  {}/frame", app.settings.steps_per_frame), dim)),
        Line::from(Span::styled(format!("Colors: {}", app.settings.palette.name()), dim)),
        Line::from(Span::styled(status.label(), Style::default().fg(status_color(status)))),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tally_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Directions ");
    let tally = app.simulation.tally();
    let total = tally.total().max(1) as f64;

    let content: Vec<Line> = Direction::ALL
        .iter()
        .map(|&dir| {
            let count = tally.count(dir);
            Line::from(vec![
                Span::styled(
                    format!("[{}] {:<2}", dir.code(), dir.short_name()),
                    Style::default().fg(HIGHLIGHT_COLOR),
                ),
                Span::styled(
                    format!(" {:>8} {:>5.1}%", count, count as f64 * 100.0 / total),
                    Style::default().fg(TEXT_COLOR),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, _app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume"),
        make_control("+/-", "speed"),
        make_control("R", "restart"),
        make_control("C", "colors"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let palette = app.settings.palette;
    let style = Style::default().fg(palette.foreground()).bg(palette.background());
    let buf = frame.buffer_mut();
    buf.set_style(inner, style);

    let cells = braille::render_to_braille(
        &app.canvas,
        app.canvas.width(),
        app.canvas.height(),
        inner.width,
        inner.height,
    );

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            buf[(x, y)].set_char(cell.char);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(24);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let content = help_lines();
    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2);
    let is_scrollable = content_height > visible_height;

    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled("DIFFUSION-LIMITED AGGREGATION", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("A particle leaves the center and walks randomly until it touches the bright ring. It freezes there and the next one starts from the center."),
        Line::from(""),
        Line::from("The ring erodes inward into a lightning-like fractal. The run ends when the frozen region touches the center."),
        Line::from(""),
        Line::from(Span::styled("DIRECTIONS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Each step draws one of 8 moves uniformly; the sidebar counts how often each was drawn."),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, +/-=Speed, R=Restart, C=Colors, V=Fullscreen, Q=Quit"),
        Line::from(""),
    ]
}

/// Furthest the help text can scroll: its last line at the top
pub fn help_max_scroll() -> u16 {
    (help_lines().len() as u16).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::settings::RunSettings;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_shows_status_and_tally() {
        let settings = RunSettings {
            size: 41,
            seed: Some(3),
            start_delay_ms: 0,
            ..RunSettings::default()
        };
        let mut app = App::new(settings).unwrap();
        app.tick().unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("41x41"));
        assert!(text.contains("[0] E"));
        assert!(text.contains("Frozen:"));
        // The filled ring shows up as Braille dots
        assert!(text.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
    }

    #[test]
    fn test_canvas_uses_palette_background() {
        let settings = RunSettings {
            size: 41,
            seed: Some(3),
            ..RunSettings::default()
        };
        let mut app = App::new(settings).unwrap();
        app.cycle_palette();
        let palette = app.settings.palette;
        assert_eq!(palette, Palette::Plasma);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        // Inside the canvas border, right of the sidebar
        let cell = &buffer[(SIDEBAR_WIDTH + 1, 1)];
        assert_eq!(cell.bg, palette.background());
        assert_eq!(cell.fg, palette.foreground());
    }

    #[test]
    fn test_help_scroll_stops_at_last_line() {
        let mut app = App::new(RunSettings {
            size: 21,
            ..RunSettings::default()
        })
        .unwrap();
        app.toggle_help();
        for _ in 0..100 {
            app.scroll_help_down(help_max_scroll());
        }
        assert_eq!(app.help_scroll as usize, help_lines().len() - 1);
    }
}
