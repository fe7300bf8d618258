//! TUI rendering.
//!
//! ┌ wavedrift ─ dark · Muted Violet ─────────────┐
//! │ ⣀⡠⠤⠒⠊⠉⠉⠒⠢⠤⣀ wave ribbon (braille canvas) ⣀⠤⠒ │
//! └──────────────────────────────────────────────┘
//! ┌──────────────────────────────────────────────┐
//! │ Rust · Wasm · Tokio · Rust · Wasm · Tokio ·  │
//! └──────────────────────────────────────────────┘
//!  v +12.40  flow forward  t 3.21  offset -12.5%
//!  ↑↓/wheel scroll   t theme   c accent   p pause

use super::app::App;
use ratatui::widgets::canvas::{Canvas, Line as Segment};
use ratatui::{prelude::*, widgets::*};
use wavedrift_core::Rgb;

const SEPARATOR: &str = " · ";

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // wave
            Constraint::Length(3), // marquee
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_wave(f, rows[0], app);
    draw_marquee(f, rows[1], app);
    draw_status(f, rows[2], app);
    draw_keys(f, rows[3]);
}

pub fn tui_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn draw_wave(f: &mut Frame, area: Rect, app: &App) {
    let style = app.style();
    let background = style.background();
    let accent = style.primary().unwrap_or(style.theme().palette()[0].rgb);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tui_color(accent)))
        .title(Line::from(vec![
            Span::styled(" wavedrift ", Style::default().bold().fg(tui_color(accent))),
            Span::styled(
                format!(" {} · {} ", style.theme(), app.accent_name()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

    let Some(wave) = app.wave() else {
        let p = Paragraph::new("paused (p to resume)")
            .alignment(Alignment::Center)
            .style(Style::default().bg(tui_color(background)).fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let state = wave.state().borrow();
    let size = state.renderer.size();
    let surface = &state.surface;

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .background_color(tui_color(background))
        .x_bounds([0.0, size.width])
        .y_bounds([0.0, size.height])
        .paint(|ctx| {
            for stroke in surface.strokes() {
                // Braille dots have no alpha; pre-blend over the page.
                let rgb = stroke.color.rgb.blend_over(background, stroke.color.alpha);
                let color = tui_color(rgb);
                for pair in stroke.points.windows(2) {
                    // Canvas y grows upwards, page y grows downwards.
                    ctx.draw(&Segment::new(
                        pair[0].x,
                        size.height - pair[0].y,
                        pair[1].x,
                        size.height - pair[1].y,
                        color,
                    ));
                }
            }
        });
    f.render_widget(canvas, area);
}

fn draw_marquee(f: &mut Frame, area: Rect, app: &App) {
    let style = app.style();
    let accent = style.primary().unwrap_or(style.theme().palette()[0].rgb);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tui_color(accent)));
    let inner_width = area.width.saturating_sub(2) as usize;

    let text = match app.marquee() {
        Some(m) => {
            let state = m.state().borrow();
            let percent = state.target.percent.unwrap_or(0.0);
            state.renderer.strip().window(SEPARATOR, percent, inner_width)
        }
        None => String::new(),
    };

    let p = Paragraph::new(text)
        .style(
            Style::default()
                .bg(tui_color(accent))
                .fg(tui_color(accent.contrast_text()))
                .bold(),
        )
        .block(block);
    f.render_widget(p, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if let Some(wave) = app.wave() {
        let state = wave.state().borrow();
        if let Some(m) = state.last_motion {
            spans.push(Span::styled(
                format!(" v {:+7.2}", m.velocity),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(format!("  flow {:<7}", m.direction.to_string())));
            spans.push(Span::raw(format!("  t {:8.3}", m.phase)));
        }
    }
    if let Some(marquee) = app.marquee() {
        let offset = marquee.state().borrow().renderer.offset();
        spans.push(Span::raw(format!("  offset {offset:7.2}%")));
    }
    spans.push(Span::styled(
        format!("  scroll {:.0}/{:.0}", app.scroll(), app.max_scroll()),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(
        " ↑↓/wheel scroll   PgUp/PgDn page   t theme   c/C accent   p pause   q quit",
    )
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
