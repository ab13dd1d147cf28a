use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use crate::session::lap_splits;
use crate::stats::{start_of_day, start_of_month, start_of_week};
use crate::stopwatch::Phase;
use crate::util::{format_clock, format_duration};
use crate::{App, Tab};
use chrono::Local;

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

pub fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let snap = self.stopwatch.snapshot();

        // Tiny terminals get the clock and nothing else.
        if area.height < 10 || area.width < 30 {
            let clock = Paragraph::new(Span::styled(format_clock(snap.elapsed_ms), bold_style))
                .alignment(Alignment::Center);
            clock.render(area, buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1), // header
                    Constraint::Length(2), // clock
                    Constraint::Length(1), // tab line
                    Constraint::Min(1),    // body
                    Constraint::Length(1), // status
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        let header = Paragraph::new(Span::styled(
            format!(
                "takt · {} sessions · total {}",
                self.history.len(),
                format_duration(self.history.total_duration())
            ),
            dim_style,
        ))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let phase_style = match snap.phase {
            Phase::Running => Style::default().fg(Color::Green).patch(bold_style),
            Phase::Paused => Style::default().fg(Color::Yellow).patch(bold_style),
            Phase::Stopped => dim_style.patch(bold_style),
        };
        let clock = Paragraph::new(Line::from(vec![
            Span::styled(format_clock(snap.elapsed_ms), bold_style),
            Span::raw("  "),
            Span::styled(snap.phase.to_string(), phase_style),
        ]))
        .alignment(Alignment::Center);
        clock.render(chunks[1], buf);

        let tab_line = Paragraph::new(Line::from(
            [Tab::Laps, Tab::Stats, Tab::History]
                .iter()
                .flat_map(|t| {
                    let label = match t {
                        Tab::Laps => " Laps ",
                        Tab::Stats => " Stats ",
                        Tab::History => " History ",
                    };
                    let style = if *t == self.tab {
                        bold_style.add_modifier(Modifier::UNDERLINED)
                    } else {
                        dim_style
                    };
                    vec![Span::styled(label, style)]
                })
                .collect::<Vec<Span>>(),
        ))
        .alignment(Alignment::Center);
        tab_line.render(chunks[2], buf);

        if self.confirm_clear {
            let confirm = Paragraph::new(Span::styled(
                "Clear all session history? This cannot be undone. (y/n)",
                Style::default().fg(Color::Red).patch(bold_style),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            confirm.render(chunks[3], buf);
        } else {
            match self.tab {
                Tab::Laps => render_laps(self, chunks[3], buf),
                Tab::Stats => render_stats(self, chunks[3], buf),
                Tab::History => render_history(self, chunks[3], buf),
            }
        }

        if let Some(status) = &self.status {
            let line = Paragraph::new(Span::styled(
                status.clone(),
                Style::default().fg(Color::Red),
            ))
            .alignment(Alignment::Center);
            line.render(chunks[4], buf);
        }

        let mut legend =
            "space start/pause · s stop & save · l lap · r reset · c clear history · tab view · esc quit"
                .to_string();
        if legend.width() > chunks[5].width as usize {
            legend = "space · s · l · r · c · tab · esc".to_string();
        }
        Paragraph::new(Span::styled(legend, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}

fn render_laps(app: &App, area: Rect, buf: &mut Buffer) {
    let snap = app.stopwatch.snapshot();
    if snap.laps.is_empty() {
        empty_state("No lap times recorded yet. Press l while running", area, buf);
        return;
    }

    let splits = lap_splits(&snap.laps);
    let lines: Vec<Line> = snap
        .laps
        .iter()
        .zip(splits.iter())
        .enumerate()
        .rev()
        .take(area.height as usize)
        .map(|(idx, (lap, split))| {
            Line::from(vec![
                Span::styled(
                    format!("Lap {:>3}  ", idx + 1),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>9}", lap.display)),
                Span::styled(
                    format!("  (+{})", format_duration(*split)),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ])
        })
        .collect();

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_stats(app: &App, area: Rect, buf: &mut Buffer) {
    let now = Local::now();
    let windows = [
        ("Today", start_of_day(now)),
        ("This week", start_of_week(now, app.week_start)),
        ("This month", start_of_month(now)),
    ];

    let mut lines: Vec<Line> = vec![];
    for (label, start) in windows {
        let stats = app.history.stats_since(start);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{label:<11}"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "{:>4} sessions   total {:>9}   avg {:>9}",
                stats.count,
                format_duration(stats.total_ms),
                format_duration(stats.average_ms)
            )),
        ]));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)].as_ref())
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    // Recent session durations, oldest to newest.
    let points: Vec<(f64, f64)> = app
        .history
        .recent(30)
        .iter()
        .rev()
        .enumerate()
        .map(|(i, s)| (i as f64, s.duration as f64 / 1000.0))
        .collect();

    if points.len() >= 2 && chunks[1].height >= 4 {
        let (x_max, y_max) = chart_bounds(&points);
        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&points)];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("session")
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format_axis_label(x_max)),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("secs")
                    .bounds([0.0, y_max])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format_axis_label(y_max)),
                    ]),
            );
        chart.render(chunks[1], buf);
    }
}

fn render_history(app: &App, area: Rect, buf: &mut Buffer) {
    if app.history.is_empty() {
        empty_state("No sessions recorded yet. Press s to save a run", area, buf);
        return;
    }

    let now = Local::now();
    let lines: Vec<Line> = app
        .history
        .recent(app.history_limit)
        .iter()
        .map(|session| {
            let age_secs = (now - session.timestamp).num_seconds().max(0) as u64;
            let age = HumanTime::from(std::time::Duration::from_secs(age_secs))
                .to_text_en(Accuracy::Rough, Tense::Past);
            Line::from(vec![
                Span::styled(
                    format!("{age:<24}"),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::styled(
                    format!("{:>9}", session.display_duration),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {:>2} laps", session.laps.len())),
            ])
        })
        .collect();

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn empty_state(message: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        message,
        Style::default()
            .add_modifier(Modifier::DIM)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(area, buf);
}

/// Axis bounds for the recent-durations chart
pub fn chart_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let mut y_max: f64 = 0.0;
    for &(_, y) in points {
        if y > y_max {
            y_max = y;
        }
    }
    let x_max = points.last().map(|p| p.0).unwrap_or(1.0).max(1.0);
    (x_max, y_max.ceil().max(1.0))
}

fn format_axis_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
