pub mod gauges;
pub mod model;
pub mod netdisk;
pub mod power;
pub mod processes;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLayout {
    Default,
    Alternative,
}

impl GridLayout {
    pub fn toggle(self) -> Self {
        match self {
            GridLayout::Default => GridLayout::Alternative,
            GridLayout::Alternative => GridLayout::Default,
        }
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    match app.layout {
        GridLayout::Default => draw_default(frame, app),
        GridLayout::Alternative => draw_alternative(frame, app),
    }
}

/// Gauges in the top half, model/net/power panels mid-row, memory across
/// the bottom.
fn draw_default(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(frame.area());

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[1]);

    gauges::render_ecpu(frame, left[0], &app.cpu, &app.theme);
    gauges::render_pcpu(frame, left[1], &app.cpu, &app.theme);
    gauges::render_gpu(frame, right[0], &app.gpu, &app.theme);
    gauges::render_ane(frame, right[1], &app.cpu, &app.theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 6),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(rows[1]);

    model::render(frame, middle[0], &app.soc, &app.theme);
    netdisk::render(frame, middle[1], &app.netdisk, &app.theme);
    power::render_breakdown(frame, middle[2], &app.cpu, &app.theme);
    power::render_trend(
        frame,
        middle[3],
        &app.power_trend,
        app.cpu.package_w,
        &app.theme,
    );

    gauges::render_memory(frame, rows[2], &app.memory, &app.theme);
}

/// Same content with the process table promoted into the top half.
fn draw_alternative(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(frame.area());

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[0]);

    gauges::render_ecpu(frame, left[0], &app.cpu, &app.theme);
    gauges::render_pcpu(frame, left[1], &app.cpu, &app.theme);
    processes::render(frame, halves[1], &app.processes, &app.theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(rows[1]);

    gauges::render_gpu(frame, middle[0], &app.gpu, &app.theme);
    gauges::render_ane(frame, middle[1], &app.cpu, &app.theme);
    power::render_breakdown(frame, middle[2], &app.cpu, &app.theme);
    power::render_trend(
        frame,
        middle[3],
        &app.power_trend,
        app.cpu.package_w,
        &app.theme,
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 2),
            Constraint::Ratio(1, 6),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[2]);

    gauges::render_memory(frame, bottom[0], &app.memory, &app.theme);
    model::render(frame, bottom[1], &app.soc, &app.theme);
    netdisk::render(frame, bottom[2], &app.netdisk, &app.theme);
}
