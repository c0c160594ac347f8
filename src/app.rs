use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::event::{Event, EventHandler};
use crate::metrics::memory::MemoryCollector;
use crate::metrics::snapshot::{
    CpuMetrics, GpuMetrics, MemoryMetrics, NetDiskMetrics, ProcessRecord,
};
use crate::sampler::MetricStreams;
use crate::soc::SocInfo;
use crate::throttle::UpdateThrottler;
use crate::ui::theme::Theme;
use crate::ui::{self, GridLayout};

/// Window over which published total-power samples are averaged into one
/// trend entry.
const TREND_WINDOW: Duration = Duration::from_secs(2);
const TREND_CAPACITY: usize = 25;

pub struct Keybinds {
    pub quit: KeyCode,
    pub toggle_layout: KeyCode,
    pub redraw: KeyCode,
}

impl Keybinds {
    fn from_config(kb: &KeybindsConfig) -> Self {
        Keybinds {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            toggle_layout: parse_key(&kb.toggle_layout).unwrap_or(KeyCode::Char('l')),
            redraw: parse_key(&kb.redraw).unwrap_or(KeyCode::Char('r')),
        }
    }
}

pub struct App {
    pub running: bool,
    pub layout: GridLayout,
    pub theme: Theme,
    pub keybinds: Keybinds,
    pub soc: SocInfo,
    pub cpu: CpuMetrics,
    pub gpu: GpuMetrics,
    pub netdisk: NetDiskMetrics,
    pub processes: Vec<ProcessRecord>,
    pub memory: MemoryMetrics,
    pub power_trend: VecDeque<u64>,
    interval_ms: u64,
    memory_collector: MemoryCollector,
    window_values: Vec<f64>,
    window_started: Instant,
}

impl App {
    pub fn new(config: &Config, soc: SocInfo) -> Self {
        App {
            running: true,
            layout: GridLayout::Default,
            theme: Theme::from_name(&config.colors.accent),
            keybinds: Keybinds::from_config(&config.keybinds),
            soc,
            cpu: CpuMetrics::default(),
            gpu: GpuMetrics::default(),
            netdisk: NetDiskMetrics::default(),
            processes: Vec::new(),
            memory: MemoryMetrics::default(),
            power_trend: VecDeque::new(),
            interval_ms: config.general.interval_ms,
            memory_collector: MemoryCollector::new(),
            window_values: Vec::new(),
            window_started: Instant::now(),
        }
    }

    /// Drains the metric streams and the event source until quit, stream
    /// end, or cancellation. Repaints happen only on throttle triggers and
    /// on explicit key or resize handling.
    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        mut streams: MetricStreams,
        cancel: CancellationToken,
    ) -> color_eyre::Result<()> {
        let mut events = EventHandler::new();
        let grace = Duration::from_millis(self.interval_ms / 2);
        let (throttler, mut redraw_rx) = UpdateThrottler::new(grace);

        terminal.draw(|frame| ui::draw(frame, &self))?;

        while self.running {
            tokio::select! {
                maybe = streams.cpu.recv() => match maybe {
                    Some(cpu) => {
                        self.on_cpu_update(cpu);
                        throttler.notify();
                    }
                    None => break,
                },
                maybe = streams.gpu.recv() => match maybe {
                    Some(gpu) => {
                        self.gpu = gpu;
                        throttler.notify();
                    }
                    None => break,
                },
                maybe = streams.netdisk.recv() => match maybe {
                    Some(netdisk) => {
                        self.netdisk = netdisk;
                        throttler.notify();
                    }
                    None => break,
                },
                maybe = streams.processes.recv() => match maybe {
                    Some(processes) => {
                        self.processes = processes;
                        throttler.notify();
                    }
                    None => break,
                },
                _ = redraw_rx.recv() => {
                    terminal.draw(|frame| ui::draw(frame, &self))?;
                }
                maybe_event = events.next() => match maybe_event {
                    Some(Event::Key(key)) => {
                        let action = self.map_key(key);
                        if action == Action::Redraw {
                            terminal.clear()?;
                        }
                        if self.dispatch(action) {
                            terminal.draw(|frame| ui::draw(frame, &self))?;
                        }
                    }
                    Some(Event::Resize) => {
                        terminal.draw(|frame| ui::draw(frame, &self))?;
                    }
                    Some(Event::Quit) | None => break,
                },
                _ = cancel.cancelled() => break,
            }
        }

        cancel.cancel();
        Ok(())
    }

    fn on_cpu_update(&mut self, cpu: CpuMetrics) {
        self.push_power_sample(cpu.package_w);
        self.cpu = cpu;
        // Memory is polled on the same cadence as the CPU stream so the
        // gauge moves with the rest of the dashboard.
        self.memory = self.memory_collector.poll();
    }

    fn push_power_sample(&mut self, package_w: f64) {
        self.window_values.push(package_w);
        let now = Instant::now();
        if now.duration_since(self.window_started) >= TREND_WINDOW {
            let sum: f64 = self.window_values.iter().sum();
            let average = (sum / self.window_values.len() as f64).round();
            self.power_trend.push_front(average as u64);
            self.power_trend.truncate(TREND_CAPACITY);
            self.window_values.clear();
            self.window_started = now;
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match key.code {
            code if code == self.keybinds.quit => Action::Quit,
            code if code == self.keybinds.toggle_layout => Action::ToggleLayout,
            code if code == self.keybinds.redraw => Action::Redraw,
            _ => Action::None,
        }
    }

    /// Applies an action to the app state. Returns whether the screen needs
    /// repainting.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.running = false;
                false
            }
            Action::ToggleLayout => {
                self.layout = self.layout.toggle();
                true
            }
            Action::Redraw => true,
            Action::None => false,
        }
    }
}
