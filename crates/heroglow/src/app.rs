use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use heroglow_config::Config;
use heroglow_core::{MAX_ENTITIES, Rgb};
use heroglow_scene::{HeroScene, Tier};
use log::info;
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style, Stylize},
    text::Line,
};

/// The interactive application: a full-screen hero with a title overlay.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Frames are not advanced while paused.
    paused: bool,
    hero: HeroScene<StdRng>,
    max_entities: u32,
    frame_duration: Duration,
    last_frame: Instant,
}

impl App {
    pub fn new(config: &Config, rng: StdRng) -> Self {
        Self {
            running: false,
            paused: false,
            hero: HeroScene::mount(
                config.scene,
                config.max_entities,
                &config.tuning,
                config.speed,
                rng,
            ),
            max_entities: config.max_entities,
            frame_duration: config.frame_duration(),
            last_frame: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.last_frame = Instant::now();
        while self.running {
            self.advance();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.hero.teardown();
        Ok(())
    }

    /// Hand the elapsed wall time to the scene.
    fn advance(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if !self.paused {
            self.hero.on_frame(dt);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        self.hero.render(frame, area);

        let Rgb(r, g, b) = Tier::Standard.color();
        let accent = Color::Rgb(r, g, b);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Title
            Constraint::Length(1), // Status
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let title = Line::from("h e r o g l o w".bold().fg(accent)).centered();
        frame.render_widget(title, chunks[1]);

        let status = if self.hero.is_blank() {
            format!("{} · blank", self.hero.kind())
        } else {
            format!(
                "{} · {}/{} · {}{}",
                self.hero.kind(),
                self.hero.active_count(),
                self.max_entities,
                self.hero.speed(),
                if self.paused { " · paused" } else { "" }
            )
        };
        frame.render_widget(
            Line::from(status).style(Style::new().dark_gray()).centered(),
            chunks[2],
        );

        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".dark_gray(),
            "s".bold().fg(accent),
            " scene  ".dark_gray(),
            "+/-".bold().fg(accent),
            " entities  ".dark_gray(),
            "p".bold().fg(accent),
            " pause  ".dark_gray(),
            "f".bold().fg(accent),
            " speed".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[4]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most one frame so the animation keeps its rate.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self.frame_duration.saturating_sub(self.last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s')) => self.cycle_scene(),
            (_, KeyCode::Char('+') | KeyCode::Char('=')) => self.change_max_entities(1),
            (_, KeyCode::Char('-')) => self.change_max_entities(-1),
            (_, KeyCode::Char('p')) => self.paused = !self.paused,
            (_, KeyCode::Char('f')) => self.cycle_speed(),
            _ => {}
        }
    }

    fn cycle_scene(&mut self) {
        let kind = self.hero.kind().next();
        info!("switching to {kind} scene");
        self.hero.remount(kind, self.max_entities);
    }

    fn change_max_entities(&mut self, delta: i32) {
        let next = self
            .max_entities
            .saturating_add_signed(delta)
            .min(MAX_ENTITIES);
        if next == self.max_entities {
            return;
        }
        self.max_entities = next;
        self.hero.remount(self.hero.kind(), next);
    }

    fn cycle_speed(&mut self) {
        self.hero.set_speed(self.hero.speed().next());
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
