//! Trainer application: routes key events to the game and the tone engine
//! and draws the screen.

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use rand::rngs::ThreadRng;
use ratatui::{DefaultTerminal, Frame};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use ear_trainer::{
    catalog::NOTES, render::DrawingSurface, DisplayList, StaffRenderer, StaffStyle, ToneEngine,
};

use crate::{
    audio::CpalHost,
    keys,
    trainer::{Trainer, Verdict},
    ui,
};

/// Samples kept for the scope
const SCOPE_WINDOW: usize = 1024;

/// How long a tapped key sounds when the terminal cannot report releases
const TAP_HOLD: f64 = 0.4;

pub struct App {
    engine: ToneEngine<CpalHost>,
    trainer: Trainer,
    rng: ThreadRng,
    renderer: StaffRenderer,
    staff: DisplayList,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    held: [bool; NOTES.len()],
    /// Terminal reports key releases, so notes are held while pressed
    key_release: bool,
    should_quit: bool,
}

impl App {
    pub fn new(engine: ToneEngine<CpalHost>, scope_rx: Consumer<f32>, key_release: bool) -> Self {
        let mut rng = rand::rng();
        let trainer = Trainer::new(&mut rng);
        Self {
            engine,
            trainer,
            rng,
            renderer: StaffRenderer::new(StaffStyle::default()),
            staff: DisplayList::new(0.0, 0.0),
            scope_rx,
            scope: vec![0.0; SCOPE_WINDOW],
            held: [false; NOTES.len()],
            key_release,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.engine.tick();
            self.trainer.update(Instant::now(), &mut self.rng);

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        Ok(())
    }

    /// Keep the last SCOPE_WINDOW samples from the audio callback
    fn poll_audio(&mut self) {
        let mut fresh = false;
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
            fresh = true;
        }
        if fresh && self.scope.len() > SCOPE_WINDOW {
            let excess = self.scope.len() - SCOPE_WINDOW;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => self.press(key.code),
            KeyEventKind::Release => self.release(key.code),
            KeyEventKind::Repeat => {}
        }
    }

    fn press(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.trainer.toggle_mode(Instant::now(), &mut self.rng),
            KeyCode::F(1) => {
                self.trainer.toggle_note_names();
            }
            KeyCode::F(2) => {
                self.engine.toggle_mute();
            }
            KeyCode::Char(c) => {
                if let Some(index) = keys::note_index(c) {
                    self.play(index);
                }
            }
            _ => {}
        }
    }

    fn play(&mut self, index: usize) {
        // Audio opens on the first note played
        self.engine.initialize();

        let frequency = NOTES[index].frequency_hz;
        if self.key_release {
            if self.held[index] {
                return;
            }
            self.held[index] = true;
            self.engine.play_tone(frequency);
        } else {
            self.engine.play_tone_for(frequency, TAP_HOLD);
        }

        match self.trainer.press(index, Instant::now()) {
            Verdict::Correct => self.engine.play_success_sound(),
            Verdict::Incorrect => self.engine.play_error_sound(),
            Verdict::Ignored | Verdict::Played => {}
        }
    }

    fn release(&mut self, code: KeyCode) {
        let KeyCode::Char(c) = code else {
            return;
        };
        let Some(index) = keys::note_index(c) else {
            return;
        };
        self.held[index] = false;
        self.engine.stop_tone(NOTES[index].frequency_hz);
        self.trainer.release(index);
    }

    fn render(&mut self, frame: &mut Frame) {
        let areas = ui::layout(frame.area());

        let (width, height) = ui::staff::surface_size(areas.staff);
        if (width, height) != self.staff.size() {
            self.staff.set_size(width, height);
            self.renderer.resize(height, &mut self.staff);
        }
        if self.trainer.take_dirty() {
            let (target, played) = self.trainer.scene();
            self.renderer.render(&mut self.staff, target, &played);
        }

        ui::render_status(
            frame,
            areas.status,
            &self.trainer,
            self.engine.is_muted(),
            self.engine.is_initialized(),
        );
        ui::render_staff(frame, areas.staff, &self.staff);
        ui::render_waveform(frame, areas.waveform, &self.scope);
        ui::render_keys(
            frame,
            areas.keys,
            self.trainer.show_note_names(),
            &self.held,
        );
        ui::render_help(frame, areas.help);
    }
}
