//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::blog::{self, BlogOutcome, BlogPipeline, Stage};
use crate::config::Settings;
use crate::tui::screens::{Field, FormScreen, PostScreen};
use crate::tui::widgets::HelpPopup;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Form,
    Post,
}

/// What the status line shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Working(Stage),
    Success(String),
    Warning(String),
    Error(String),
}

/// A request running on the runtime while the UI keeps drawing
struct PendingRequest {
    handle: JoinHandle<crate::Result<BlogOutcome>>,
    stage: watch::Receiver<Stage>,
}

/// Main application state
pub struct App {
    settings: Settings,
    current_screen: AppScreen,
    show_help: bool,
    quit: bool,

    // Screen states
    form: FormScreen,
    post: PostScreen,

    status: Status,
    pipeline: Option<Arc<BlogPipeline>>,
    pending: Option<PendingRequest>,
    started: Instant,
}

impl App {
    /// Create a new app instance
    pub fn new(settings: Settings) -> Result<Self> {
        let form = FormScreen::new(settings.blog.default_word_count);

        Ok(Self {
            settings,
            current_screen: AppScreen::Form,
            show_help: false,
            quit: false,
            form,
            post: PostScreen::new(),
            status: Status::Idle,
            pipeline: None,
            pending: None,
            started: Instant::now(),
        })
    }

    pub fn current_screen(&self) -> AppScreen {
        self.current_screen
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Draw the current screen
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let spinner = self.spinner_frame();

        match self.current_screen {
            AppScreen::Form => {
                self.form.draw(frame, area, &self.status, spinner);
            }
            AppScreen::Post => {
                self.post.draw(frame, area, &self.status, spinner);
            }
        }

        // Draw help popup if active
        if self.show_help {
            HelpPopup::draw(frame, area, self.current_screen);
        }
    }

    fn spinner_frame(&self) -> &'static str {
        let tick = (self.started.elapsed().as_millis() / 100) as usize;
        SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.current_screen {
            AppScreen::Form => self.handle_form_key(key),
            AppScreen::Post => self.handle_post_key(key),
        }
    }

    /// Handle form key input
    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::F(1) => self.toggle_help(),
            KeyCode::F(2) => {
                if self.post.has_post() {
                    self.current_screen = AppScreen::Post;
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::BackTab => self.form.toggle_focus(),
            code => match self.form.focus() {
                Field::Url => match code {
                    KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.form.clear_url();
                    }
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.form.push_char(c);
                    }
                    KeyCode::Backspace => self.form.backspace(),
                    _ => {}
                },
                Field::WordCount => match code {
                    KeyCode::Right | KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('l') => {
                        self.form.increase();
                    }
                    KeyCode::Left | KeyCode::Down | KeyCode::Char('-') | KeyCode::Char('h') => {
                        self.form.decrease();
                    }
                    _ => {}
                },
            },
        }
    }

    /// Handle post key input
    fn handle_post_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.current_screen = AppScreen::Form;
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.toggle_help(),
            KeyCode::Up | KeyCode::Char('k') => self.post.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.post.scroll_down(),
            KeyCode::PageUp => self.post.page_up(),
            KeyCode::PageDown => self.post.page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.post.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.post.scroll_to_bottom(),
            KeyCode::Char('t') => self.post.toggle_transcript(),
            KeyCode::Char('d') => self.download(),
            _ => {}
        }
    }

    /// Validate the form and start a request in the background
    fn submit(&mut self) {
        if self.pending.is_some() {
            return;
        }

        let request = self.form.request();
        if request.url.is_empty() {
            self.status = Status::Warning("Please enter a valid YouTube URL.".to_string());
            return;
        }

        let video = match request.video() {
            Ok(video) => video,
            Err(e) => {
                self.status = Status::Error(e.to_string());
                return;
            }
        };

        let pipeline = match self.pipeline() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                self.status = Status::Error(format!("{:#}", e));
                return;
            }
        };

        tracing::info!("Generating ~{} word post for {}", request.word_count, video);

        let (tx, rx) = watch::channel(Stage::FetchingTranscript);
        let word_count = request.word_count;
        let handle = tokio::spawn(async move {
            let progress = move |stage: Stage| {
                let _ = tx.send(stage);
            };
            pipeline.run(&video, word_count, &progress).await
        });

        self.status = Status::Working(Stage::FetchingTranscript);
        self.pending = Some(PendingRequest { handle, stage: rx });
    }

    /// Pipeline for this session, built on first use
    fn pipeline(&mut self) -> Result<Arc<BlogPipeline>> {
        if let Some(pipeline) = &self.pipeline {
            return Ok(Arc::clone(pipeline));
        }

        let pipeline = Arc::new(BlogPipeline::new(&self.settings)?);
        self.pipeline = Some(Arc::clone(&pipeline));
        Ok(pipeline)
    }

    /// Copy the saved artifact into the download directory
    fn download(&mut self) {
        let Some(artifact) = self.post.artifact() else {
            self.status =
                Status::Warning("Nothing to download: the post was not saved.".to_string());
            return;
        };

        self.status = match blog::download(artifact, &self.settings.download_dir()) {
            Ok(path) => Status::Success(format!("Downloaded to {}", path.display())),
            Err(e) => Status::Error(e.to_string()),
        };
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Toggle help popup
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Update app state
    pub async fn update(&mut self) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        if !pending.handle.is_finished() {
            self.status = Status::Working(*pending.stage.borrow());
            self.pending = Some(pending);
            return Ok(());
        }

        match pending.handle.await {
            Ok(Ok(outcome)) => self.show_outcome(outcome),
            Ok(Err(e)) => {
                tracing::debug!("Request failed: {}", e);
                self.status = Status::Error(e.to_string());
            }
            Err(e) => {
                self.status = Status::Error(format!("Request task failed: {}", e));
            }
        }

        Ok(())
    }

    fn show_outcome(&mut self, outcome: BlogOutcome) {
        self.status = match &outcome.export {
            Ok(artifact) => Status::Success(format!(
                "Here's your blog post! Saved to {} ({})",
                artifact.path.display(),
                artifact.mime
            )),
            Err(e) => Status::Error(e.to_string()),
        };
        self.post.set_outcome(outcome);
        self.current_screen = AppScreen::Post;
    }
}
