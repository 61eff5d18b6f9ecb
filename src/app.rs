use crate::config::{self, Settings};
use crate::core::Session;
use crate::events::{CollectionEvent, PlayerEvent};
use crate::library::{self, LibrarySource};
use crate::model::PlaybackState;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::cell::RefCell;
use std::io::stdout;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Library,
    Playlist,
}

/// A change notification captured for the view, applied on the next pass of
/// the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    Library(CollectionEvent),
    Playlist(CollectionEvent),
    Player(PlayerEvent),
}

pub type UpdateQueue = Rc<RefCell<Vec<ViewUpdate>>>;

#[derive(Debug)]
pub struct ViewState {
    pub focus: Pane,
    pub library_selected: usize,
    pub playlist_selected: usize,
    pub status: String,
    pub dirty: bool,
    pub quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: Pane::Library,
            library_selected: 0,
            playlist_selected: 0,
            status: String::from("Ready"),
            dirty: true,
            quit: false,
        }
    }
}

impl ViewState {
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.dirty = true;
    }

    /// Folds one notification into the view. Selections are clamped against
    /// the session so they never point past the end of a pane.
    pub fn apply(&mut self, session: &Session, update: ViewUpdate) {
        match update {
            ViewUpdate::Library(CollectionEvent::Reset { len }) => {
                self.library_selected = self.library_selected.min(len.saturating_sub(1));
                self.set_status(format!("Library loaded: {len} albums"));
            }
            ViewUpdate::Library(_) => {}
            ViewUpdate::Playlist(CollectionEvent::Add { index }) => {
                if let Some(album) = session.playlist().get(index) {
                    self.set_status(format!("Queued {}", album.display_name()));
                }
            }
            ViewUpdate::Playlist(CollectionEvent::Remove { .. })
            | ViewUpdate::Playlist(CollectionEvent::Reset { .. }) => {
                let len = session.playlist().len();
                self.playlist_selected = self.playlist_selected.min(len.saturating_sub(1));
            }
            ViewUpdate::Playlist(CollectionEvent::Select { .. }) => {}
            ViewUpdate::Player(PlayerEvent::State { new, .. }) => {
                self.set_status(match new {
                    PlaybackState::Playing => "Playing",
                    PlaybackState::Stopped => "Paused",
                });
            }
            ViewUpdate::Player(PlayerEvent::CurrentAlbumIndex { new, .. }) => {
                self.playlist_selected = new;
            }
            ViewUpdate::Player(PlayerEvent::CurrentTrackIndex { .. }) => {}
        }
        self.dirty = true;
    }

    fn select_next(&mut self, session: &Session) {
        let (selected, len) = self.focused(session);
        if len > 0 {
            *selected = (*selected + 1).min(len - 1);
        }
        self.dirty = true;
    }

    fn select_prev(&mut self, session: &Session) {
        let (selected, _) = self.focused(session);
        *selected = selected.saturating_sub(1);
        self.dirty = true;
    }

    fn focused(&mut self, session: &Session) -> (&mut usize, usize) {
        match self.focus {
            Pane::Library => (&mut self.library_selected, session.library().len()),
            Pane::Playlist => (&mut self.playlist_selected, session.playlist().len()),
        }
    }
}

/// Routes every session notification into `queue`.
pub fn bind_views(session: &mut Session) -> UpdateQueue {
    let queue: UpdateQueue = Rc::new(RefCell::new(Vec::new()));

    let library_queue = Rc::clone(&queue);
    session.subscribe_library(move |event| {
        library_queue.borrow_mut().push(ViewUpdate::Library(*event));
    });
    let playlist_queue = Rc::clone(&queue);
    session.subscribe_playlist(move |event| {
        playlist_queue.borrow_mut().push(ViewUpdate::Playlist(*event));
    });
    let player_queue = Rc::clone(&queue);
    session.subscribe_player(move |event| {
        player_queue.borrow_mut().push(ViewUpdate::Player(*event));
    });

    queue
}

pub fn drain_updates(queue: &UpdateQueue, session: &Session, view: &mut ViewState) {
    let updates: Vec<ViewUpdate> = queue.borrow_mut().drain(..).collect();
    for update in updates {
        view.apply(session, update);
    }
}

/// Everything the reload and save intents read.
#[derive(Debug, Clone)]
pub struct Commands {
    pub source: LibrarySource,
    pub timeout: Duration,
    pub settings: Settings,
    pub config_dir: PathBuf,
}

impl Commands {
    pub fn new(settings: Settings, config_dir: PathBuf) -> Self {
        Self {
            source: LibrarySource::parse(&settings.library_source),
            timeout: Duration::from_secs(settings.http_timeout_secs),
            settings,
            config_dir,
        }
    }
}

pub fn run(settings: Settings) -> Result<()> {
    let commands = Commands::new(settings, config::config_root()?);

    let mut session = Session::new();
    let queue = bind_views(&mut session);
    let mut view = ViewState::default();
    reload_library(&mut session, &mut view, &commands);

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result: Result<()> = loop {
        drain_updates(&queue, &session, &mut view);
        if view.quit {
            break Ok(());
        }

        if view.dirty {
            terminal.draw(|frame| crate::ui::draw(frame, &session, &view))?;
            view.dirty = false;
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            view.dirty = true;
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if !handle_command(&mut session, &mut view, &commands, key) {
            handle_key(&mut session, &mut view, key);
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Handles the keys that reach outside the session: `r` reloads the library
/// and `s` saves settings. Returns `false` for any other key.
pub fn handle_command(
    session: &mut Session,
    view: &mut ViewState,
    commands: &Commands,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('r') => reload_library(session, view, commands),
        KeyCode::Char('s') => save_settings(view, commands),
        _ => return false,
    }
    true
}

fn reload_library(session: &mut Session, view: &mut ViewState, commands: &Commands) {
    match library::load(&commands.source, commands.timeout) {
        Ok(albums) => {
            session.reset_library(albums);
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "library load failed");
            view.set_status(format!("library error: {err:#}"));
        }
    }
}

fn save_settings(view: &mut ViewState, commands: &Commands) {
    let saved = Settings {
        library_source: commands.source.describe(),
        ..commands.settings.clone()
    };
    match config::save_settings_in(&commands.config_dir, &saved) {
        Ok(()) => {
            info!(dir = %commands.config_dir.display(), "settings saved");
            view.set_status("Settings saved");
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "settings save failed");
            view.set_status(format!("save error: {err:#}"));
        }
    }
}

/// Translates one key press into a session intent. Core errors end up on the
/// status line.
pub fn handle_key(session: &mut Session, view: &mut ViewState, key: KeyEvent) {
    let outcome = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            view.quit = true;
            Ok(())
        }
        KeyCode::Char('q') => {
            view.quit = true;
            Ok(())
        }
        KeyCode::Tab => {
            view.focus = match view.focus {
                Pane::Library => Pane::Playlist,
                Pane::Playlist => Pane::Library,
            };
            view.dirty = true;
            Ok(())
        }
        KeyCode::Down => {
            view.select_next(session);
            Ok(())
        }
        KeyCode::Up => {
            view.select_prev(session);
            Ok(())
        }
        KeyCode::Enter | KeyCode::Char('a') if view.focus == Pane::Library => {
            match session.queue_album(view.library_selected) {
                Ok(false) => {
                    view.set_status("Album already queued");
                    Ok(())
                }
                other => other.map(|_| ()),
            }
        }
        KeyCode::Enter if view.focus == Pane::Playlist => {
            session.jump_to(view.playlist_selected, 0)
        }
        KeyCode::Char('d') if view.focus == Pane::Playlist => session
            .remove_from_playlist(view.playlist_selected)
            .map(|album| view.set_status(format!("Removed {}", album.display_name()))),
        KeyCode::Char('n') => session.next_track(),
        KeyCode::Char('p') => session.prev_track(),
        KeyCode::Char(' ') => {
            session.toggle();
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(err) = outcome {
        info!(error = %err, "intent rejected");
        view.set_status(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Album, Track};
    use std::fs;
    use tempfile::tempdir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn session_with_library() -> (Session, UpdateQueue, ViewState) {
        let mut session = Session::new();
        let queue = bind_views(&mut session);
        session.reset_library(vec![
            Album::new("A", vec![Track::new("/a/1.mp3"), Track::new("/a/2.mp3")]),
            Album::new("B", vec![Track::new("/b/1.mp3")]),
        ]);
        let mut view = ViewState::default();
        drain_updates(&queue, &session, &mut view);
        (session, queue, view)
    }

    #[test]
    fn library_reset_reaches_the_status_line() {
        let (_, _, view) = session_with_library();
        assert_eq!(view.status, "Library loaded: 2 albums");
    }

    #[test]
    fn queue_then_navigate_with_keys() {
        let (mut session, queue, mut view) = session_with_library();

        handle_key(&mut session, &mut view, press(KeyCode::Enter));
        handle_key(&mut session, &mut view, press(KeyCode::Down));
        handle_key(&mut session, &mut view, press(KeyCode::Char('a')));
        drain_updates(&queue, &session, &mut view);
        assert_eq!(session.playlist().len(), 2);
        assert_eq!(view.status, "Queued B");

        handle_key(&mut session, &mut view, press(KeyCode::Char('n')));
        handle_key(&mut session, &mut view, press(KeyCode::Char('n')));
        drain_updates(&queue, &session, &mut view);
        assert_eq!(session.player().position(), (1, 0));
        assert_eq!(view.playlist_selected, 1);

        handle_key(&mut session, &mut view, press(KeyCode::Char('p')));
        assert_eq!(session.player().position(), (0, 1));
    }

    #[test]
    fn navigation_on_empty_playlist_reports_error() {
        let (mut session, _, mut view) = session_with_library();
        handle_key(&mut session, &mut view, press(KeyCode::Char('n')));
        assert_eq!(view.status, "the playlist is empty");
    }

    #[test]
    fn space_toggles_playback_status() {
        let (mut session, queue, mut view) = session_with_library();
        handle_key(&mut session, &mut view, press(KeyCode::Char(' ')));
        drain_updates(&queue, &session, &mut view);
        assert_eq!(view.status, "Playing");
        handle_key(&mut session, &mut view, press(KeyCode::Char(' ')));
        drain_updates(&queue, &session, &mut view);
        assert_eq!(view.status, "Paused");
    }

    #[test]
    fn removing_from_playlist_pane_clamps_selection() {
        let (mut session, queue, mut view) = session_with_library();
        handle_key(&mut session, &mut view, press(KeyCode::Enter));
        handle_key(&mut session, &mut view, press(KeyCode::Down));
        handle_key(&mut session, &mut view, press(KeyCode::Enter));
        drain_updates(&queue, &session, &mut view);
        handle_key(&mut session, &mut view, press(KeyCode::Tab));
        handle_key(&mut session, &mut view, press(KeyCode::Down));
        assert_eq!(view.playlist_selected, 1);

        handle_key(&mut session, &mut view, press(KeyCode::Char('d')));
        drain_updates(&queue, &session, &mut view);

        assert_eq!(session.playlist().len(), 1);
        assert_eq!(view.playlist_selected, 0);
        assert_eq!(view.status, "Removed B");
    }

    #[test]
    fn quit_keys_set_the_flag() {
        let (mut session, _, mut view) = session_with_library();
        handle_key(
            &mut session,
            &mut view,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(view.quit);
    }

    fn commands_for(source: &str, config_dir: PathBuf) -> Commands {
        let settings = Settings {
            library_source: source.to_string(),
            ..Settings::default()
        };
        Commands::new(settings, config_dir)
    }

    #[test]
    fn reload_from_missing_file_reports_library_error() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing.json");
        let commands = commands_for(&missing.to_string_lossy(), dir.path().to_path_buf());
        let (mut session, _, mut view) = session_with_library();

        assert!(handle_command(&mut session, &mut view, &commands, press(KeyCode::Char('r'))));

        assert!(view.status.starts_with("library error:"));
        assert_eq!(session.library().len(), 2);
    }

    #[test]
    fn reload_from_file_resets_the_library() {
        let dir = tempdir().expect("tempdir");
        let listing = dir.path().join("albums.json");
        fs::write(
            &listing,
            r#"[{"title": "Fresh", "tracks": [{"url": "/fresh/1.mp3"}]}]"#,
        )
        .expect("write listing");
        let commands = commands_for(&listing.to_string_lossy(), dir.path().to_path_buf());
        let (mut session, queue, mut view) = session_with_library();

        assert!(handle_command(&mut session, &mut view, &commands, press(KeyCode::Char('r'))));
        drain_updates(&queue, &session, &mut view);

        assert_eq!(session.library().len(), 1);
        assert_eq!(
            session.library().get(0).and_then(|album| album.title.as_deref()),
            Some("Fresh")
        );
        assert_eq!(view.status, "Library loaded: 1 albums");
    }

    #[test]
    fn save_writes_settings_into_the_config_dir() {
        let dir = tempdir().expect("tempdir");
        let commands = commands_for("/srv/albums.json", dir.path().to_path_buf());
        let (mut session, _, mut view) = session_with_library();

        assert!(handle_command(&mut session, &mut view, &commands, press(KeyCode::Char('s'))));

        assert_eq!(view.status, "Settings saved");
        let saved = config::load_settings_from(dir.path()).expect("load");
        assert_eq!(saved.library_source, "/srv/albums.json");
        assert_eq!(saved, commands.settings);
    }

    #[test]
    fn failed_save_reaches_the_status_line() {
        let dir = tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").expect("write file");
        let commands = commands_for("/srv/albums.json", blocker);
        let (mut session, _, mut view) = session_with_library();

        handle_command(&mut session, &mut view, &commands, press(KeyCode::Char('s')));

        assert!(view.status.starts_with("save error:"));
    }

    #[test]
    fn other_keys_are_not_commands() {
        let dir = tempdir().expect("tempdir");
        let commands = commands_for("/srv/albums.json", dir.path().to_path_buf());
        let (mut session, _, mut view) = session_with_library();

        assert!(!handle_command(&mut session, &mut view, &commands, press(KeyCode::Char('n'))));
        assert_eq!(view.status, "Library loaded: 2 albums");
    }
}
