//! Key handling
//!
//! Two stages: a pure mapping from crossterm key events to [`Command`]s
//! (the only place that knows about crossterm), then an async dispatcher
//! that runs each command against the session, player, and API.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::AppController;
use crate::model::{Command, InputMode, View};
use crate::player::AudioSink;

/// Translate a key event under the current input mode. Returns `None` for
/// keys that mean nothing right now (including key releases).
pub fn map_key(key: KeyEvent, mode: InputMode, picker_open: bool) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if picker_open {
        return match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Command::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::MoveDown),
            KeyCode::Enter => Some(Command::Activate),
            KeyCode::Esc => Some(Command::CancelPrompt),
            _ => None,
        };
    }

    match mode {
        InputMode::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Command::LeaveSearchMode),
            KeyCode::Backspace => Some(Command::SearchBackspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::ClearSearch)
            }
            KeyCode::Char(c) => Some(Command::SearchChar(c)),
            _ => None,
        },
        InputMode::PlaylistName => match key.code {
            KeyCode::Esc => Some(Command::CancelPrompt),
            KeyCode::Enter => Some(Command::ConfirmPrompt),
            KeyCode::Backspace => Some(Command::PromptBackspace),
            KeyCode::Char(c) => Some(Command::PromptChar(c)),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('/') => Some(Command::EnterSearchMode),
            KeyCode::Char('1') => Some(Command::ShowHome),
            KeyCode::Char('2') => Some(Command::ShowRecent),
            KeyCode::Char('3') => Some(Command::ShowLiked),
            KeyCode::Char('4') => Some(Command::ShowLibrary),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::MoveDown),
            KeyCode::Enter => Some(Command::Activate),
            KeyCode::Char(' ') => Some(Command::TogglePlayback),
            KeyCode::Char('n') => Some(Command::NextTrack),
            KeyCode::Char('p') => Some(Command::PreviousTrack),
            KeyCode::Char('a') => Some(Command::PlayAll),
            KeyCode::Char('e') => Some(Command::Enqueue),
            KeyCode::Char('E') => Some(Command::EnqueueNext),
            KeyCode::Char('u') => Some(Command::ToggleQueuePane),
            KeyCode::Char('f') => Some(Command::ToggleLike),
            KeyCode::Char('d') | KeyCode::Delete => Some(Command::RemoveSelected),
            KeyCode::Char('N') => Some(Command::StartPlaylistPrompt),
            KeyCode::Char('+') => Some(Command::AddSelectedToPlaylist),
            _ => None,
        },
    }
}

impl<S: AudioSink> AppController<S> {
    pub async fn handle_key_event(&self, key: KeyEvent) {
        let (mode, picker_open) = {
            let session = self.session.lock().await;
            (session.ui.input_mode, session.ui.picker_open)
        };
        if let Some(command) = map_key(key, mode, picker_open) {
            self.dispatch(command).await;
        }
    }

    pub async fn dispatch(&self, command: Command) {
        tracing::trace!(?command, "Dispatching command");
        match command {
            Command::SearchChar(c) => {
                let query = {
                    let mut session = self.session.lock().await;
                    session.ui.search_input.push(c);
                    session.ui.search_input.clone()
                };
                self.schedule_search(query).await;
            }
            Command::SearchBackspace => {
                let query = {
                    let mut session = self.session.lock().await;
                    session.ui.search_input.pop();
                    session.ui.search_input.clone()
                };
                self.schedule_search(query).await;
            }
            Command::ClearSearch => {
                {
                    let mut session = self.session.lock().await;
                    session.ui.search_input.clear();
                }
                self.perform_search("", false).await;
            }
            Command::EnterSearchMode => {
                self.session.lock().await.ui.input_mode = InputMode::Search;
            }
            Command::LeaveSearchMode => {
                self.session.lock().await.ui.input_mode = InputMode::Normal;
            }
            Command::ShowHome => self.load_home().await,
            Command::ShowRecent => self.load_recent().await,
            Command::ShowLiked => self.load_liked().await,
            Command::ShowLibrary => self.load_library().await,
            Command::MoveUp => {
                let mut session = self.session.lock().await;
                if session.ui.picker_open {
                    session.ui.picker_selected = session.ui.picker_selected.saturating_sub(1);
                } else {
                    session.move_selection_up();
                }
            }
            Command::MoveDown => {
                {
                    let queue_len = self.player.lock().await.queue.len();
                    let mut session = self.session.lock().await;
                    if session.ui.picker_open {
                        if session.ui.picker_selected + 1 < session.playlists.len() {
                            session.ui.picker_selected += 1;
                        }
                    } else {
                        session.move_selection_down(queue_len);
                    }
                }
                self.maybe_load_more().await;
            }
            Command::Activate => {
                let action = {
                    let session = self.session.lock().await;
                    if session.ui.picker_open {
                        Activation::PickerConfirm
                    } else if session.view == View::Library {
                        match session.selected_playlist() {
                            Some(p) => Activation::OpenPlaylist(p.id.clone(), p.name.clone()),
                            None => return,
                        }
                    } else {
                        Activation::PlayTrack
                    }
                };
                match action {
                    Activation::PickerConfirm => self.confirm_playlist_picker().await,
                    Activation::OpenPlaylist(id, name) => self.load_playlist(id, name).await,
                    Activation::PlayTrack => self.play_selected().await,
                }
            }
            Command::TogglePlayback => self.toggle_playback().await,
            Command::NextTrack => self.next_track().await,
            Command::PreviousTrack => self.previous_track().await,
            Command::PlayAll => self.play_all().await,
            Command::Enqueue => self.enqueue_selected(false).await,
            Command::EnqueueNext => self.enqueue_selected(true).await,
            Command::ToggleQueuePane => {
                let mut session = self.session.lock().await;
                session.ui.queue_pane_open = !session.ui.queue_pane_open;
                session.ui.queue_pane_focused = session.ui.queue_pane_open;
                session.ui.queue_selected = 0;
            }
            Command::ToggleLike => self.toggle_like_selected().await,
            Command::RemoveSelected => {
                let target = {
                    let session = self.session.lock().await;
                    if session.ui.queue_pane_focused {
                        Removal::QueueEntry
                    } else {
                        match session.view {
                            View::Library => Removal::Playlist,
                            View::Playlist(_) => Removal::PlaylistTrack,
                            _ => return,
                        }
                    }
                };
                match target {
                    Removal::QueueEntry => self.remove_selected_queue_entry().await,
                    Removal::Playlist => self.delete_selected_playlist().await,
                    Removal::PlaylistTrack => self.remove_selected_from_playlist().await,
                }
            }
            Command::StartPlaylistPrompt => {
                let mut session = self.session.lock().await;
                session.ui.prompt_input.clear();
                session.ui.input_mode = InputMode::PlaylistName;
            }
            Command::PromptChar(c) => {
                self.session.lock().await.ui.prompt_input.push(c);
            }
            Command::PromptBackspace => {
                self.session.lock().await.ui.prompt_input.pop();
            }
            Command::ConfirmPrompt => {
                let name = {
                    let mut session = self.session.lock().await;
                    session.ui.input_mode = InputMode::Normal;
                    std::mem::take(&mut session.ui.prompt_input)
                };
                self.create_playlist(&name).await;
            }
            Command::CancelPrompt => {
                {
                    let mut session = self.session.lock().await;
                    session.ui.input_mode = InputMode::Normal;
                    session.ui.prompt_input.clear();
                }
                self.cancel_playlist_picker().await;
            }
            Command::AddSelectedToPlaylist => self.open_playlist_picker().await,
            Command::Quit => {
                self.session.lock().await.ui.should_quit = true;
            }
        }
    }
}

enum Activation {
    PickerConfirm,
    OpenPlaylist(String, String),
    PlayTrack,
}

enum Removal {
    QueueEntry,
    Playlist,
    PlaylistTrack,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_maps_navigation_and_transport() {
        assert_eq!(
            map_key(press(KeyCode::Char('1')), InputMode::Normal, false),
            Some(Command::ShowHome)
        );
        assert_eq!(
            map_key(press(KeyCode::Char(' ')), InputMode::Normal, false),
            Some(Command::TogglePlayback)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('n')), InputMode::Normal, false),
            Some(Command::NextTrack)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('q')), InputMode::Normal, false),
            Some(Command::Quit)
        );
    }

    #[test]
    fn search_mode_captures_characters() {
        assert_eq!(
            map_key(press(KeyCode::Char('q')), InputMode::Search, false),
            Some(Command::SearchChar('q'))
        );
        assert_eq!(
            map_key(press(KeyCode::Backspace), InputMode::Search, false),
            Some(Command::SearchBackspace)
        );
        assert_eq!(
            map_key(press(KeyCode::Esc), InputMode::Search, false),
            Some(Command::LeaveSearchMode)
        );
    }

    #[test]
    fn picker_swallows_normal_bindings() {
        assert_eq!(
            map_key(press(KeyCode::Char('n')), InputMode::Normal, true),
            None
        );
        assert_eq!(
            map_key(press(KeyCode::Enter), InputMode::Normal, true),
            Some(Command::Activate)
        );
        assert_eq!(
            map_key(press(KeyCode::Esc), InputMode::Normal, true),
            Some(Command::CancelPrompt)
        );
    }

    #[test]
    fn prompt_mode_edits_the_name() {
        assert_eq!(
            map_key(press(KeyCode::Char('x')), InputMode::PlaylistName, false),
            Some(Command::PromptChar('x'))
        );
        assert_eq!(
            map_key(press(KeyCode::Enter), InputMode::PlaylistName, false),
            Some(Command::ConfirmPrompt)
        );
    }
}
