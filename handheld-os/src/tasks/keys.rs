//! Terminal keyboard thread
//!
//! Stands in for the encoder when the panel is up but the knob is not. The
//! terminal is put in raw mode and arrow keys, Enter, Escape and Backspace
//! are mapped the same way the preview window maps them. `q` or Ctrl-C
//! closes the channel, which ends the tick loop.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use handheld_core::input::{map_key, Key, LogicalEvent};

const POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Send(LogicalEvent),
    Quit,
}

/// Translate one key press
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let key = match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Action::Quit)
        }
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        _ => Key::Other,
    };
    map_key(key).map(Action::Send)
}

/// Enter raw mode and start reading keys
///
/// The terminal is restored before the channel closes.
pub fn spawn() -> io::Result<(Receiver<LogicalEvent>, JoinHandle<()>)> {
    enable_raw_mode()?;
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new().name("keyboard".into()).spawn(move || {
        pump(read, &tx);
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "terminal left in raw mode");
        }
        drop(tx);
    });
    match spawned {
        Ok(handle) => Ok((rx, handle)),
        Err(e) => {
            let _ = disable_raw_mode();
            Err(e)
        }
    }
}

fn read() -> io::Result<Option<Event>> {
    if event::poll(POLL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Forward key presses until quit, a read error, or a dropped receiver
fn pump<R>(mut read: R, tx: &Sender<LogicalEvent>)
where
    R: FnMut() -> io::Result<Option<Event>>,
{
    tracing::debug!("keyboard input started");
    loop {
        let key = match read() {
            Ok(Some(Event::Key(key))) => key,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "terminal read failed, keyboard input stopped");
                return;
            }
        };
        match action_for(&key) {
            Some(Action::Send(event)) => {
                tracing::trace!(?event, "input");
                if tx.send(event).is_err() {
                    return;
                }
            }
            Some(Action::Quit) => {
                tracing::info!("quit from keyboard");
                return;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::TryRecvError;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Replays events, then fails
    fn script(events: Vec<Event>) -> impl FnMut() -> io::Result<Option<Event>> {
        let mut events = events.into_iter();
        move || match events.next() {
            Some(event) => Ok(Some(event)),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of script")),
        }
    }

    #[test]
    fn test_keys_map_like_the_knob() {
        let sent = |code| action_for(&press(code));
        assert_eq!(sent(KeyCode::Left), Some(Action::Send(LogicalEvent::RotateLeft)));
        assert_eq!(sent(KeyCode::Right), Some(Action::Send(LogicalEvent::RotateRight)));
        assert_eq!(sent(KeyCode::Enter), Some(Action::Send(LogicalEvent::Tap)));
        assert_eq!(sent(KeyCode::Esc), Some(Action::Send(LogicalEvent::Hold)));
        assert_eq!(sent(KeyCode::Backspace), Some(Action::Send(LogicalEvent::Hold)));
        assert_eq!(sent(KeyCode::Up), None);
        assert_eq!(sent(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for(&press(KeyCode::Char('q'))), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&ctrl_c), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(action_for(&key), None);
    }

    #[test]
    fn test_pump_forwards_until_quit() {
        let (tx, rx) = mpsc::channel();
        pump(
            script(vec![
                Event::Key(press(KeyCode::Right)),
                Event::FocusGained,
                Event::Key(press(KeyCode::Enter)),
                Event::Key(press(KeyCode::Char('q'))),
                Event::Key(press(KeyCode::Left)),
            ]),
            &tx,
        );
        drop(tx);
        let got: Vec<LogicalEvent> = rx.iter().collect();
        assert_eq!(got, [LogicalEvent::RotateRight, LogicalEvent::Tap]);
    }

    #[test]
    fn test_pump_stops_on_read_error() {
        let (tx, rx) = mpsc::channel();
        pump(script(vec![Event::Key(press(KeyCode::Esc))]), &tx);
        assert_eq!(rx.try_recv(), Ok(LogicalEvent::Hold));
        drop(tx);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }
}
