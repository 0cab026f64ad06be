//! Input adapter
//!
//! Host events (keyboard, pointer, touch, on-screen buttons) are normalized
//! into a `HostEvent`, then mapped per game to a `Control`. Play commands go
//! through the session's buffer and only take effect on the next tick.

use crate::sim::{Direction, Flap, Game, Pipes, Racer, Session, Side, Snake};

/// Keys the arcade listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (or a terminal key name)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Space" | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }

    /// Whether the browser should not also scroll the page for this key
    pub fn blocks_default(&self) -> bool {
        !matches!(self, Key::Escape)
    }
}

/// On-screen control pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Start,
    Reset,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Start,
        Button::Reset,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            Button::Up => "btn-up",
            Button::Down => "btn-down",
            Button::Left => "btn-left",
            Button::Right => "btn-right",
            Button::Start => "btn-start",
            Button::Reset => "btn-reset",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.element_id() == id)
    }
}

/// A raw host event, already stripped of platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key { key: Key, repeat: bool },
    /// Mouse press on the game canvas
    Pointer,
    /// Touch start on the game canvas
    Touch,
    Button(Button),
}

impl HostEvent {
    pub fn key(key: Key) -> Self {
        HostEvent::Key { key, repeat: false }
    }
}

/// What an event asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control<C> {
    Start,
    Reset,
    Play(C),
}

/// Per-game event mapping
pub trait Controls: Game {
    fn translate(event: &HostEvent) -> Option<Control<Self::Command>>;
}

/// Mapping shared by every game: Enter and the start button start, the reset
/// button resets
fn common(event: &HostEvent) -> Option<Control<()>> {
    match event {
        HostEvent::Key {
            key: Key::Enter, ..
        }
        | HostEvent::Button(Button::Start) => Some(Control::Start),
        HostEvent::Button(Button::Reset) => Some(Control::Reset),
        _ => None,
    }
}

fn lift<C>(control: Control<()>) -> Option<Control<C>> {
    match control {
        Control::Start => Some(Control::Start),
        Control::Reset => Some(Control::Reset),
        Control::Play(()) => None,
    }
}

impl Controls for Pipes {
    fn translate(event: &HostEvent) -> Option<Control<Flap>> {
        match event {
            // Holding a key never repeats the flap
            HostEvent::Key { repeat: true, .. } => None,
            HostEvent::Key {
                key: Key::Space | Key::Up,
                ..
            }
            | HostEvent::Pointer
            | HostEvent::Touch
            | HostEvent::Button(Button::Up) => Some(Control::Play(Flap)),
            _ => common(event).and_then(lift),
        }
    }
}

impl Controls for Snake {
    fn translate(event: &HostEvent) -> Option<Control<Direction>> {
        let dir = match event {
            HostEvent::Key { key, .. } => match key {
                Key::Up => Direction::Up,
                Key::Down => Direction::Down,
                Key::Left => Direction::Left,
                Key::Right => Direction::Right,
                _ => return common(event).and_then(lift),
            },
            HostEvent::Button(button) => match button {
                Button::Up => Direction::Up,
                Button::Down => Direction::Down,
                Button::Left => Direction::Left,
                Button::Right => Direction::Right,
                _ => return common(event).and_then(lift),
            },
            HostEvent::Pointer | HostEvent::Touch => return None,
        };
        Some(Control::Play(dir))
    }
}

impl Controls for Racer {
    fn translate(event: &HostEvent) -> Option<Control<Side>> {
        match event {
            HostEvent::Key { key: Key::Left, .. } | HostEvent::Button(Button::Left) => {
                Some(Control::Play(Side::Left))
            }
            HostEvent::Key {
                key: Key::Right, ..
            }
            | HostEvent::Button(Button::Right) => Some(Control::Play(Side::Right)),
            _ => common(event).and_then(lift),
        }
    }
}

/// Apply a control to a session
pub fn dispatch<G: Game>(session: &mut Session<G>, control: Control<G::Command>) {
    match control {
        Control::Start => {
            session.start();
        }
        Control::Reset => {
            if !session.reset() {
                log::debug!("{}: reset ignored while running", session.id());
            }
        }
        Control::Play(cmd) => session.command(cmd),
    }
}

impl<G: Controls> Session<G> {
    /// Translate and apply a host event. Returns false if the game has no
    /// mapping for it.
    pub fn handle(&mut self, event: &HostEvent) -> bool {
        match G::translate(event) {
            Some(control) => {
                dispatch(self, control);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, shared};
    use crate::sim::Lifecycle;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code(" "), Some(Key::Space));
        assert_eq!(Key::from_code("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_code("q"), None);
    }

    #[test]
    fn test_button_ids() {
        for button in Button::ALL {
            assert_eq!(Button::from_element_id(button.element_id()), Some(button));
        }
        assert_eq!(Button::from_element_id("btn-pause"), None);
    }

    #[test]
    fn test_pipes_mapping() {
        assert_eq!(
            Pipes::translate(&HostEvent::key(Key::Space)),
            Some(Control::Play(Flap))
        );
        assert_eq!(Pipes::translate(&HostEvent::Touch), Some(Control::Play(Flap)));
        assert_eq!(
            Pipes::translate(&HostEvent::Key {
                key: Key::Space,
                repeat: true
            }),
            None
        );
        assert_eq!(Pipes::translate(&HostEvent::key(Key::Left)), None);
    }

    #[test]
    fn test_snake_mapping() {
        assert_eq!(
            Snake::translate(&HostEvent::Button(Button::Down)),
            Some(Control::Play(Direction::Down))
        );
        assert_eq!(
            Snake::translate(&HostEvent::key(Key::Enter)),
            Some(Control::Start)
        );
        assert_eq!(Snake::translate(&HostEvent::Pointer), None);
        assert_eq!(Snake::translate(&HostEvent::key(Key::Space)), None);
    }

    #[test]
    fn test_racer_mapping() {
        assert_eq!(
            Racer::translate(&HostEvent::key(Key::Right)),
            Some(Control::Play(Side::Right))
        );
        assert_eq!(Racer::translate(&HostEvent::key(Key::Up)), None);
        assert_eq!(
            Racer::translate(&HostEvent::Button(Button::Reset)),
            Some(Control::Reset)
        );
    }

    #[test]
    fn test_escape_is_left_to_the_arcade() {
        let escape = HostEvent::key(Key::Escape);
        assert_eq!(Pipes::translate(&escape), None);
        assert_eq!(Snake::translate(&escape), None);
        assert_eq!(Racer::translate(&escape), None);
    }

    #[test]
    fn test_handle_starts_and_queues() {
        let mut session = Session::<Racer>::new(1, shared(MemoryStore::new()));
        assert!(session.handle(&HostEvent::key(Key::Left)));
        assert_eq!(session.lifecycle(), Lifecycle::NotStarted);

        session.handle(&HostEvent::Button(Button::Start));
        assert_eq!(session.lifecycle(), Lifecycle::Running);
        session.handle(&HostEvent::key(Key::Left));
        assert_eq!(session.pending(), 1);

        // Reset refused mid-game
        session.handle(&HostEvent::Button(Button::Reset));
        assert_eq!(session.lifecycle(), Lifecycle::Running);
    }
}
