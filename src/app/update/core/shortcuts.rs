use super::super::super::messages::Message;
use super::super::super::state::App;
use iced::keyboard::{Key, Modifiers, key};

impl App {
    /// Fixed keyboard surface of the viewer. Chords with command-style
    /// modifiers are left alone so the shortcuts never shadow the
    /// platform's own bindings; plain Shift stays allowed because `+`
    /// usually needs it.
    pub(super) fn shortcut_message_for_key(
        &self,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Message> {
        if modifiers.control() || modifiers.alt() || modifiers.logo() {
            return None;
        }
        match key.as_ref() {
            Key::Named(key::Named::ArrowLeft) => Some(Message::FlipPrev),
            Key::Named(key::Named::ArrowRight) => Some(Message::FlipNext),
            Key::Character("+") | Key::Character("=") => Some(Message::ZoomIn),
            Key::Character("-") => Some(Message::ZoomOut),
            Key::Character("0") => Some(Message::ZoomReset),
            Key::Character("m") | Key::Character("M") => Some(Message::ToggleMagnifier),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::test_app;

    fn character(ch: &str) -> Key {
        Key::Character(ch.into())
    }

    #[test]
    fn arrows_map_to_flips() {
        let (app, _) = test_app(3, 0);
        assert!(matches!(
            app.shortcut_message_for_key(Key::Named(key::Named::ArrowRight), Modifiers::empty()),
            Some(Message::FlipNext)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(Key::Named(key::Named::ArrowLeft), Modifiers::empty()),
            Some(Message::FlipPrev)
        ));
    }

    #[test]
    fn zoom_and_magnifier_keys_map() {
        let (app, _) = test_app(3, 0);
        assert!(matches!(
            app.shortcut_message_for_key(character("+"), Modifiers::SHIFT),
            Some(Message::ZoomIn)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(character("="), Modifiers::empty()),
            Some(Message::ZoomIn)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(character("-"), Modifiers::empty()),
            Some(Message::ZoomOut)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(character("0"), Modifiers::empty()),
            Some(Message::ZoomReset)
        ));
        assert!(matches!(
            app.shortcut_message_for_key(character("M"), Modifiers::SHIFT),
            Some(Message::ToggleMagnifier)
        ));
    }

    #[test]
    fn command_chords_are_ignored() {
        let (app, _) = test_app(3, 0);
        assert!(
            app.shortcut_message_for_key(character("-"), Modifiers::CTRL)
                .is_none()
        );
        assert!(
            app.shortcut_message_for_key(character("q"), Modifiers::empty())
                .is_none()
        );
    }
}
