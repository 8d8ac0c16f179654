/// Keys the field reacts to. Everything else is `Other`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self { key, modifiers: Modifiers::default() }
    }

    /// `Ctrl+key`. As a submit chord it is equivalent to [`with_meta`](Self::with_meta).
    pub fn with_ctrl(key: Key) -> Self {
        Self { key, modifiers: Modifiers { ctrl: true, ..Modifiers::default() } }
    }

    /// `Meta+key` (Cmd on macOS).
    pub fn with_meta(key: Key) -> Self {
        Self { key, modifiers: Modifiers { meta: true, ..Modifiers::default() } }
    }

    fn is_submit_chord(&self) -> bool {
        self.modifiers.ctrl || self.modifiers.meta
    }
}

/// The kind of input the key was pressed in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InputKind {
    #[default]
    SingleLine,
    MultiLine,
}

/// What a key press means for the field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyAction {
    Save,
    Cancel,
    /// Let the input handle the key (typing, newlines in a text area).
    PassThrough,
}

impl KeyAction {
    /// Whether the UI should suppress the browser's default handling.
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

/// Maps a key press to an action.
///
/// `Escape` always cancels. `Enter` saves, except in a multi-line input
/// where only `Ctrl+Enter` / `Meta+Enter` saves and plain `Enter` is a newline.
pub fn key_action(press: KeyPress, input: InputKind) -> KeyAction {
    match (press.key, input) {
        (Key::Escape, _) => KeyAction::Cancel,
        (Key::Enter, InputKind::SingleLine) => KeyAction::Save,
        (Key::Enter, InputKind::MultiLine) if press.is_submit_chord() => KeyAction::Save,
        _ => KeyAction::PassThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_always_cancels() {
        for input in [InputKind::SingleLine, InputKind::MultiLine] {
            let action = key_action(KeyPress::plain(Key::Escape), input);
            assert_eq!(action, KeyAction::Cancel);
            assert!(action.prevents_default());
        }
    }

    #[test]
    fn enter_saves_single_line_only() {
        assert_eq!(key_action(KeyPress::plain(Key::Enter), InputKind::SingleLine), KeyAction::Save);
        assert_eq!(
            key_action(KeyPress::plain(Key::Enter), InputKind::MultiLine),
            KeyAction::PassThrough
        );
    }

    #[test]
    fn submit_chord_saves_multi_line() {
        assert_eq!(key_action(KeyPress::with_ctrl(Key::Enter), InputKind::MultiLine), KeyAction::Save);
        assert_eq!(key_action(KeyPress::with_meta(Key::Enter), InputKind::MultiLine), KeyAction::Save);
        let shift = KeyPress { key: Key::Enter, modifiers: Modifiers { shift: true, ..Modifiers::default() } };
        assert_eq!(key_action(shift, InputKind::MultiLine), KeyAction::PassThrough);
    }

    #[test]
    fn other_keys_pass_through() {
        let action = key_action(KeyPress::plain(Key::Other), InputKind::SingleLine);
        assert!(!action.prevents_default());
    }
}
