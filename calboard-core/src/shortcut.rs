//! Keyboard shortcuts for undo/redo.
//!
//! Ctrl/Cmd+Z undoes, Ctrl/Cmd+Shift+Z redoes. A chord that maps to an
//! action is consumed; the caller must suppress the default behavior.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Undo,
    Redo,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HistoryAction::Undo => write!(f, "undo"),
            HistoryAction::Redo => write!(f, "redo"),
        }
    }
}

/// A key press together with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        KeyChord {
            key,
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

impl FromStr for KeyChord {
    type Err = String;

    /// Parse chords like `ctrl+z`, `cmd+shift+z` or `Meta+Z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord::default();
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                _ => {
                    let mut chars = part.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        _ => return Err(format!("Invalid key chord '{}'", s)),
                    }
                }
            }
        }

        chord.key = key.ok_or_else(|| format!("Key chord '{}' has no key", s))?;
        Ok(chord)
    }
}

/// The history action bound to a chord, if any.
pub fn history_action(chord: &KeyChord) -> Option<HistoryAction> {
    if !(chord.ctrl || chord.meta) || !chord.key.eq_ignore_ascii_case(&'z') {
        return None;
    }

    if chord.shift {
        Some(HistoryAction::Redo)
    } else {
        Some(HistoryAction::Undo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_or_cmd_z_undoes() {
        assert_eq!(history_action(&KeyChord::new('z').ctrl()), Some(HistoryAction::Undo));
        assert_eq!(history_action(&KeyChord::new('z').meta()), Some(HistoryAction::Undo));
    }

    #[test]
    fn shift_redoes() {
        // Browsers report the shifted key as uppercase.
        assert_eq!(
            history_action(&KeyChord::new('Z').ctrl().shift()),
            Some(HistoryAction::Redo)
        );
        assert_eq!(
            history_action(&KeyChord::new('z').meta().shift()),
            Some(HistoryAction::Redo)
        );
    }

    #[test]
    fn other_chords_are_ignored() {
        assert_eq!(history_action(&KeyChord::new('z')), None);
        assert_eq!(history_action(&KeyChord::new('z').shift()), None);
        assert_eq!(history_action(&KeyChord::new('y').ctrl()), None);
    }

    #[test]
    fn parses_chord_strings() {
        assert_eq!("ctrl+z".parse::<KeyChord>().unwrap(), KeyChord::new('z').ctrl());
        assert_eq!(
            "Cmd+Shift+Z".parse::<KeyChord>().unwrap(),
            KeyChord::new('Z').meta().shift()
        );
        assert!("ctrl+shift".parse::<KeyChord>().is_err());
        assert!("ctrl+zz".parse::<KeyChord>().is_err());
        assert!("ctrl+a+b".parse::<KeyChord>().is_err());
    }
}
