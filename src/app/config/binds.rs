use crate::app::action::Action;
use crate::app::binds_handler::{KeyPress, SequentialKeyBinding};
use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BindsConfig {
    #[serde(default = "BindsConfig::default_quit")]
    pub quit: Vec<String>,
    #[serde(default = "BindsConfig::default_navigate_up")]
    pub navigate_up: Vec<String>,
    #[serde(default = "BindsConfig::default_navigate_down")]
    pub navigate_down: Vec<String>,
    #[serde(default = "BindsConfig::default_go_to_top")]
    pub go_to_top: Vec<String>,
    #[serde(default = "BindsConfig::default_go_to_bottom")]
    pub go_to_bottom: Vec<String>,
    #[serde(default = "BindsConfig::default_open")]
    pub open: Vec<String>,
    #[serde(default = "BindsConfig::default_back")]
    pub back: Vec<String>,
    #[serde(default = "BindsConfig::default_search")]
    pub search: Vec<String>,
    #[serde(default = "BindsConfig::default_toggle_sort")]
    pub toggle_sort: Vec<String>,
    #[serde(default = "BindsConfig::default_toggle_play_pause")]
    pub toggle_play_pause: Vec<String>,
    #[serde(default = "BindsConfig::default_reload")]
    pub reload: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl BindsConfig {
    fn default_quit() -> Vec<String> {
        keys(&["q", "ctrl-c"])
    }
    fn default_navigate_up() -> Vec<String> {
        keys(&["k", "up"])
    }
    fn default_navigate_down() -> Vec<String> {
        keys(&["j", "down"])
    }
    fn default_go_to_top() -> Vec<String> {
        keys(&["g g", "home"])
    }
    fn default_go_to_bottom() -> Vec<String> {
        keys(&["shift-g", "end"])
    }
    fn default_open() -> Vec<String> {
        keys(&["enter", "l", "right"])
    }
    fn default_back() -> Vec<String> {
        keys(&["esc", "h", "left", "backspace"])
    }
    fn default_search() -> Vec<String> {
        keys(&["/"])
    }
    fn default_toggle_sort() -> Vec<String> {
        keys(&["s"])
    }
    fn default_toggle_play_pause() -> Vec<String> {
        keys(&["space", "p"])
    }
    fn default_reload() -> Vec<String> {
        keys(&["r", "f5"])
    }

    /// Parse a single key like "ctrl-c", "shift-g" or "space".
    pub fn parse_keybinding(key_str: &str) -> Option<KeyPress> {
        let parts: Vec<&str> = key_str.split('-').collect();
        // A lone "-" splits into two empty parts
        let (key_part, modifier_parts) = match parts.as_slice() {
            ["", ""] => ("-", &[][..]),
            [mods @ .., key] => (*key, mods),
            [] => return None,
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in modifier_parts {
            match *part {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part {
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "backspace" => KeyCode::Backspace,
            "tab" => KeyCode::Tab,
            "delete" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "space" => KeyCode::Char(' '),
            f if f.len() > 1 && f.starts_with('f') => KeyCode::F(f[1..].parse().ok()?),
            c => {
                let mut chars = c.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                // Terminals report shifted letters as uppercase
                if modifiers.contains(KeyModifiers::SHIFT) {
                    KeyCode::Char(ch.to_ascii_uppercase())
                } else {
                    KeyCode::Char(ch)
                }
            }
        };

        Some((modifiers, code))
    }

    /// Parse a binding that may hold space-separated sequential keys.
    /// Returns None if any key in the sequence is invalid.
    pub fn parse_binding_string(binding_str: &str) -> Option<Vec<KeyPress>> {
        binding_str
            .split_whitespace()
            .map(Self::parse_keybinding)
            .collect()
    }

    /// Build the single-key map and the list of multi-key sequences.
    pub fn build_key_maps(&self) -> (HashMap<KeyPress, Action>, Vec<SequentialKeyBinding>) {
        let mut single_map = HashMap::new();
        let mut sequential = Vec::new();

        let table: [(&[String], Action); 11] = [
            (&self.quit, Action::Quit),
            (&self.navigate_up, Action::NavigateUp),
            (&self.navigate_down, Action::NavigateDown),
            (&self.go_to_top, Action::GoToTop),
            (&self.go_to_bottom, Action::GoToBottom),
            (&self.open, Action::Open),
            (&self.back, Action::Back),
            (&self.search, Action::Search),
            (&self.toggle_sort, Action::ToggleSort),
            (&self.toggle_play_pause, Action::TogglePlayPause),
            (&self.reload, Action::Reload),
        ];

        for (bindings, action) in table {
            for binding in bindings {
                match Self::parse_binding_string(binding) {
                    Some(sequence) if sequence.len() == 1 => {
                        if let Some(previous) = single_map.insert(sequence[0], action) {
                            log::warn!(
                                "Key {:?} is bound to both {:?} and {:?}, using {:?}",
                                binding,
                                previous,
                                action,
                                action
                            );
                        }
                    }
                    Some(sequence) if !sequence.is_empty() => {
                        sequential.push(SequentialKeyBinding { sequence, action });
                    }
                    _ => log::warn!("Ignoring invalid key binding {:?} for {:?}", binding, action),
                }
            }
        }

        (single_map, sequential)
    }
}

impl Default for BindsConfig {
    fn default() -> Self {
        Self {
            quit: Self::default_quit(),
            navigate_up: Self::default_navigate_up(),
            navigate_down: Self::default_navigate_down(),
            go_to_top: Self::default_go_to_top(),
            go_to_bottom: Self::default_go_to_bottom(),
            open: Self::default_open(),
            back: Self::default_back(),
            search: Self::default_search(),
            toggle_sort: Self::default_toggle_sort(),
            toggle_play_pause: Self::default_toggle_play_pause(),
            reload: Self::default_reload(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keybinding() {
        assert_eq!(
            BindsConfig::parse_keybinding("ctrl-c"),
            Some((KeyModifiers::CONTROL, KeyCode::Char('c')))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("shift-g"),
            Some((KeyModifiers::SHIFT, KeyCode::Char('G')))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("space"),
            Some((KeyModifiers::NONE, KeyCode::Char(' ')))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("f5"),
            Some((KeyModifiers::NONE, KeyCode::F(5)))
        );
        assert_eq!(
            BindsConfig::parse_keybinding("-"),
            Some((KeyModifiers::NONE, KeyCode::Char('-')))
        );
        assert_eq!(BindsConfig::parse_keybinding("hyper-x"), None);
        assert_eq!(BindsConfig::parse_keybinding("nope"), None);
    }

    #[test]
    fn test_default_maps() {
        let (single, sequential) = BindsConfig::default().build_key_maps();

        assert_eq!(
            single.get(&(KeyModifiers::NONE, KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            single.get(&(KeyModifiers::NONE, KeyCode::Char('/'))),
            Some(&Action::Search)
        );
        assert_eq!(sequential.len(), 1);
        assert_eq!(sequential[0].action, Action::GoToTop);
        assert_eq!(sequential[0].sequence.len(), 2);
    }

    #[test]
    fn test_invalid_sequence_is_dropped() {
        let binds = BindsConfig {
            reload: vec!["r bogus".to_string()],
            ..BindsConfig::default()
        };
        let (single, sequential) = binds.build_key_maps();
        assert!(!single.values().any(|a| *a == Action::Reload));
        assert!(!sequential.iter().any(|b| b.action == Action::Reload));
    }
}
