use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::app::action::Action;

pub type KeyPress = (KeyModifiers, KeyCode);

/// Multi-key binding such as "g g"
#[derive(Debug, Clone)]
pub struct SequentialKeyBinding {
    pub sequence: Vec<KeyPress>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
enum KeyState {
    Idle,
    Awaiting {
        sequence: Vec<KeyPress>,
        timeout: Instant,
    },
}

/// Resolves key presses to actions, including sequential bindings.
#[derive(Debug)]
pub struct KeyBinds {
    single_map: HashMap<KeyPress, Action>,
    sequential_bindings: Vec<SequentialKeyBinding>,
    state: KeyState,
    timeout: Duration,
}

impl KeyBinds {
    pub fn new(
        single_map: HashMap<KeyPress, Action>,
        sequential_bindings: Vec<SequentialKeyBinding>,
    ) -> Self {
        Self {
            single_map,
            sequential_bindings,
            state: KeyState::Idle,
            timeout: Duration::from_millis(1000),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        self.handle_press((key.modifiers, key.code), Instant::now())
    }

    fn handle_press(&mut self, press: KeyPress, now: Instant) -> Option<Action> {
        if let KeyState::Awaiting { sequence, timeout } = &mut self.state {
            if *timeout >= now {
                sequence.push(press);
                let sequence = sequence.clone();
                return self.continue_sequence(sequence, now);
            }
            // Expired, treat the key as a fresh press
            self.state = KeyState::Idle;
        }

        if let Some(action) = self.single_map.get(&press) {
            return Some(*action);
        }

        if self
            .sequential_bindings
            .iter()
            .any(|binding| binding.sequence.first() == Some(&press))
        {
            self.state = KeyState::Awaiting {
                sequence: vec![press],
                timeout: now + self.timeout,
            };
        }
        None
    }

    fn continue_sequence(&mut self, sequence: Vec<KeyPress>, now: Instant) -> Option<Action> {
        if let Some(binding) = self
            .sequential_bindings
            .iter()
            .find(|binding| binding.sequence == sequence)
        {
            self.state = KeyState::Idle;
            return Some(binding.action);
        }

        let still_possible = self
            .sequential_bindings
            .iter()
            .any(|binding| binding.sequence.starts_with(&sequence));

        self.state = if still_possible {
            KeyState::Awaiting {
                sequence,
                timeout: now + self.timeout,
            }
        } else {
            KeyState::Idle
        };
        None
    }

    /// Keys typed so far in an unfinished sequence
    pub fn pending_sequence(&self) -> &[KeyPress] {
        match &self.state {
            KeyState::Awaiting { sequence, .. } => sequence,
            KeyState::Idle => &[],
        }
    }

    /// Drop an expired partial sequence. Call once per frame.
    pub fn update(&mut self) {
        if let KeyState::Awaiting { timeout, .. } = &self.state
            && *timeout < Instant::now()
        {
            self.state = KeyState::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.state = KeyState::Idle;
    }
}
