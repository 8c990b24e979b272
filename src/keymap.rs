#![cfg(feature = "std")]
//! Key bindings for the terminal front-end.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use log::warn;

/// Player commands reachable from the main prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Command {
    Attack,
    UseAbility,
    SaveGame,
    LoadGame,
    DisplayFields,
    Quit,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Attack,
        Command::UseAbility,
        Command::SaveGame,
        Command::LoadGame,
        Command::DisplayFields,
        Command::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Attack => "attack",
            Command::UseAbility => "ability",
            Command::SaveGame => "save",
            Command::LoadGame => "load",
            Command::DisplayFields => "display",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unknown command {:?}", s))
    }
}

/// Mapping from a single key to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    keys: BTreeMap<char, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        let keys = [
            ('a', Command::Attack),
            ('s', Command::UseAbility),
            ('v', Command::SaveGame),
            ('l', Command::LoadGame),
            ('d', Command::DisplayFields),
            ('q', Command::Quit),
        ]
        .into_iter()
        .collect();
        Keymap { keys }
    }
}

impl Keymap {
    /// Parse `key = command` lines. Blank lines and `#` comments are skipped;
    /// malformed lines are logged and ignored. The result must bind every
    /// command to exactly one key.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut keys = BTreeMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, command)) = line.split_once('=') else {
                warn!("keymap line {}: expected `key = command`: {}", n + 1, line);
                continue;
            };
            let mut key_chars = key.trim().chars();
            let key = match (key_chars.next(), key_chars.next()) {
                (Some(k), None) => k.to_ascii_lowercase(),
                _ => {
                    warn!("keymap line {}: invalid key {:?}", n + 1, key.trim());
                    continue;
                }
            };
            match command.trim().parse::<Command>() {
                Ok(command) => {
                    if keys.insert(key, command).is_some() {
                        return Err(anyhow!("key {:?} is bound more than once", key));
                    }
                }
                Err(e) => warn!("keymap line {}: {}", n + 1, e),
            }
        }
        let keymap = Keymap { keys };
        keymap.validate()?;
        Ok(keymap)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read keymap {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid keymap {}", path.display()))
    }

    /// Load `path`, falling back to the default bindings on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            warn!("{:#}; using default keymap", e);
            Self::default()
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        for command in Command::ALL {
            match self.keys.values().filter(|c| **c == command).count() {
                0 => return Err(anyhow!("missing binding for {}", command.name())),
                1 => {}
                _ => return Err(anyhow!("{} is bound to several keys", command.name())),
            }
        }
        Ok(())
    }

    pub fn command_for(&self, key: char) -> Option<Command> {
        self.keys.get(&key.to_ascii_lowercase()).copied()
    }

    pub fn key_for(&self, command: Command) -> Option<char> {
        self.keys
            .iter()
            .find_map(|(k, c)| (*c == command).then_some(*k))
    }
}

impl fmt::Display for Keymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, command) in &self.keys {
            writeln!(f, "{} - {}", key, command.name())?;
        }
        Ok(())
    }
}
