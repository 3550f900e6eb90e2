#![allow(missing_docs)]

//! Styled text produced by the rules engine for a driver to render.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ItemKind, TreasureKind};

/// Rendering hint attached to a piece of narrative text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Ordinary prose.
    Plain,
    /// Amounts of gold.
    Gold,
    /// Item names.
    Item,
    /// Treasure names.
    Treasure,
    /// Terrain names.
    Terrain,
    /// The samurai's blade.
    Katana,
    /// Threats and losses.
    Danger,
    /// Townsfolk giving in.
    Friendly,
    /// Good news.
    Success,
    /// Mild alarm.
    Warning,
}

/// A run of text sharing one tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Text exactly as it should be shown, newlines included.
    pub text: String,
    /// How the text should be styled.
    pub tone: Tone,
}

/// Ordered narrative fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    fragments: Vec<Fragment>,
}

impl Narrative {
    /// Empty narrative.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text with the given tone, merging with the previous fragment
    /// when the tone matches.
    pub fn push(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.append(text, tone);
        self
    }

    /// In-place variant of [`Narrative::push`].
    pub fn append(&mut self, text: impl Into<String>, tone: Tone) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.fragments.last_mut() {
            Some(last) if last.tone == tone => last.text.push_str(&text),
            _ => self.fragments.push(Fragment { text, tone }),
        }
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.push(text, Tone::Plain)
    }

    /// `"<amount> gold"` in the gold tone.
    pub fn gold(self, amount: i32) -> Self {
        self.push(format!("{amount} gold"), Tone::Gold)
    }

    pub fn item(self, item: ItemKind) -> Self {
        let tone = if item == ItemKind::Katana {
            Tone::Katana
        } else {
            Tone::Item
        };
        self.push(item.name(), tone)
    }

    pub fn treasure(self, treasure: TreasureKind) -> Self {
        self.push(treasure.label(), Tone::Treasure)
    }

    pub fn terrain(self, name: &str) -> Self {
        self.push(name, Tone::Terrain)
    }

    /// Append another narrative after this one.
    pub fn then(mut self, other: Narrative) -> Self {
        for fragment in other.fragments {
            self.append(fragment.text, fragment.tone);
        }
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Split into lines of fragments, breaking on embedded newlines.
    pub fn lines(&self) -> Vec<Vec<Fragment>> {
        let mut lines = vec![Vec::new()];
        for fragment in &self.fragments {
            let mut parts = fragment.text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push(Fragment {
                            text: part.to_string(),
                            tone: fragment.tone,
                        });
                    }
                }
                if parts.peek().is_some() {
                    lines.push(Vec::new());
                }
            }
        }
        if lines.len() > 1 && lines.last().map(Vec::is_empty).unwrap_or(false) {
            lines.pop();
        }
        lines
    }
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            f.write_str(&fragment.text)?;
        }
        Ok(())
    }
}
