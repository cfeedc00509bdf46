//! Popup menu model handed to the host for tracking

use crate::host::CommandId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        label: String,
        command: CommandId,
        checked: bool,
        enabled: bool,
    },
    Separator,
}

/// A flat popup menu
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>, command: CommandId) -> &mut Self {
        self.entries.push(MenuEntry::Item {
            label: label.into(),
            command,
            checked: false,
            enabled: true,
        });
        self
    }

    /// Greyed-out caption line
    pub fn add_caption(&mut self, label: impl Into<String>) -> &mut Self {
        self.entries.push(MenuEntry::Item {
            label: label.into(),
            command: CommandId::NONE,
            checked: false,
            enabled: false,
        });
        self
    }

    pub fn add_separator(&mut self) -> &mut Self {
        self.entries.push(MenuEntry::Separator);
        self
    }

    /// Check the item carrying `command`; no-op if absent
    pub fn check(&mut self, command: CommandId, checked: bool) {
        for entry in &mut self.entries {
            if let MenuEntry::Item {
                command: c,
                checked: ch,
                ..
            } = entry
            {
                if *c == command {
                    *ch = checked;
                }
            }
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label and checked state of the item carrying `command`
    pub fn item(&self, command: CommandId) -> Option<(&str, bool)> {
        self.entries.iter().find_map(|e| match e {
            MenuEntry::Item {
                label,
                command: c,
                checked,
                ..
            } if *c == command => Some((label.as_str(), *checked)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_marks_matching_item() {
        let mut menu = Menu::new();
        menu.add("One", CommandId(1)).add_separator().add("Two", CommandId(2));
        menu.check(CommandId(2), true);
        assert_eq!(menu.item(CommandId(2)), Some(("Two", true)));
        assert_eq!(menu.item(CommandId(1)), Some(("One", false)));
        assert_eq!(menu.entries().len(), 3);
    }
}
