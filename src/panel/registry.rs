//! Panel registry
//!
//! Owns every registered panel in a generational arena and maps live
//! windows back to their panel, so host messages, accelerator keys and
//! screenset requests can be routed without raw instance pointers.

use std::collections::HashMap;

use crate::config::ConfigStore;
use crate::host::{Host, Registrar, WindowHandle};
use crate::keys::{KeyDisposition, KeyEvent};
use crate::screenset::{ScreensetAction, ScreensetReply};

use super::dockable::{DockablePanel, MsgReply, WindowMsg};

/// Stable handle to a registered panel
///
/// A key outlives its panel: after `unregister` it simply stops resolving,
/// even if the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PanelKey {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    panel: Option<DockablePanel>,
}

#[derive(Debug, Default)]
pub struct PanelRegistry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    windows: HashMap<WindowHandle, PanelKey>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a panel, hook it into the host tables and restore its saved state
    pub fn register(&mut self, host: &mut dyn Host, panel: DockablePanel) -> PanelKey {
        host.register_screenset(panel.id());
        host.register_accelerator(panel.id());
        tracing::info!("Registered panel {}", panel.id());

        let key = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.panel = Some(panel);
                PanelKey {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    panel: Some(panel),
                });
                PanelKey {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };

        if let Some(panel) = self.get_mut(key) {
            panel.init_from_config(host);
        }
        self.sync_window(key);
        key
    }

    /// Remove a panel, closing its window if open
    pub fn unregister(&mut self, host: &mut dyn Host, key: PanelKey) -> Option<DockablePanel> {
        let slot = self.slots.get_mut(key.index)?;
        if slot.generation != key.generation {
            return None;
        }
        let mut panel = slot.panel.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.windows.retain(|_, k| *k != key);

        host.unregister_accelerator(panel.id());
        panel.destroy(host);
        tracing::info!("Unregistered panel {}", panel.id());
        Some(panel)
    }

    pub fn get(&self, key: PanelKey) -> Option<&DockablePanel> {
        self.slots
            .get(key.index)
            .filter(|s| s.generation == key.generation)?
            .panel
            .as_ref()
    }

    pub fn get_mut(&mut self, key: PanelKey) -> Option<&mut DockablePanel> {
        self.slots
            .get_mut(key.index)
            .filter(|s| s.generation == key.generation)?
            .panel
            .as_mut()
    }

    /// Look a panel up by its persistence id
    pub fn find(&self, id: &str) -> Option<PanelKey> {
        self.keys().find(|&k| self.get(k).is_some_and(|p| p.id() == id))
    }

    pub fn panel_for_window(&self, hwnd: WindowHandle) -> Option<PanelKey> {
        self.windows.get(&hwnd).copied()
    }

    /// Keys of all registered panels in registration slot order
    pub fn keys(&self) -> impl Iterator<Item = PanelKey> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, s)| {
            s.panel.as_ref().map(|_| PanelKey {
                index,
                generation: s.generation,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.panel.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Routing
    // =========================================================================

    pub fn show(&mut self, host: &mut dyn Host, key: PanelKey, toggle: bool, activate: bool) {
        if let Some(panel) = self.get_mut(key) {
            panel.show(host, toggle, activate);
        }
        self.sync_window(key);
    }

    pub fn toggle_docking(&mut self, host: &mut dyn Host, key: PanelKey) {
        if let Some(panel) = self.get_mut(key) {
            panel.toggle_docking(host);
        }
        self.sync_window(key);
    }

    /// Deliver a host message to the panel owning `hwnd`
    ///
    /// Returns `None` when no registered panel owns the window.
    pub fn dispatch(
        &mut self,
        host: &mut dyn Host,
        hwnd: WindowHandle,
        msg: WindowMsg,
    ) -> Option<MsgReply> {
        let key = self.panel_for_window(hwnd)?;
        let reply = self.get_mut(key)?.handle(host, msg);
        self.sync_window(key);
        Some(reply)
    }

    /// Offer a key to each panel's accelerator hook; the first one that
    /// does not ignore it wins
    pub fn translate_accel(&mut self, host: &mut dyn Host, key: &KeyEvent) -> KeyDisposition {
        let keys: Vec<PanelKey> = self.keys().collect();
        for k in keys {
            let Some(panel) = self.get_mut(k) else {
                continue;
            };
            let r = panel.key_handler(host, key);
            self.sync_window(k);
            if r != KeyDisposition::Ignored {
                return r;
            }
        }
        KeyDisposition::Ignored
    }

    /// Serve a screenset request addressed to panel `id`
    pub fn screenset(
        &mut self,
        host: &mut dyn Host,
        id: &str,
        action: ScreensetAction<'_>,
    ) -> Option<ScreensetReply> {
        let key = self.find(id)?;
        let reply = self.get_mut(key)?.on_screenset(host, action);
        self.sync_window(key);
        Some(reply)
    }

    /// Persist every panel's state, e.g. before the host exits
    pub fn save_all(&mut self, host: &mut dyn Host) {
        let keys: Vec<PanelKey> = self.keys().collect();
        for k in keys {
            let Some(panel) = self.get_mut(k) else {
                continue;
            };
            let blob = panel.save_state(host);
            if !blob.is_empty() {
                let section = panel.settings().section.clone();
                host.write_blob(&section, panel.id(), &blob);
            }
        }
    }

    /// Re-point the window map after a transition created or destroyed
    /// the panel's window
    fn sync_window(&mut self, key: PanelKey) {
        let hwnd = self.get(key).and_then(|p| p.hwnd());
        self.windows.retain(|h, k| *k != key || Some(*h) == hwnd);
        if let Some(hwnd) = hwnd {
            self.windows.insert(hwnd, key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelSettings;
    use crate::geometry::Size;
    use crate::host::headless::{DialogTemplate, HeadlessHost};
    use crate::host::{CommandId, WindowSystem};
    use crate::panel::{PanelConfig, PanelHooks};

    struct Blank;

    impl PanelHooks for Blank {}

    fn panel(id: &str) -> DockablePanel {
        let config = PanelConfig {
            id: id.into(),
            title: id.into(),
            resource: 1,
            dock_order: 0,
            command: 42,
        };
        DockablePanel::new(config, PanelSettings::default(), Box::new(Blank))
    }

    fn host() -> HeadlessHost {
        let mut host = HeadlessHost::new();
        host.define_template(1, DialogTemplate::new(Size::new(200, 150)));
        host
    }

    #[test]
    fn test_register_hooks_host_tables() {
        let mut host = host();
        let mut reg = PanelRegistry::new();
        let key = reg.register(&mut host, panel("Notes"));
        assert_eq!(host.screensets(), ["Notes".to_string()]);
        assert_eq!(host.accelerators(), ["Notes".to_string()]);
        assert_eq!(reg.find("Notes"), Some(key));
        assert_eq!(reg.get(key).map(|p| p.hwnd()), Some(None));

        reg.unregister(&mut host, key);
        assert!(host.accelerators().is_empty());
    }

    #[test]
    fn test_stale_key_does_not_resolve_after_reuse() {
        let mut host = host();
        let mut reg = PanelRegistry::new();
        let old = reg.register(&mut host, panel("A"));
        reg.unregister(&mut host, old);
        let new = reg.register(&mut host, panel("B"));
        assert!(reg.get(old).is_none());
        assert_eq!(reg.get(new).map(|p| p.id()), Some("B"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_dispatch_follows_window_lifetime() {
        let mut host = host();
        let mut reg = PanelRegistry::new();
        let key = reg.register(&mut host, panel("A"));
        reg.show(&mut host, key, false, true);
        let hwnd = reg.get(key).and_then(|p| p.hwnd()).unwrap();
        assert_eq!(reg.panel_for_window(hwnd), Some(key));

        let reply = reg.dispatch(&mut host, hwnd, WindowMsg::Command(CommandId::CANCEL));
        assert_eq!(reply, Some(MsgReply::Handled));
        assert!(!host.is_window(hwnd));
        assert_eq!(reg.panel_for_window(hwnd), None);
        assert_eq!(reg.dispatch(&mut host, hwnd, WindowMsg::Paint), None);
    }

    #[test]
    fn test_toggle_docking_remaps_new_window() {
        let mut host = host();
        let mut reg = PanelRegistry::new();
        let key = reg.register(&mut host, panel("A"));
        reg.show(&mut host, key, false, true);
        let first = reg.get(key).and_then(|p| p.hwnd()).unwrap();

        reg.toggle_docking(&mut host, key);
        let second = reg.get(key).and_then(|p| p.hwnd()).unwrap();
        assert_ne!(first, second);
        assert!(host.is_docked(second));
        assert_eq!(reg.panel_for_window(first), None);
        assert_eq!(reg.panel_for_window(second), Some(key));
    }

    #[test]
    fn test_screenset_unknown_id() {
        let mut host = host();
        let mut reg = PanelRegistry::new();
        reg.register(&mut host, panel("A"));
        assert_eq!(
            reg.screenset(&mut host, "Missing", ScreensetAction::IsDocked),
            None
        );
        assert_eq!(
            reg.screenset(&mut host, "A", ScreensetAction::IsDocked),
            Some(ScreensetReply::Docked(false))
        );
    }
}
