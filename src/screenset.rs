//! Screenset callbacks
//!
//! The host's screenset feature snapshots and restores window layouts. It
//! reaches each registered panel by id with one of a handful of actions.

use crate::host::{Host, WindowHandle};
use crate::panel::DockablePanel;

/// Request the screenset feature makes of a panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreensetAction<'a> {
    /// Window handle while open
    GetHandle,
    IsDocked,
    /// (Re)open in the given dock mode
    Show { docked: bool },
    Close,
    /// Flip dock mode if open
    SwitchDock,
    LoadState(&'a [u8]),
    SaveState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreensetReply {
    None,
    Handle(Option<WindowHandle>),
    Docked(bool),
    State(Vec<u8>),
}

impl DockablePanel {
    /// Serve a screenset request
    pub fn on_screenset(&mut self, host: &mut dyn Host, action: ScreensetAction<'_>) -> ScreensetReply {
        tracing::debug!(id = %self.id(), ?action, "Screenset request");
        match action {
            ScreensetAction::GetHandle => {
                ScreensetReply::Handle(self.hwnd().filter(|_| self.is_open(host)))
            }
            ScreensetAction::IsDocked => ScreensetReply::Docked(self.is_docked()),
            ScreensetAction::Show { docked } => {
                self.reopen(host, docked);
                ScreensetReply::None
            }
            ScreensetAction::Close => {
                self.close(host);
                ScreensetReply::None
            }
            ScreensetAction::SwitchDock => {
                if self.is_open(host) {
                    self.toggle_docking(host);
                }
                ScreensetReply::None
            }
            ScreensetAction::LoadState(blob) => {
                self.load_state(host, blob);
                ScreensetReply::None
            }
            ScreensetAction::SaveState => ScreensetReply::State(self.save_state(host)),
        }
    }
}
