//! Dockable panel lifecycle tests
//!
//! Tests for showing, closing, docking, state persistence and message
//! routing of a panel running against the headless host.

mod common;

use std::path::PathBuf;

use common::{
    sample_tracks, track_panel, Event, HookCall, EDIT_BG, EDIT_ID, HOOK_RESULT, LIST_ID,
    PANEL_RESOURCE, TOOLBAR_COMMAND,
};
use dockpanel::config::ConfigStore;
use dockpanel::geometry::{Point, Rect, Size};
use dockpanel::host::headless::{ControlKind, DialogTemplate, HeadlessHost};
use dockpanel::host::{CommandId, DockEngine, ListControls, TimerId, WindowSystem};
use dockpanel::keys::{KeyCode, KeyDisposition, KeyEvent, Modifiers};
use dockpanel::listview::ListNotify;
use dockpanel::panel::{MsgReply, PanelRegistry, WindowMsg, DEFAULT_MIN_SIZE};
use dockpanel::state::{self, PanelState};

fn saved_state(open: bool, docked: bool, rect: Rect, slot: i32, view: &[u8]) -> Vec<u8> {
    let mut st = PanelState {
        rect,
        dock_slot: slot,
        ..PanelState::default()
    };
    st.set_open(open);
    st.set_docked(docked);
    state::encode(&st, view)
}

// ========================================================================
// Show / Close
// ========================================================================

#[test]
fn test_show_creates_floating_window_with_list() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());

    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    assert!(host.is_window(hwnd));
    assert!(host.is_visible(hwnd));
    assert!(!host.is_docked(hwnd));
    assert_eq!(panel.lists().len(), 1);

    let list = panel.lists()[0].handle();
    assert_eq!(host.row_count(list), 3);
    assert_eq!(host.column_labels(list), ["Name", "Volume", "Mute"]);
}

#[test]
fn test_show_toggle_closes_instead_of_hiding() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());

    panel.show(&mut host, true, false);
    let hwnd = panel.hwnd().unwrap();
    panel.show(&mut host, true, false);

    assert_eq!(panel.hwnd(), None);
    assert!(!host.is_window(hwnd));
    let blob = host.read_blob("dockpanel", "Tracks").unwrap();
    let (st, _) = state::decode(&blob).unwrap();
    assert!(!st.is_open());
}

#[test]
fn test_show_hidden_window_reshows_it() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, false);
    let hwnd = panel.hwnd().unwrap();
    host.show_window(hwnd, false);

    panel.show(&mut host, true, false);
    assert_eq!(panel.hwnd(), Some(hwnd));
    assert!(host.is_visible(hwnd));
}

#[test]
fn test_close_command_persists_state_and_columns() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    *fx.zoom.borrow_mut() = 3;
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    let list = panel.lists()[0].handle();
    host.drag_column_width(list, 1, 80);

    let reply = panel.handle(&mut host, WindowMsg::Command(CommandId::CANCEL));
    assert_eq!(reply, MsgReply::Handled);
    assert_eq!(panel.hwnd(), None);
    assert!(!host.is_window(hwnd));
    assert!(panel.lists().is_empty());

    assert_eq!(
        host.read_string("dockpanel", "tracks").as_deref(),
        Some("1 120 0 80 1 40 2")
    );
    let blob = host.read_blob("dockpanel", "Tracks").unwrap();
    let (st, view) = state::decode(&blob).unwrap();
    assert!(!st.is_open());
    assert!(!st.is_docked());
    assert_eq!(view, &[3]);
    assert_eq!(host.toolbar_refreshes().last(), Some(&TOOLBAR_COMMAND));
}

#[test]
fn test_host_destroy_message_tears_down_once() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();

    panel.handle(&mut host, WindowMsg::Destroy);
    host.destroy_window(hwnd);
    assert_eq!(panel.hwnd(), None);

    // The panel was not closed by the user, so it reopens next session
    let blob = host.read_blob("dockpanel", "Tracks").unwrap();
    let (st, _) = state::decode(&blob).unwrap();
    assert!(st.is_open());
}

// ========================================================================
// Docking
// ========================================================================

#[test]
fn test_toggle_docking_twice_restores_geometry() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    host.set_window_rect(hwnd, Rect::new(200, 150, 500, 400));

    panel.toggle_docking(&mut host);
    let docked = panel.hwnd().unwrap();
    assert!(panel.is_docked());
    assert!(host.is_docked(docked));
    assert!(!host.is_window(hwnd));

    panel.toggle_docking(&mut host);
    let floating = panel.hwnd().unwrap();
    assert!(!panel.is_docked());
    assert!(!host.is_docked(floating));
    assert_eq!(
        host.window_rect(floating),
        Some(Rect::new(200, 150, 500, 400))
    );
    assert_eq!(panel.lists().len(), 1);
}

#[test]
fn test_docked_show_activates_docker() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    panel.toggle_docking(&mut host);
    let hwnd = panel.hwnd().unwrap();
    let before = host.dock_activations().len();

    panel.show(&mut host, false, true);
    assert_eq!(panel.hwnd(), Some(hwnd));
    assert!(host.dock_activations().len() > before);
}

#[test]
fn test_save_state_records_dock_slot() {
    let mut host = common::host();
    host.set_default_dock_slot(5);
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    panel.toggle_docking(&mut host);

    let blob = panel.save_state(&host);
    let (st, _) = state::decode(&blob).unwrap();
    assert!(st.is_open());
    assert!(st.is_docked());
    assert_eq!(st.dock_slot, 5);
}

// ========================================================================
// Loading state
// ========================================================================

#[test]
fn test_registered_panel_restores_floating_without_docker() {
    let mut host = common::host();
    let blob = saved_state(true, false, Rect::new(100, 100, 400, 300), 0, &[]);
    host.write_blob("dockpanel", "Tracks", &blob);

    let mut registry = PanelRegistry::new();
    let (panel, _fx) = track_panel("Tracks", sample_tracks());
    let key = registry.register(&mut host, panel);

    let hwnd = registry.get(key).and_then(|p| p.hwnd()).unwrap();
    assert_eq!(host.window_rect(hwnd), Some(Rect::new(100, 100, 400, 300)));
    assert!(!host.is_docked(hwnd));
    assert!(host.dock_activations().is_empty());
    assert_eq!(registry.panel_for_window(hwnd), Some(key));
}

#[test]
fn test_load_state_clamps_offscreen_rect() {
    let mut host = common::host();
    host.set_screen(Rect::new(0, 0, 1024, 768));
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    let blob = saved_state(true, false, Rect::new(3000, 2000, 3300, 2200), 0, &[]);

    panel.load_state(&mut host, &blob);
    let r = host.window_rect(panel.hwnd().unwrap()).unwrap();
    assert!(r.intersects(&Rect::new(0, 0, 1024, 768)));
    assert_eq!(r.size(), Size::new(300, 200));
}

#[test]
fn test_load_state_closed_destroys_open_window() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();

    let blob = saved_state(false, false, Rect::new(10, 10, 310, 210), 0, &[]);
    panel.load_state(&mut host, &blob);
    assert_eq!(panel.hwnd(), None);
    assert!(!host.is_window(hwnd));
}

#[test]
fn test_load_state_dock_change_recreates_window() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let floating = panel.hwnd().unwrap();

    let blob = saved_state(true, true, Rect::default(), 3, &[]);
    panel.load_state(&mut host, &blob);
    let docked = panel.hwnd().unwrap();
    assert_ne!(floating, docked);
    assert_eq!(host.remembered_dock_slot("Tracks"), Some(3));
    assert_eq!(host.dock_slot_of(docked), Some(3));
}

#[test]
fn test_load_state_same_mode_keeps_window() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();

    let blob = saved_state(true, false, Rect::new(50, 50, 350, 250), 0, &[]);
    panel.load_state(&mut host, &blob);
    assert_eq!(panel.hwnd(), Some(hwnd));
}

#[test]
fn test_load_state_hands_view_bytes_to_panel() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    let blob = saved_state(false, false, Rect::default(), 0, &[9]);

    panel.load_state(&mut host, &blob);
    assert_eq!(*fx.zoom.borrow(), 9);
    assert_eq!(panel.hwnd(), None);
}

#[test]
fn test_load_short_blob_means_closed() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);

    panel.load_state(&mut host, &[1, 2, 3]);
    assert_eq!(panel.hwnd(), None);
    assert!(!panel.state().is_open());
}

// ========================================================================
// Message routing
// ========================================================================

#[test]
fn test_default_context_menu_items() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    host.queue_menu_reply(None);

    panel.handle(&mut host, WindowMsg::ContextMenu(Point::KEYBOARD));
    let menu = host.menus_shown().last().unwrap();
    assert_eq!(
        menu.item(CommandId::TOGGLE_DOCK),
        Some(("Dock Tracks in Docker", false))
    );
    assert!(menu.item(CommandId::CANCEL).is_some());
}

#[test]
fn test_context_menu_dock_item_docks_panel() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    host.queue_menu_reply(Some(CommandId::TOGGLE_DOCK));

    panel.handle(&mut host, WindowMsg::ContextMenu(Point::new(10, 280)));
    assert!(panel.is_docked());
    assert!(host.is_docked(panel.hwnd().unwrap()));
}

#[test]
fn test_header_context_menu_hides_column() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let list = panel.lists()[0].handle();
    // Second entry after the caption toggles "Volume"
    host.queue_menu_reply(Some(CommandId(2)));

    panel.handle(&mut host, WindowMsg::ContextMenu(Point::new(10, 5)));
    assert_eq!(host.column_labels(list), ["Name", "Mute"]);
    assert_eq!(host.row_count(list), 3);
    // No default items: the column menu took the click
    assert!(host
        .menus_shown()
        .last()
        .unwrap()
        .item(CommandId::TOGGLE_DOCK)
        .is_none());
}

#[test]
fn test_resize_skipped_when_minimized() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();

    panel.handle(&mut host, WindowMsg::Resize { minimized: true });
    assert_eq!(host.relayout_count(hwnd), 0);
    panel.handle(&mut host, WindowMsg::Resize { minimized: false });
    assert_eq!(host.relayout_count(hwnd), 1);
}

#[test]
fn test_min_size_default() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    assert_eq!(
        panel.handle(&mut host, WindowMsg::GetMinSize),
        MsgReply::MinSize(DEFAULT_MIN_SIZE)
    );
}

#[test]
fn test_messages_without_window_are_ignored() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    assert_eq!(panel.handle(&mut host, WindowMsg::Paint), MsgReply::Value(0));
}

#[test]
fn test_mouse_move_arms_tooltip_and_timer_shows_row_tip() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    let list = panel.lists()[0].handle();
    host.set_focus(list);

    let at = host.cell_center(list, 0, 0).unwrap();
    host.set_cursor(at);
    let client = host.screen_to_client(hwnd, at);
    panel.handle(&mut host, WindowMsg::MouseMove(client));
    assert_eq!(host.timer_interval(hwnd, TimerId::TOOLTIP), Some(350));

    panel.handle(&mut host, WindowMsg::Timer(TimerId::TOOLTIP));
    assert_eq!(panel.tooltip(), Some("Track bass"));
    assert!(!host.timer_active(TimerId::TOOLTIP));
    assert!(host.invalidation_count(hwnd) > 0);

    panel.handle(&mut host, WindowMsg::MouseDown(Point::new(1, 1)));
    assert_eq!(panel.tooltip(), None);
}

#[test]
fn test_mouse_down_unclaimed_does_not_capture() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    host.set_focus(panel.lists()[0].handle());

    panel.handle(&mut host, WindowMsg::MouseDown(Point::new(5, 290)));
    assert_eq!(host.capture(), None);
    assert_eq!(host.focus(), Some(hwnd));
}

#[test]
fn test_dropped_files_reach_panel_hook() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);

    let files = vec![PathBuf::from("/tmp/kick.wav"), PathBuf::from("/tmp/snare.wav")];
    let reply = panel.handle(&mut host, WindowMsg::DropFiles(files.clone()));

    assert_eq!(reply, MsgReply::Handled);
    assert_eq!(*fx.calls.borrow(), [HookCall::Dropped(files)]);
}

#[test]
fn test_color_edit_returns_hook_color() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let edit = host.dialog_item(panel.hwnd().unwrap(), EDIT_ID).unwrap();

    let reply = panel.handle(&mut host, WindowMsg::ColorEdit(edit));

    assert_eq!(reply, MsgReply::Color(Some(EDIT_BG)));
    assert_eq!(*fx.calls.borrow(), [HookCall::ColorEdit(edit)]);
}

#[test]
fn test_unrouted_message_goes_to_unhandled_hook() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);

    let reply = panel.handle(
        &mut host,
        WindowMsg::Other {
            msg: 0x0400,
            wparam: 3,
            lparam: -1,
        },
    );

    assert_eq!(reply, MsgReply::Value(HOOK_RESULT));
    assert_eq!(*fx.calls.borrow(), [HookCall::Unhandled(0x0400, 3, -1)]);
}

#[test]
fn test_foreign_timer_goes_to_hook_and_own_timers_do_not() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);

    panel.handle(&mut host, WindowMsg::Timer(TimerId::TOOLTIP));
    panel.handle(&mut host, WindowMsg::Timer(TimerId::CELL_EDIT));
    assert!(fx.calls.borrow().is_empty());

    panel.handle(&mut host, WindowMsg::Timer(TimerId(7)));
    assert_eq!(*fx.calls.borrow(), [HookCall::Timer(TimerId(7))]);
}

#[test]
fn test_notify_from_foreign_control_goes_to_hook() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    let edit = host.dialog_item(hwnd, EDIT_ID).unwrap();
    let list = host.dialog_item(hwnd, LIST_ID).unwrap();

    let reply = panel.handle(
        &mut host,
        WindowMsg::Notify {
            from: edit,
            notify: ListNotify::Other(42),
        },
    );
    assert_eq!(reply, MsgReply::Value(HOOK_RESULT));
    assert_eq!(
        *fx.calls.borrow(),
        [HookCall::Notify(edit, ListNotify::Other(42))]
    );

    // The bound list's own notifications stay with its list view
    let reply = panel.handle(
        &mut host,
        WindowMsg::Notify {
            from: list,
            notify: ListNotify::ColumnClick { col: 1 },
        },
    );
    assert_eq!(reply, MsgReply::Value(0));
    assert_eq!(fx.calls.borrow().len(), 1);
    assert_eq!(host.sort_indicator(list), Some((1, false)));
}

#[test]
fn test_failed_window_creation_leaves_panel_closed() {
    let mut host = HeadlessHost::new();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());

    panel.show(&mut host, false, true);
    assert_eq!(panel.hwnd(), None);
    assert!(host.toolbar_refreshes().is_empty());

    host.define_template(
        PANEL_RESOURCE,
        DialogTemplate::new(Size::new(400, 300))
            .with_control(LIST_ID, ControlKind::List, Rect::new(0, 0, 400, 260)),
    );
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    assert!(host.is_visible(hwnd));
    assert_eq!(panel.lists().len(), 1);
}

// ========================================================================
// Keys
// ========================================================================

#[test]
fn test_keys_ignored_when_panel_inactive() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let other = host.add_window(None, Rect::new(0, 0, 10, 10));
    host.set_focus(other);

    let key = KeyEvent::char('a', Modifiers::CTRL);
    assert_eq!(panel.key_handler(&mut host, &key), KeyDisposition::Ignored);
}

#[test]
fn test_ctrl_a_selects_all_when_list_focused() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let list = panel.lists()[0].handle();
    host.set_focus(list);

    let key = KeyEvent::char('a', Modifiers::CTRL);
    assert_eq!(panel.key_handler(&mut host, &key), KeyDisposition::Handled);
    assert_eq!(host.selected_count(list), 3);
}

#[test]
fn test_unwanted_key_passes_to_host_when_focused() {
    let mut host = common::host();
    let (mut panel, _fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    host.set_focus(panel.hwnd().unwrap());

    let key = KeyEvent::char('x', Modifiers::NONE);
    assert_eq!(
        panel.key_handler(&mut host, &key),
        KeyDisposition::PassToHost
    );
    assert_eq!(KeyDisposition::PassToHost.code(), -666);
}

#[test]
fn test_escape_cancels_edit_without_mutation() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let list = panel.lists()[0].handle();
    host.set_focus(list);

    panel.handle(
        &mut host,
        WindowMsg::Notify {
            from: list,
            notify: dockpanel::listview::ListNotify::DoubleClick {
                row: Some(0),
                col: Some(0),
            },
        },
    );
    let edit = panel.lists()[0].edit_handle().unwrap();
    assert_eq!(panel.lists()[0].editing(), Some((0, 0)));
    host.set_window_text(edit, "typed");

    let esc = KeyEvent::down(KeyCode::Escape, Modifiers::NONE);
    assert_eq!(panel.key_handler(&mut host, &esc), KeyDisposition::Handled);
    assert_eq!(panel.lists()[0].editing(), None);
    assert!(!host.is_visible(edit));
    assert_eq!(host.cell_text(list, 0, 0), "bass");
    assert!(!fx
        .log
        .borrow()
        .iter()
        .any(|e| matches!(e, Event::SetText(..))));
}

#[test]
fn test_enter_commits_edit_exactly_once() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let list = panel.lists()[0].handle();
    host.set_focus(list);

    panel.handle(
        &mut host,
        WindowMsg::Notify {
            from: list,
            notify: dockpanel::listview::ListNotify::DoubleClick {
                row: Some(0),
                col: Some(0),
            },
        },
    );
    let edit = panel.lists()[0].edit_handle().unwrap();
    host.set_window_text(edit, "Zither");

    let enter = KeyEvent::down(KeyCode::Enter, Modifiers::NONE);
    assert_eq!(panel.key_handler(&mut host, &enter), KeyDisposition::Handled);

    let writes: Vec<Event> = fx
        .log
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::SetText(..)))
        .cloned()
        .collect();
    assert_eq!(
        writes,
        [Event::SetText(dockpanel::host::ItemId(2), 0, "Zither".into())]
    );
    // Re-sorted after the commit
    assert_eq!(
        common::column_text(&host, list, 0),
        ["Drums", "Vocals", "Zither"]
    );
}

#[test]
fn test_edit_timer_commits_when_focus_leaves() {
    let mut host = common::host();
    let (mut panel, fx) = track_panel("Tracks", sample_tracks());
    panel.show(&mut host, false, true);
    let hwnd = panel.hwnd().unwrap();
    let list = panel.lists()[0].handle();

    panel.handle(
        &mut host,
        WindowMsg::Notify {
            from: list,
            notify: dockpanel::listview::ListNotify::DoubleClick {
                row: Some(1),
                col: Some(0),
            },
        },
    );
    assert_eq!(host.timer_interval(hwnd, TimerId::CELL_EDIT), Some(50));
    let edit = panel.lists()[0].edit_handle().unwrap();
    host.set_window_text(edit, "Drum Bus");
    host.set_focus(hwnd);

    panel.handle(&mut host, WindowMsg::Timer(TimerId::CELL_EDIT));
    assert_eq!(panel.lists()[0].editing(), None);
    assert_eq!(fx.model.borrow()[0].name, "Drum Bus");
    assert!(!host.timer_active(TimerId::CELL_EDIT));
}
