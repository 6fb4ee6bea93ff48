use super::*;
use crate::sim::{SimHost, SIM_EXTENSION_ORIGIN};
use serde_json::json;

fn agent() -> PageAgent<SimHost> {
    PageAgent::new(SimHost::new(SIM_EXTENSION_ORIGIN))
}

fn close_signal() -> serde_json::Value {
    json!({"type": "QUICKPASTE_CLOSE"})
}

#[test]
fn editor_url_percent_encodes_the_id() {
    assert_eq!(editor_url("ext/editor.html", None), "ext/editor.html");
    assert_eq!(
        editor_url("ext/editor.html", Some("a b/c")),
        "ext/editor.html?id=a%20b%2Fc"
    );
}

#[test]
fn show_editor_mounts_overlay_frame_and_suspends_scroll() {
    let mut agent = agent();
    assert!(agent.show_editor(Some("42")).expect("mount"));
    assert!(agent.is_mounted());

    let host = agent.host();
    assert_eq!(host.count(OVERLAY_ELEMENT_ID), 1);
    let frame = host.frame().expect("frame");
    assert_eq!(frame.parent_id.as_deref(), Some(OVERLAY_ELEMENT_ID));
    let spec = frame.frame.expect("frame spec");
    assert_eq!(spec.element_id, FRAME_ELEMENT_ID);
    assert_eq!(spec.allow, "clipboard-write");
    assert_eq!(
        spec.src,
        "chrome-extension://quickpaste/editor/editor.html?id=42"
    );
    assert_eq!(host.body_overflow().as_deref(), Some("hidden"));
}

#[test]
fn duplicate_show_requests_keep_a_single_overlay() {
    let mut agent = agent();
    let message = AgentMessage::ShowEditor { snippet_id: None };
    agent.handle_runtime_message(&message).expect("first");
    agent.handle_runtime_message(&message).expect("second");
    assert!(!agent.show_editor(Some("other")).expect("third"));
    assert_eq!(agent.host().count(OVERLAY_ELEMENT_ID), 1);
    assert_eq!(agent.host().count(FRAME_ELEMENT_ID), 1);
}

#[test]
fn second_agent_instance_in_the_same_page_does_not_mount_again() {
    let host = SimHost::new(SIM_EXTENSION_ORIGIN);
    let mut resident = PageAgent::new(host.clone());
    let mut injected = PageAgent::new(host.clone());

    assert!(resident.show_editor(None).expect("resident"));
    assert!(!injected.show_editor(None).expect("injected"));
    assert!(!injected.is_mounted());
    assert_eq!(host.count(OVERLAY_ELEMENT_ID), 1);
}

#[test]
fn close_from_the_session_frame_restores_the_page() {
    let host = SimHost::new(SIM_EXTENSION_ORIGIN).with_body_overflow("scroll");
    let mut agent = PageAgent::new(host.clone());
    agent.show_editor(None).expect("mount");
    let frame_window = host.frame().and_then(|node| node.window);

    assert!(agent.handle_window_message(frame_window, &close_signal()));
    assert_eq!(agent.state(), &PageAgentState::Unmounted);
    assert!(host.nodes().is_empty());
    assert_eq!(host.body_overflow().as_deref(), Some("scroll"));

    // A fresh session can be mounted afterwards.
    assert!(agent.show_editor(None).expect("remount"));
    let new_window = host.frame().and_then(|node| node.window);
    assert_ne!(new_window, frame_window);

    // The closed session's frame no longer speaks for the overlay.
    assert!(!agent.handle_window_message(frame_window, &close_signal()));
    assert!(agent.is_mounted());
    assert_eq!(host.count(OVERLAY_ELEMENT_ID), 1);
    assert_eq!(host.body_overflow().as_deref(), Some("hidden"));

    assert!(agent.handle_window_message(new_window, &close_signal()));
    assert_eq!(host.body_overflow().as_deref(), Some("scroll"));
}

#[test]
fn close_from_other_windows_or_other_messages_is_ignored() {
    let host = SimHost::new(SIM_EXTENSION_ORIGIN);
    let mut agent = PageAgent::new(host.clone());
    agent.show_editor(None).expect("mount");
    let frame_window = host.frame().and_then(|node| node.window);

    assert!(!agent.handle_window_message(Some(host.foreign_window()), &close_signal()));
    assert!(!agent.handle_window_message(None, &close_signal()));
    assert!(!agent.handle_window_message(frame_window, &json!({"type": "PING"})));
    assert!(agent.is_mounted());
    assert_eq!(host.count(OVERLAY_ELEMENT_ID), 1);
}

#[test]
fn close_while_unmounted_does_nothing() {
    let mut agent = agent();
    assert!(!agent.handle_window_message(Some(WindowId(101)), &close_signal()));
    assert_eq!(agent.host().body_overflow(), None);
}

#[test]
fn failed_mount_leaves_the_page_untouched() {
    let mut agent = PageAgent::new(SimHost::detached(SIM_EXTENSION_ORIGIN));
    let err = agent.show_editor(None).expect_err("no body");
    assert_eq!(err, HostError::NoBody);
    assert!(!agent.is_mounted());
    assert!(agent.host().nodes().is_empty());
    assert_eq!(agent.host().body_overflow(), None);
}
