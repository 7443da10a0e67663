//! Integration tests for the assistant crate
//!
//! These tests exercise the complete flow from loading workspace data
//! to deriving the navigation tree and running chat sends, without a
//! live backend: the storage, query, and chat state machines are all
//! testable in isolation.

use std::sync::Arc;

use assistant::api::types::SendMessageResponse;
use assistant::models::{Document, Folder, FolderId, Message, MessageId, Session, SessionId};
use assistant::storage::{InMemoryWorkspaceStore, WorkspaceStore};
use assistant::{
    ApiClient, AuthManager, ChatController, Error, WorkspaceHandler, build_navigation_tree,
    navigation_tree,
};
use chrono::{Duration, Utc};
use tempfile::TempDir;

/// Serve exactly one HTTP request with a canned status, for driving
/// the client's error mapping over a real socket
fn serve_once(status_line: &'static str) -> String {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the full request (headers plus declared body) so
            // the client never sees a reset while still writing
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let header_end = request
                    .windows(4)
                    .position(|w| w == b"\r\n\r\n")
                    .map(|p| p + 4);
                if let Some(end) = header_end {
                    let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let body_len = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + body_len {
                        break;
                    }
                }
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}", addr)
}

/// Helper to create test folders
fn make_folder(id: &str, name: &str, age_hours: i64) -> Folder {
    Folder::new(id, name, Utc::now() - Duration::hours(age_hours))
}

/// Helper to create test sessions
fn make_session(id: &str, name: &str, folder: Option<&str>, age_hours: i64) -> Session {
    Session::new(
        id,
        name,
        folder.map(FolderId::new),
        Utc::now() - Duration::hours(age_hours),
    )
}

/// Helper to create test documents
fn make_document(id: &str, name: &str, age_hours: i64) -> Document {
    Document::new(
        id,
        name,
        1024,
        Utc::now() - Duration::hours(age_hours),
        format!("/media/{}", id),
    )
}

fn make_message(id: &str, session: &str, content: &str, is_user: bool) -> Message {
    Message {
        id: MessageId::new(id),
        content: content.to_string(),
        is_user,
        created_at: Utc::now(),
        session_id: SessionId::new(session),
    }
}

fn make_chat() -> (ChatController, Arc<InMemoryWorkspaceStore>) {
    let api = Arc::new(ApiClient::new("http://localhost:8000").unwrap());
    let store = Arc::new(InMemoryWorkspaceStore::new());
    let chat = ChatController::new(api, store.clone());
    (chat, store)
}

#[test]
fn test_workspace_load_to_tree() {
    let store = InMemoryWorkspaceStore::new();

    // Simulate a fresh workspace load from the backend
    store
        .replace_folders(vec![
            make_folder("f1", "Biology", 5),
            make_folder("f2", "History", 4),
        ])
        .unwrap();
    store
        .replace_sessions(vec![
            make_session("s1", "Photosynthesis", Some("f1"), 3),
            make_session("s2", "Scratch pad", None, 2),
            make_session("s3", "Cold War", Some("f2"), 1),
        ])
        .unwrap();
    store
        .replace_documents(vec![make_document("d1", "notes.pdf", 1)])
        .unwrap();

    let tree = navigation_tree(&store).unwrap();
    assert_eq!(tree.folders.len(), 2);
    assert_eq!(tree.folders[0].folder.name, "Biology");
    assert_eq!(tree.folders[0].sessions.len(), 1);
    assert_eq!(tree.folders[1].sessions.len(), 1);
    assert_eq!(tree.ungrouped.len(), 1);
    assert_eq!(tree.ungrouped[0].id, SessionId::new("s2"));
    assert_eq!(tree.documents.len(), 1);
    assert_eq!(tree.session_count(), 3);
}

#[test]
fn test_reload_replaces_stale_data() {
    let store = InMemoryWorkspaceStore::new();

    store
        .replace_sessions(vec![make_session("s1", "Old", None, 2)])
        .unwrap();

    // A later load no longer contains s1
    store
        .replace_sessions(vec![make_session("s2", "New", None, 1)])
        .unwrap();

    let sessions = store.list_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, SessionId::new("s2"));
}

#[test]
fn test_folder_deletion_leaves_sessions_ungrouped() {
    let store = InMemoryWorkspaceStore::new();

    store.upsert_folder(make_folder("f1", "Biology", 2)).unwrap();
    store
        .upsert_session(make_session("s1", "Mitosis", Some("f1"), 1))
        .unwrap();

    store.remove_folder(&FolderId::new("f1")).unwrap();

    // The session keeps its dangling reference and is shown ungrouped
    let tree = navigation_tree(&store).unwrap();
    assert!(tree.folders.is_empty());
    assert_eq!(tree.ungrouped.len(), 1);
    assert_eq!(tree.session_count(), 1);
}

#[test]
fn test_full_send_flow_updates_tree_metadata() {
    let (mut chat, store) = make_chat();

    store
        .upsert_session(make_session("s1", "Photosynthesis", None, 1))
        .unwrap();
    chat.activate(make_session("s1", "Photosynthesis", None, 1), vec![]);

    let pending = chat.begin_send("What is chlorophyll?").unwrap();
    assert!(chat.is_sending());
    assert!(chat.messages()[0].id.is_temporary());

    let response = SendMessageResponse {
        user_message: make_message("m1", "s1", "What is chlorophyll?", true),
        ai_message: make_message("m2", "s1", "A green pigment.", false),
    };
    chat.complete_send(pending, Ok(response)).unwrap();

    // Message list replaced the temporary entry with the confirmed pair
    let ids: Vec<_> = chat.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["m1", "m2"]);

    // Session metadata visible in the navigation tree
    let tree = navigation_tree(store.as_ref()).unwrap();
    let session = &tree.ungrouped[0];
    assert_eq!(session.last_message.as_deref(), Some("A green pigment."));
}

#[test]
fn test_failed_send_restores_previous_list() {
    let (mut chat, _store) = make_chat();

    let history = vec![make_message("m0", "s1", "earlier", true)];
    chat.activate(make_session("s1", "Chat", None, 1), history.clone());

    let pending = chat.begin_send("doomed").unwrap();
    let err = chat
        .complete_send(pending, Err(Error::Network("backend down".to_string())))
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));

    assert_eq!(chat.messages(), &history[..]);
    assert!(!chat.is_sending());
}

#[test]
fn test_session_switch_discards_inflight_response() {
    let (mut chat, store) = make_chat();
    store
        .upsert_session(make_session("s1", "First", None, 2))
        .unwrap();

    chat.activate(make_session("s1", "First", None, 2), vec![]);
    let pending = chat.begin_send("for the first session").unwrap();

    chat.activate(make_session("s2", "Second", None, 1), vec![]);

    let response = SendMessageResponse {
        user_message: make_message("m1", "s1", "for the first session", true),
        ai_message: make_message("m2", "s1", "late reply", false),
    };
    chat.complete_send(pending, Ok(response)).unwrap();

    // Nothing from s1 leaks into s2's message list
    assert!(chat.messages().is_empty());
    assert!(!chat.is_sending());
}

#[test]
fn test_export_transcript_round() {
    let (mut chat, _store) = make_chat();
    chat.activate(
        make_session("s1", "Cell biology", None, 1),
        vec![
            make_message("m1", "s1", "Define osmosis.", true),
            make_message("m2", "s1", "Diffusion of water.", false),
        ],
    );

    let transcript = chat.export_transcript().unwrap();
    assert!(transcript.starts_with("# Cell biology\n"));
    assert!(transcript.contains("## You\n\nDefine osmosis."));
    assert!(transcript.contains("## AI\n\nDiffusion of water."));
}

#[test]
fn test_auth_lifecycle_without_backend() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(ApiClient::new("http://localhost:8000").unwrap());
    let auth = AuthManager::with_token_path(api.clone(), dir.path().join("auth-token.json"));

    // Fresh start: no token file, resolves to unauthenticated
    assert!(!auth.resume());
    assert!(!auth.is_authenticated());

    // Validation failures never hit the network and land in the slot
    auth.login("not-an-email", "secret123").unwrap_err();
    assert!(auth.last_error().is_some());
    assert!(!auth.is_authenticated());

    // Logout from the unauthenticated state is a no-op that succeeds
    auth.logout().unwrap();
    assert!(auth.last_error().is_none());
    assert!(!api.has_token());
}

#[test]
fn test_workspace_401_downgrades_the_session() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let dir = TempDir::new().unwrap();
    let base = serve_once("401 Unauthorized");
    let api = Arc::new(ApiClient::new(&base).unwrap());
    let auth = AuthManager::with_token_path(api.clone(), dir.path().join("auth-token.json"));
    let store = Arc::new(InMemoryWorkspaceStore::new());
    let handler = WorkspaceHandler::new(api.clone(), store.clone());

    api.set_token("stale");
    store
        .upsert_session(make_session("s1", "Chat", None, 1))
        .unwrap();

    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    api.on_unauthorized(move || flag.store(true, Ordering::SeqCst));

    // A 401 from a workspace mutation, not an auth operation, must
    // still end the session globally
    let err = handler.create_folder("Biology").unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert!(!api.has_token());
    assert!(fired.load(Ordering::SeqCst));
    assert!(!auth.is_authenticated());
    assert!(!dir.path().join("auth-token.json").exists());
}

#[test]
fn test_logout_teardown_clears_store_and_chat() {
    let (mut chat, store) = make_chat();

    store.upsert_folder(make_folder("f1", "Biology", 1)).unwrap();
    store
        .upsert_session(make_session("s1", "Chat", Some("f1"), 1))
        .unwrap();
    chat.activate(
        make_session("s1", "Chat", Some("f1"), 1),
        vec![make_message("m1", "s1", "hello", true)],
    );

    store.clear().unwrap();
    chat.reset();

    let tree = navigation_tree(store.as_ref()).unwrap();
    assert_eq!(tree.session_count(), 0);
    assert!(tree.folders.is_empty());
    assert!(chat.active_session().is_none());
    assert!(chat.messages().is_empty());
}

#[test]
fn test_tree_ordering_is_stable() {
    let folders = vec![make_folder("f1", "A", 3), make_folder("f2", "B", 2)];
    let sessions = vec![
        make_session("s1", "one", Some("f1"), 3),
        make_session("s2", "two", Some("f1"), 2),
        make_session("s3", "three", None, 1),
    ];

    let a = build_navigation_tree(&folders, &sessions, &[]);
    let b = build_navigation_tree(&folders, &sessions, &[]);

    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(a.folders[0].sessions.len(), 2);
    assert_eq!(a.folders[0].sessions[0].id, SessionId::new("s1"));
}
