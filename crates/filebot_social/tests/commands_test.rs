//! Tests for the file commands and router.

mod common;

use common::{Event, MockTransport};
use filebot_core::PHOTO_SIZE_THRESHOLD;
use filebot_social::{
    AccessPolicy, ChatAction, ChatTransport, CommandContext, CommandRouter, DispatchOutcome,
    FileCommands, IncomingCommand, InputFile, TextFormat, register_file_commands,
};
use filebot_storage::{MediaHandleStore, RemoteHandle, UploadMemoizer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const ADMIN: i64 = 1;
const STRANGER: i64 = 2;

struct Fixture {
    library: TempDir,
    router: CommandRouter,
    commands: Arc<FileCommands>,
}

fn fixture(files: &[(&str, usize, u8)]) -> Fixture {
    let library = TempDir::new().unwrap();
    for (name, size, fill) in files {
        std::fs::write(library.path().join(name), vec![*fill; *size]).unwrap();
    }
    std::fs::write(library.path().join("bot.log"), b"INFO started\n").unwrap();

    let memoizer = Arc::new(UploadMemoizer::new(MediaHandleStore::ephemeral()));
    let commands = Arc::new(
        FileCommands::new(
            library.path(),
            "https://files.example.org/pics",
            library.path().join("bot.log"),
            memoizer,
        )
        .with_rng(StdRng::seed_from_u64(3)),
    );

    let mut router = CommandRouter::new();
    register_file_commands(
        &mut router,
        Arc::clone(&commands),
        Arc::new(AccessPolicy::new([ADMIN])),
    );

    Fixture {
        library,
        router,
        commands,
    }
}

fn context(text: &str, user_id: i64, transport: &Arc<MockTransport>) -> CommandContext {
    let message = IncomingCommand::parse(text, 100, 200, user_id).unwrap();
    let transport: Arc<dyn ChatTransport> = Arc::clone(transport) as Arc<dyn ChatTransport>;
    CommandContext::new(message, transport)
}

#[tokio::test]
async fn test_photo_and_document_paths_are_cached() {
    let mb = 1024 * 1024;
    let fx = fixture(&[("alice_trip.jpg", 4 * mb, b'a'), ("bob_video.mp4", 8 * mb, b'b')]);
    let transport = Arc::new(MockTransport::new());

    let alice = context("/pic alice", ADMIN, &transport);
    let bob = context("/pic bob", ADMIN, &transport);

    assert_eq!(fx.router.dispatch(&alice).await, DispatchOutcome::Handled);
    assert_eq!(fx.router.dispatch(&bob).await, DispatchOutcome::Handled);
    assert_eq!(transport.photo_uploads(), 1);
    assert_eq!(transport.document_uploads(), 1);
    assert_eq!(fx.commands.memoizer().len().await, 2);

    fx.router.dispatch(&alice).await;
    fx.router.dispatch(&bob).await;
    assert_eq!(transport.photo_uploads(), 1);
    assert_eq!(transport.document_uploads(), 1);
    assert_eq!(transport.cached_sends(), 2);
    assert_eq!(fx.commands.memoizer().len().await, 2);

    let events = transport.events();
    assert!(events.contains(&Event::Action(ChatAction::UploadPhoto)));
    assert!(events.contains(&Event::Action(ChatAction::UploadDocument)));
    assert!(events.contains(&Event::Photo(
        InputFile::Handle(RemoteHandle::from("photo-0")),
        "[alice_trip.jpg](https://files.example.org/pics/alice_trip.jpg)".to_string()
    )));
}

#[tokio::test]
async fn test_threshold_is_inclusive_for_photos() {
    let fx = fixture(&[("exact_size.jpg", PHOTO_SIZE_THRESHOLD as usize, b'x')]);
    let transport = Arc::new(MockTransport::new());

    fx.router.dispatch(&context("/pic exact", ADMIN, &transport)).await;
    assert_eq!(transport.photo_uploads(), 1);
    assert_eq!(transport.document_uploads(), 0);
}

#[tokio::test]
async fn test_rejected_photo_falls_back_to_document() {
    let fx = fixture(&[("carol_pano.jpg", 1024, b'c')]);
    let transport = Arc::new(MockTransport::rejecting_photos());
    let ctx = context("/pic carol", ADMIN, &transport);

    assert_eq!(fx.router.dispatch(&ctx).await, DispatchOutcome::Handled);
    assert_eq!(transport.photo_uploads(), 0);
    assert_eq!(transport.document_uploads(), 1);
    assert_eq!(fx.commands.memoizer().len().await, 1);

    // The document handle is reused on the next request
    fx.router.dispatch(&ctx).await;
    assert_eq!(transport.document_uploads(), 1);
    assert_eq!(fx.commands.memoizer().len().await, 1);
}

#[tokio::test]
async fn test_getfile_always_sends_document() {
    let fx = fixture(&[("dave_small.png", 10, b'd')]);
    let transport = Arc::new(MockTransport::new());

    fx.router.dispatch(&context("/getfile dave", STRANGER, &transport)).await;
    assert_eq!(transport.photo_uploads(), 0);
    assert_eq!(transport.document_uploads(), 1);
}

#[tokio::test]
async fn test_no_match_replies_without_error() {
    let fx = fixture(&[("alice_trip.jpg", 10, b'a')]);
    let transport = Arc::new(MockTransport::new());

    let outcome = fx
        .router
        .dispatch(&context("/pic ZZZ-no-such-token", ADMIN, &transport))
        .await;

    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(
        transport.texts(),
        vec!["No files found for search term 'zzz-no-such-token'".to_string()]
    );
    assert_eq!(transport.photo_uploads() + transport.document_uploads(), 0);
}

#[tokio::test]
async fn test_missing_query_prompts_user() {
    let fx = fixture(&[]);
    let transport = Arc::new(MockTransport::new());

    fx.router.dispatch(&context("/pic", ADMIN, &transport)).await;
    fx.router.dispatch(&context("/search", ADMIN, &transport)).await;

    assert_eq!(
        transport.texts(),
        vec![
            "Please specify who to search for!".to_string(),
            "Please specify who to search for!".to_string()
        ]
    );
}

#[tokio::test]
async fn test_search_lists_sorted_links() {
    let fx = fixture(&[
        ("erin_b.jpg", 1, b'1'),
        ("erin_a.jpg", 1, b'2'),
        ("frank.jpg", 1, b'3'),
    ]);
    let transport = Arc::new(MockTransport::new());

    fx.router.dispatch(&context("/search Erin", STRANGER, &transport)).await;

    let events = transport.events();
    assert_eq!(events[0], Event::Action(ChatAction::Typing));
    assert_eq!(
        events[1],
        Event::Text(
            "Results for 'erin':\n\
             [erin_a.jpg](https://files.example.org/pics/erin_a.jpg)\n\
             [erin_b.jpg](https://files.example.org/pics/erin_b.jpg)\n"
                .to_string(),
            TextFormat::Markdown
        )
    );
}

#[tokio::test]
async fn test_restricted_commands_refuse_strangers() {
    let fx = fixture(&[("alice_trip.jpg", 10, b'a')]);
    let transport = Arc::new(MockTransport::new());

    let stats = fx.router.dispatch(&context("/stats", STRANGER, &transport)).await;
    let log = fx.router.dispatch(&context("/log", STRANGER, &transport)).await;

    // A refusal is a normal reply, not a command failure
    assert_eq!(stats, DispatchOutcome::Handled);
    assert_eq!(log, DispatchOutcome::Handled);

    assert_eq!(
        transport.texts(),
        vec![
            "You are not allowed to use this command.".to_string(),
            "You are not allowed to use this command.".to_string()
        ]
    );
    assert_eq!(transport.document_uploads(), 0);
}

#[tokio::test]
async fn test_admin_gets_stats_and_log() {
    let fx = fixture(&[("alice_trip.jpg", 10, b'a'), ("alice_beach.jpg", 10, b'b')]);
    let transport = Arc::new(MockTransport::new());

    fx.router.dispatch(&context("/stats", ADMIN, &transport)).await;
    fx.router.dispatch(&context("/log", ADMIN, &transport)).await;
    fx.router.dispatch(&context("/log", ADMIN, &transport)).await;

    let texts = transport.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("1. alice: 2"));

    // The log is re-uploaded every time, never cached
    assert_eq!(transport.document_uploads(), 2);
    let log = fx.library.path().join("bot.log");
    assert!(
        transport
            .events()
            .contains(&Event::Document(InputFile::Path(PathBuf::from(&log)), String::new()))
    );
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let fx = fixture(&[]);
    let transport = Arc::new(MockTransport::new());

    let outcome = fx.router.dispatch(&context("/dance", ADMIN, &transport)).await;
    assert_eq!(outcome, DispatchOutcome::Unknown);
    assert!(transport.events().is_empty());
    assert!(fx.router.supports("PIC"));
    assert_eq!(
        fx.router.commands(),
        vec!["getfile", "log", "pic", "search", "stats"]
    );
}

#[tokio::test]
async fn test_failed_command_is_reported_not_propagated() {
    let fx = fixture(&[]);
    let transport = Arc::new(MockTransport::failing_text());

    // Replying to the empty query fails; dispatch still returns normally
    let outcome = fx.router.dispatch(&context("/search", ADMIN, &transport)).await;
    assert_eq!(outcome, DispatchOutcome::Failed);
}

#[tokio::test]
async fn test_missing_library_is_reported() {
    let fx = fixture(&[]);
    let transport = Arc::new(MockTransport::new());
    let root = fx.library.path().to_path_buf();
    drop(fx.router);
    drop(fx.library);

    let mut router = CommandRouter::new();
    register_file_commands(&mut router, fx.commands, Arc::new(AccessPolicy::default()));
    assert!(!root.exists());

    let outcome = router.dispatch(&context("/pic alice", ADMIN, &transport)).await;
    assert_eq!(outcome, DispatchOutcome::Failed);
    assert_eq!(
        transport.texts(),
        vec!["Sorry, something went wrong while running /pic.".to_string()]
    );
}

#[tokio::test]
async fn test_store_write_failure_does_not_fail_sent_file() {
    let workdir = TempDir::new().unwrap();
    let library = workdir.path().join("pics");
    std::fs::create_dir(&library).unwrap();
    std::fs::write(library.join("judy_party.jpg"), b"judy").unwrap();

    let cache_dir = workdir.path().join("cache");
    let store = MediaHandleStore::load(cache_dir.join("ids.json")).await.unwrap();
    // Blocks creation of the cache directory on flush
    std::fs::write(&cache_dir, b"").unwrap();

    let commands = Arc::new(FileCommands::new(
        &library,
        "https://files.example.org/pics",
        workdir.path().join("bot.log"),
        Arc::new(UploadMemoizer::new(store)),
    ));
    let mut router = CommandRouter::new();
    register_file_commands(&mut router, Arc::clone(&commands), Arc::new(AccessPolicy::default()));
    let transport = Arc::new(MockTransport::new());

    let outcome = router.dispatch(&context("/pic judy", ADMIN, &transport)).await;

    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(transport.photo_uploads(), 1);
    assert!(transport.texts().is_empty());
    assert_eq!(commands.memoizer().len().await, 1);
}
