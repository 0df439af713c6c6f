//! End-to-end sessions against the in-memory engine.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use fable_application::{AuthenticationService, StoryWriteController};
use fable_core::config::GameSettings;
use fable_core::session::SessionPhase;
use fable_core::story::StoryId;
use fable_core::user::User;
use fable_infrastructure::{EngineGateway, FileIdentityStore, InMemoryAssignmentEngine};
use tempfile::TempDir;

fn engine_with_players() -> Arc<InMemoryAssignmentEngine> {
    let engine = Arc::new(InMemoryAssignmentEngine::default());
    for name in ["alice", "bob", "carol"] {
        engine.register_user(User::named(name)).unwrap();
    }
    engine
}

fn controller(engine: &Arc<InMemoryAssignmentEngine>, name: &str) -> StoryWriteController {
    StoryWriteController::new(
        Arc::new(EngineGateway::new(engine.clone())),
        User::named(name),
    )
}

#[tokio::test]
async fn two_players_build_a_story() {
    let engine = engine_with_players();

    let mut alice = controller(&engine, "alice");
    alice.initialize().await;
    assert_eq!(alice.session().phase(), SessionPhase::ComposingNew);
    assert_eq!(alice.view().placeholder, "> Start a new story...");

    alice.edit_line("The fox ran.").await;
    alice.submit_line().await;
    let story = engine.story_ids()[0];
    // Alice wrote the only story, so she is asked to start another.
    assert!(alice.session().writing_new_story);

    let mut bob = controller(&engine, "bob");
    bob.initialize().await;
    let view = bob.view();
    assert_eq!(view.phase, SessionPhase::ComposingContinue);
    let prompt = view.prompt.unwrap();
    assert_eq!(prompt.line, "The fox ran.");
    assert_eq!(prompt.attribution.as_deref(), Some("@alice"));
    assert_eq!(view.progress.as_deref(), Some("Line 2 of 5"));
    assert_eq!(engine.lock_holder(story).as_deref(), Some("bob"));

    bob.edit_line("It jumped.").await;
    bob.submit_line().await;

    assert_eq!(
        engine.story_lines(story).unwrap(),
        vec!["The fox ran.".to_string(), "It jumped.".to_string()]
    );
    assert_eq!(engine.lock_holder(story), None);
    assert_eq!(bob.session().story_id_history, vec![story]);

    alice.release_on_unload().await;
    bob.release_on_unload().await;
}

#[tokio::test]
async fn manual_restarts_walk_history_without_duplicates() {
    let engine = engine_with_players();
    let ids: Vec<StoryId> = ["one", "two", "three"]
        .into_iter()
        .map(|line| engine.create_story(5, line, Some("carol")))
        .collect();

    let mut bob = controller(&engine, "bob");
    bob.initialize().await;
    bob.new_story().await;
    bob.new_story().await;
    assert_eq!(bob.session().story_id, Some(ids[2]));

    bob.new_story().await;
    let session = bob.session();
    assert!(session.writing_new_story);
    assert_eq!(session.story_id_history, ids);
    // Restarting released every earlier lock.
    assert!(ids.iter().all(|id| engine.lock_holder(*id).is_none()));
}

#[tokio::test]
async fn last_line_is_flagged() {
    let engine = engine_with_players();
    let story = engine.create_story(2, "Once.", Some("carol"));

    let mut bob = controller(&engine, "bob");
    bob.initialize().await;

    let view = bob.view();
    assert_eq!(bob.session().story_id, Some(story));
    assert_eq!(view.progress.as_deref(), Some("Line 2 of 2"));
    assert_eq!(view.last_line_warning, Some("This is the last line!"));
}

#[tokio::test]
async fn unload_releases_the_lock_once() {
    let engine = engine_with_players();
    let story = engine.create_story(5, "Once.", Some("carol"));

    let mut bob = controller(&engine, "bob");
    bob.initialize().await;
    assert_eq!(engine.lock_holder(story).as_deref(), Some("bob"));

    bob.release_on_unload().await;
    bob.take_release_task().unwrap().await.unwrap();
    assert_eq!(engine.lock_holder(story), None);
    assert_eq!(bob.session().phase(), SessionPhase::Released);

    // Late input after unload changes nothing and sends nothing.
    bob.new_story().await;
    assert_eq!(engine.lock_holder(story), None);
    assert_eq!(bob.session().story_id, Some(story));
}

#[tokio::test]
async fn lost_lock_surfaces_as_inline_error() {
    let now = Arc::new(Mutex::new(Utc::now()));
    let clock = now.clone();
    let engine = Arc::new(
        InMemoryAssignmentEngine::new(&GameSettings::default())
            .with_clock(move || *clock.lock().unwrap()),
    );
    let story = engine.create_story(5, "Once.", Some("alice"));

    let mut bob = controller(&engine, "bob");
    bob.initialize().await;
    bob.edit_line("Twice.").await;

    *now.lock().unwrap() += Duration::seconds(181);
    let mut carol = controller(&engine, "carol");
    carol.initialize().await;
    assert_eq!(engine.lock_holder(story).as_deref(), Some("carol"));

    bob.submit_line().await;

    let view = bob.view();
    assert_eq!(view.phase, SessionPhase::Error);
    assert_eq!(
        view.error_banner.as_deref(),
        Some("Something went wrong: Can't write to a story you haven't locked.")
    );
    assert_eq!(view.draft, "Twice.");
    assert!(view.can_submit);
    assert_eq!(engine.story_lines(story).unwrap().len(), 1);
}

#[tokio::test]
async fn remembered_user_starts_a_session() {
    let dir = TempDir::new().unwrap();
    let engine = engine_with_players();
    let gateway = Arc::new(EngineGateway::new(engine.clone()));
    let identity = Arc::new(FileIdentityStore::with_path(dir.path().join("identity.toml")));

    AuthenticationService::new(gateway.clone(), identity.clone())
        .authenticate("@alice")
        .await
        .unwrap();

    let auth = AuthenticationService::new(gateway.clone(), identity);
    let user = auth.current_user().await.unwrap().unwrap();
    let mut session = StoryWriteController::new(gateway, user);
    session.initialize().await;
    assert_eq!(session.session().user.username, "alice");
    assert!(session.session().writing_new_story);
}
