//! In-memory assignment engine.
//!
//! A process-local stand-in for the story service: it follows the
//! assignment contract closely enough to play offline and to exercise the
//! client end to end, without any persistence.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fable_core::config::GameSettings;
use fable_core::story::{AssignmentEngine, LineAssignment, StoryId};
use fable_core::user::User;
use fable_core::{FableError, Result};

/// Opening lines used to seed an empty engine.
pub const OPENING_LINES: &[&str] = &[
    "I write this sitting in the kitchen sink.",
    "'Twas a dark and stormy night.",
    "In my younger and more vulnerable years my father gave me some advice that I've been turning over in my mind ever since.",
    "I am an invisible man.",
];

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone)]
struct StoryLine {
    text: String,
    author: Option<String>,
}

#[derive(Debug, Clone)]
struct StoryLock {
    holder: String,
    locked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoryRecord {
    max_lines: u32,
    lines: Vec<StoryLine>,
    lock: Option<StoryLock>,
}

impl StoryRecord {
    fn in_progress(&self) -> bool {
        (self.lines.len() as u32) < self.max_lines
    }

    fn has_contribution_from(&self, username: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.author.as_deref() == Some(username))
    }

    fn is_locked_by(&self, username: &str) -> bool {
        self.lock
            .as_ref()
            .is_some_and(|lock| lock.holder == username)
    }
}

#[derive(Debug, Default)]
struct EngineState {
    users: BTreeMap<String, User>,
    stories: BTreeMap<StoryId, StoryRecord>,
    next_id: i64,
}

impl EngineState {
    fn insert_story(&mut self, record: StoryRecord) -> StoryId {
        self.next_id += 1;
        let id = StoryId(self.next_id);
        self.stories.insert(id, record);
        id
    }

    fn author_profile(&self, author: &Option<String>) -> Option<User> {
        author.as_ref().map(|name| {
            self.users
                .get(name)
                .cloned()
                .unwrap_or_else(|| User::named(name.clone()))
        })
    }
}

/// Story assignment and locking held in memory.
///
/// Selection picks the lowest eligible story id, which keeps behavior
/// deterministic.
pub struct InMemoryAssignmentEngine {
    state: Mutex<EngineState>,
    default_max_lines: u32,
    lock_sunset: Duration,
    clock: Clock,
}

impl InMemoryAssignmentEngine {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            default_max_lines: settings.default_max_lines.max(1),
            lock_sunset: Duration::seconds(settings.lock_sunset_secs as i64),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the time source used for lock timestamps.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Adds one unlocked, author-less story per opening line.
    pub fn with_opening_lines(self, lines: &[&str]) -> Self {
        {
            let mut state = self.lock_state();
            for line in lines {
                let record = StoryRecord {
                    max_lines: self.default_max_lines,
                    lines: vec![StoryLine {
                        text: (*line).to_string(),
                        author: None,
                    }],
                    lock: None,
                };
                state.insert_story(record);
            }
        }
        self
    }

    pub fn register_user(&self, user: User) -> Result<()> {
        let mut state = self.lock_state();
        if state.users.contains_key(&user.username) {
            return Err(FableError::conflict(format!(
                "The user @{} already exists.",
                user.username
            )));
        }
        tracing::info!("Registered @{}", user.username);
        state.users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Creates a story and returns its id.
    pub fn create_story(&self, max_lines: u32, first_line: &str, author: Option<&str>) -> StoryId {
        let record = StoryRecord {
            max_lines: max_lines.max(1),
            lines: vec![StoryLine {
                text: first_line.to_string(),
                author: author.map(str::to_string),
            }],
            lock: None,
        };
        self.lock_state().insert_story(record)
    }

    pub fn story_lines(&self, story_id: StoryId) -> Option<Vec<String>> {
        self.lock_state()
            .stories
            .get(&story_id)
            .map(|story| story.lines.iter().map(|line| line.text.clone()).collect())
    }

    pub fn lock_holder(&self, story_id: StoryId) -> Option<String> {
        self.lock_state()
            .stories
            .get(&story_id)
            .and_then(|story| story.lock.as_ref().map(|lock| lock.holder.clone()))
    }

    pub fn story_ids(&self) -> Vec<StoryId> {
        self.lock_state().stories.keys().copied().collect()
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        // State stays consistent between statements, so a poisoned guard is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryAssignmentEngine {
    fn default() -> Self {
        Self::new(&GameSettings::default())
    }
}

#[async_trait]
impl AssignmentEngine for InMemoryAssignmentEngine {
    async fn verify_username(&self, username: &str) -> Result<User> {
        if username.is_empty() {
            return Err(FableError::validation("Please enter your username."));
        }
        self.lock_state()
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| FableError::not_found("user", username))
    }

    async fn assign(
        &self,
        username: &str,
        story_id: Option<StoryId>,
        history: &[StoryId],
    ) -> Result<LineAssignment> {
        let now = (self.clock)();
        let mut state = self.lock_state();

        // Whatever this user held is given up: a new acquisition means the
        // previous line was written or abandoned.
        for (id, story) in state.stories.iter_mut() {
            let Some(lock) = &story.lock else { continue };
            if lock.holder == username {
                tracing::debug!("Unlocking story {} held by @{}", id, username);
                story.lock = None;
            } else if now - lock.locked_at > self.lock_sunset {
                tracing::debug!("Lock on story {} by @{} went stale", id, lock.holder);
                story.lock = None;
            }
        }

        let candidate = state
            .stories
            .iter()
            .find(|(id, story)| {
                story.in_progress()
                    && story.lock.is_none()
                    && !story.has_contribution_from(username)
                    && !history.contains(*id)
            })
            .map(|(id, _)| *id);

        let Some(id) = candidate else {
            tracing::info!(
                "No story for @{} (held {:?}, visited {}); starting fresh",
                username,
                story_id,
                history.len()
            );
            return Ok(LineAssignment::fresh_story());
        };

        let (prev, line_count, max_lines) = {
            let story = state
                .stories
                .get_mut(&id)
                .ok_or_else(|| FableError::internal("selected story vanished"))?;
            story.lock = Some(StoryLock {
                holder: username.to_string(),
                locked_at: now,
            });
            let prev = story
                .lines
                .last()
                .cloned()
                .ok_or_else(|| FableError::internal(format!("story {id} has no lines")))?;
            (prev, story.lines.len() as u32, story.max_lines)
        };
        let prev_author = state.author_profile(&prev.author);

        tracing::info!("Story {} locked to @{}", id, username);
        Ok(LineAssignment::continuation(
            id,
            prev.text,
            prev_author,
            line_count + 1,
            max_lines,
        ))
    }

    async fn append_line(
        &self,
        username: &str,
        story_id: Option<StoryId>,
        line: &str,
    ) -> Result<()> {
        if line.trim().is_empty() {
            return Err(FableError::validation("A line can't be empty."));
        }

        let Some(id) = story_id else {
            let id = self.create_story(self.default_max_lines, line, Some(username));
            tracing::info!("@{} started story {}", username, id);
            return Ok(());
        };

        let mut state = self.lock_state();
        let story = state
            .stories
            .get_mut(&id)
            .ok_or_else(|| FableError::not_found("story", id.to_string()))?;

        if !story.is_locked_by(username) {
            return Err(FableError::lock("Can't write to a story you haven't locked."));
        }
        if !story.in_progress() {
            story.lock = None;
            return Err(FableError::validation("This story is already finished."));
        }

        story.lines.push(StoryLine {
            text: line.to_string(),
            author: Some(username.to_string()),
        });
        story.lock = None;
        tracing::info!(
            "@{} wrote line {} of {} in story {}",
            username,
            story.lines.len(),
            story.max_lines,
            id
        );
        Ok(())
    }

    async fn release(&self, username: &str, story_id: Option<StoryId>) -> Result<()> {
        let Some(id) = story_id else {
            return Ok(());
        };

        let mut state = self.lock_state();
        let Some(story) = state.stories.get_mut(&id) else {
            return Ok(());
        };

        let held_by_caller = match &story.lock {
            None => return Ok(()),
            Some(lock) => lock.holder == username,
        };
        if !held_by_caller {
            return Err(FableError::lock("Can't unlock a story that you didn't lock."));
        }

        story.lock = None;
        tracing::info!("@{} released story {}", username, id);
        Ok(())
    }
}
