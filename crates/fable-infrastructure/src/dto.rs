//! Wire shapes of the story service replies.
//!
//! Every awaited endpoint answers `200` with either its data or
//! `{ "error": "..." }`. [`decode_reply`] turns that into a `Result` so the
//! rest of the client never sees the raw shape.

use fable_core::story::{LineAssignment, StoryId};
use fable_core::user::User;
use fable_core::{FableError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Splits a reply body into data or the server's error message.
///
/// An `error` field wins even when story fields are present alongside it.
pub fn decode_reply<T: DeserializeOwned>(body: Value) -> Result<T> {
    if let Some(error) = body.get("error").filter(|value| !value.is_null()) {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Err(FableError::remote(message));
    }

    serde_json::from_value(body).map_err(|e| FableError::protocol(format!("unexpected reply: {e}")))
}

/// `POST /api/verify_username` success body.
#[derive(Debug, Deserialize)]
pub struct VerifyUsernameReply {
    pub user: User,
}

/// `POST /api/submit_line` success body; contents are ignored.
#[derive(Debug, Deserialize)]
pub struct SubmitLineReply {}

/// `prevAuthor` arrives as a full profile or as a bare username.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AuthorDto {
    Profile(User),
    Name(String),
}

impl From<AuthorDto> for User {
    fn from(dto: AuthorDto) -> Self {
        match dto {
            AuthorDto::Profile(user) => user,
            AuthorDto::Name(username) => User::named(username),
        }
    }
}

/// `POST /api/get_line` success body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLineReply {
    #[serde(default)]
    pub story_id: Option<StoryId>,
    #[serde(default)]
    pub prev_line: Option<String>,
    #[serde(default)]
    pub prev_author: Option<AuthorDto>,
    #[serde(default)]
    pub writing_new_story: Option<bool>,
    #[serde(default)]
    pub curr_index: Option<u32>,
    #[serde(default)]
    pub max_lines: Option<u32>,
}

impl TryFrom<GetLineReply> for LineAssignment {
    type Error = FableError;

    fn try_from(reply: GetLineReply) -> Result<Self> {
        LineAssignment {
            story_id: reply.story_id,
            prev_line: reply.prev_line,
            prev_author: reply.prev_author.map(User::from),
            writing_new_story: reply.writing_new_story.unwrap_or(false),
            curr_index: reply.curr_index,
            max_lines: reply.max_lines,
        }
        .validate()
    }
}
