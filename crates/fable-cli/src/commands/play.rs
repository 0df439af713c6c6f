//! The write screen as a line-oriented REPL.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::time::Duration;

use anyhow::{Result, bail};
use colored::Colorize;
use fable_application::StoryWriteController;
use fable_core::session::{SessionPhase, WriteView};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::AppContext;

const NEW_STORY_COMMAND: &str = "/new";
const QUIT_COMMAND: &str = "/quit";
/// How long the process lingers at exit so the release can leave the socket.
const RELEASE_GRACE: Duration = Duration::from_millis(500);

/// Completes in-game commands and shows the write box placeholder as a hint.
struct PlayHelper {
    commands: Vec<&'static str>,
    placeholder: &'static str,
}

impl PlayHelper {
    fn new() -> Self {
        Self {
            commands: vec![NEW_STORY_COMMAND, QUIT_COMMAND],
            placeholder: "",
        }
    }
}

impl Helper for PlayHelper {}

impl Completer for PlayHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for PlayHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if line.is_empty() {
            return Some(self.placeholder.to_string());
        }

        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Highlighter for PlayHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for PlayHelper {}

pub async fn run(app: &AppContext) -> Result<()> {
    let Some(user) = app.authentication().current_user().await? else {
        bail!("Not logged in. Run `fable login <name>` first.");
    };
    app.admit(user.clone());

    let mut rl: Editor<PlayHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(PlayHelper::new()));

    println!("{}", "=== Fable ===".bright_magenta().bold());
    match &app.offline_engine {
        Some(_) => println!("{}", "Playing offline.".bright_black()),
        None => println!(
            "{}",
            format!("Connected to {}", app.config.server.base_url).bright_black()
        ),
    }
    println!(
        "{}",
        format!(
            "Hi {}! Type your line and press enter. {} gets a new story, {} leaves.",
            user.display_name(),
            NEW_STORY_COMMAND,
            QUIT_COMMAND
        )
        .bright_black()
    );
    println!();

    let mut controller = StoryWriteController::new(app.gateway.clone(), user);
    controller.initialize().await;
    render(&controller.view());

    let outcome = loop {
        let view = controller.view();
        if let Some(helper) = rl.helper_mut() {
            helper.placeholder = view.placeholder;
        }
        if view.focus_input {
            controller.consume_focus().await;
        }

        match rl.readline("✎ ") {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "" => continue,
                    QUIT_COMMAND => break Ok(()),
                    NEW_STORY_COMMAND => controller.new_story().await,
                    _ => {
                        let _ = rl.add_history_entry(trimmed);
                        controller.edit_line(trimmed).await;
                        controller.submit_line().await;
                    }
                }
                render(&controller.view());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    controller.release_on_unload().await;
    println!("{}", "Goodbye!".bright_green());
    if let Some(release) = controller.take_release_task()
        && tokio::time::timeout(RELEASE_GRACE, release).await.is_err()
    {
        tracing::debug!("Exiting before the release was acknowledged");
    }
    outcome?;
    Ok(())
}

fn render(view: &WriteView) {
    if let Some(banner) = &view.error_banner {
        println!("{}", banner.red());
    }

    match view.phase {
        SessionPhase::Loading => println!("{}", "Loading...".bright_black()),
        SessionPhase::ComposingNew => {
            println!("{}", "No story needs you right now. Start a new one!".bright_yellow());
        }
        SessionPhase::ComposingContinue | SessionPhase::Error => {
            if let Some(prompt) = &view.prompt {
                println!("{}", prompt.line.bright_blue());
                if let Some(attribution) = &prompt.attribution {
                    println!("  {}", attribution.bright_magenta());
                }
            }
        }
        SessionPhase::Idle | SessionPhase::Released => {}
    }

    if let Some(progress) = &view.progress {
        println!("{}", progress.bright_black());
    }
    if let Some(warning) = view.last_line_warning {
        println!("{}", warning.yellow().bold());
    }
    if !view.show_write_box && view.can_request_new_story {
        println!(
            "{}",
            format!("Type {NEW_STORY_COMMAND} to try again.").bright_black()
        );
    }
}
