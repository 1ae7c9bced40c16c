// UI layer: the interactive command loop. Prompts use `dialoguer`, the
// fetch shows an `indicatif` spinner, `crossterm` clears the screen between
// steps and `rfd` opens the native folder picker when saving.

use crate::api::RecordSource;
use crate::config::{validate_email, Config, Profile};
use crate::pmid::PmidInput;
use crate::session::Session;
use crate::sheet::{validate_sheet_name, ArticleSheet};
use anyhow::{anyhow, Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const HELP_MESSAGE: &str = "Commands:\n\
    add  - adds studies to sheet\n\
    save - saves sheet\n\
    help - displays this message\n\
    exit - exits program";

const INVALID_COMMAND: &str = "Invalid command, try again (type 'help' for list of commands)";
const NOT_SAVED: &str = "Error ... Sheet not saved";

pub fn welcome_message() -> String {
    format!(
        "Welcome to the PubMed Spreadsheet Generator v{}\n\n\
         Look up articles by PMID and collect them in an .xlsx sheet.\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// A line typed at the main prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Save,
    Help,
    Exit,
    Unknown(String),
}

impl Command {
    /// Commands are matched after trimming, ignoring case.
    pub fn parse(input: &str) -> Self {
        let cmd = input.trim().to_lowercase();
        match cmd.as_str() {
            "add" => Command::Add,
            "save" => Command::Save,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => Command::Unknown(cmd),
        }
    }
}

/// Terminal clearing, disabled with `--no-clear`.
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    enabled: bool,
}

impl Screen {
    pub fn new(enabled: bool) -> Self {
        Screen { enabled }
    }

    pub fn clear(&self) -> Result<()> {
        if self.enabled {
            execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
                .context("Failed to clear the terminal")?;
        }
        Ok(())
    }
}

/// Ask for a value, then ask the user to confirm it; repeat until they do.
fn confirm_enter_string(
    screen: &Screen,
    prompt: &str,
    validate: fn(&str) -> Result<(), String>,
) -> Result<String> {
    loop {
        let entry: String = Input::new()
            .with_prompt(prompt)
            .validate_with(|input: &String| validate(input.trim()))
            .interact_text()?;
        let entry = entry.trim().to_string();
        let confirmed = Confirm::new()
            .with_prompt(format!("Is '{entry}' your desired entry?"))
            .default(true)
            .interact()?;
        screen.clear()?;
        if confirmed {
            return Ok(entry);
        }
    }
}

/// Contact email for Entrez: flag/env first, then the saved profile, then
/// a prompt. A newly typed address is remembered for next time.
pub fn resolve_email(config: &Config, screen: &Screen) -> Result<String> {
    if let Some(email) = &config.email {
        validate_email(email).map_err(|reason| anyhow!("Invalid email '{email}': {reason}"))?;
        return Ok(email.trim().to_string());
    }

    let profile = Profile::load(&config.profile_path).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable profile");
        Profile::default()
    });
    if let Some(saved) = profile.email.as_deref() {
        let reuse = Confirm::new()
            .with_prompt(format!("Use saved email address {saved}?"))
            .default(true)
            .interact()?;
        screen.clear()?;
        if reuse {
            return Ok(saved.to_string());
        }
    }

    let email = confirm_enter_string(
        screen,
        "Enter your email address (in case of PubMed inquiry)",
        |input| validate_email(input).map_err(str::to_string),
    )?;
    let updated = Profile {
        email: Some(email.clone()),
    };
    if let Err(e) = updated.save(&config.profile_path) {
        warn!(error = %e, "could not remember email address");
    }
    Ok(email)
}

/// Sheet from `--sheet-name`, or a prompted and confirmed name.
pub fn prompt_sheet(config: &Config, screen: &Screen) -> Result<ArticleSheet> {
    if let Some(name) = &config.sheet_name {
        return ArticleSheet::new(name.as_str()).context("Invalid --sheet-name");
    }
    let name = confirm_enter_string(
        screen,
        "What would you like to name the spreadsheet?",
        |input| validate_sheet_name(input).map_err(|e| e.to_string()),
    )?;
    Ok(ArticleSheet::new(name)?)
}

/// Main command loop. Returns when the user confirms `exit`.
pub fn main_menu<S: RecordSource>(
    mut session: Session<S>,
    config: &Config,
    screen: &Screen,
) -> Result<()> {
    println!("{HELP_MESSAGE}");
    loop {
        println!("\nSheet name: {}\n", session.sheet_name());
        let input: String = Input::new()
            .with_prompt("What would you like to do? (type 'help' for list of commands)")
            .interact_text()?;
        screen.clear()?;

        match Command::parse(&input) {
            Command::Add => add_articles(&mut session, screen)?,
            Command::Save => save_sheet(&mut session, config),
            Command::Help => println!("{HELP_MESSAGE}"),
            Command::Exit => {
                if confirm_exit(&session)? {
                    break;
                }
                screen.clear()?;
            }
            Command::Unknown(cmd) => {
                debug!(command = %cmd, "unknown command");
                println!("\n{INVALID_COMMAND}");
            }
        }
    }

    info!(articles = session.article_count(), "exiting");
    println!(
        "\nTotal articles in sheet: {}\nExiting ...",
        session.article_count()
    );
    Ok(())
}

/// Look up PMIDs one after another until the user types `done`.
fn add_articles<S: RecordSource>(session: &mut Session<S>, screen: &Screen) -> Result<()> {
    loop {
        screen.clear()?;
        println!("\nNumber of articles in sheet: {}", session.article_count());

        let pmid = match prompt_pmid()? {
            PmidInput::Done => break,
            PmidInput::Id(pmid) => pmid,
        };

        let article = with_spinner(format!("Fetching PMID {pmid} ..."), || session.lookup(pmid))?;
        println!("\n{article}\n");

        let add = Confirm::new()
            .with_prompt("Is this the article you want to add?")
            .default(!article.has_errors())
            .interact()?;
        if add {
            let row = session.accept(article);
            debug!(row, "article accepted");
        }
    }
    screen.clear()?;
    Ok(())
}

fn prompt_pmid() -> Result<PmidInput> {
    let entry: String = Input::new()
        .with_prompt("Enter the next PMID to add or 'done' if finished adding")
        .validate_with(|input: &String| {
            PmidInput::parse(input)
                .map(|_| ())
                .map_err(|e| format!("Invalid PMID, try again ({e})"))
        })
        .interact_text()?;
    Ok(PmidInput::parse(&entry)?)
}

/// Run `work` while a spinner is shown.
fn with_spinner<T>(message: String, work: impl FnOnce() -> T) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = work();
    spinner.finish_and_clear();
    Ok(out)
}

/// Save failures are reported, never propagated: the session keeps going.
fn save_sheet<S: RecordSource>(session: &mut Session<S>, config: &Config) {
    println!("\nWhere do you want to save the sheet?");
    let dir = match &config.output_dir {
        Some(dir) => Some(dir.clone()),
        None => rfd::FileDialog::new()
            .set_title("Where do you want to save the sheet?")
            .pick_folder(),
    };
    let Some(dir) = dir else {
        warn!("save cancelled, no directory chosen");
        println!("\n{NOT_SAVED}");
        return;
    };

    match session.save_in(&dir) {
        Ok(path) => println!(
            "\nSheet successfully saved as '{}' in: '{}'",
            session.sheet().file_name(),
            path.parent().unwrap_or(dir.as_path()).display()
        ),
        Err(e) => {
            error!(error = %e, dir = %dir.display(), "save failed");
            println!("\n{NOT_SAVED} ({e})");
        }
    }
}

fn confirm_exit<S: RecordSource>(session: &Session<S>) -> Result<bool> {
    let prompt = match session.unsaved_count() {
        0 => "Is everything saved? Are you sure you want to exit?".to_string(),
        n => format!(
            "{n} article(s) added since the last save. \
             Is everything saved? Are you sure you want to exit?"
        ),
    };
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
