//! Driver commands typed on stdin
//!
//! Lines starting with `:` are commands; everything else is sent to the
//! active tab. `::text` sends `:text` literally.

use sugar_term_config::{Color, Theme, ThemeKind};
use thiserror::Error;

/// One parsed driver line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewTab,
    /// Close a tab by 1-based number, or the active one
    CloseTab(Option<usize>),
    NextTab,
    PrevTab,
    /// Switch to a tab by 1-based number
    SwitchTab(usize),
    ZoomIn,
    ZoomOut,
    ZoomReset,
    SetTheme(Theme),
    Save,
    Load,
    /// List links found in the active tab
    Links,
    /// Open a link from the last listing, 1-based
    OpenLink(usize),
    ListTabs,
    Help,
    Quit,
    /// Text for the active tab's shell (newline not included)
    Input(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command ':{0}' (try :help)")]
    UnknownCommand(String),

    #[error(":{command} needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("invalid argument '{value}' for :{command}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Summary printed by `:help`
pub const HELP: &str = "\
:new                 open a tab
:close [n]           close tab n (default: active)
:next / :prev        cycle tabs
:tab n               switch to tab n
:zoom+ :zoom- :zoom0 change the active tab's font size
:theme light|dark    switch theme
:theme custom #FG #BG
:save / :load        write or re-read the session file
:links / :open n     list links in the active tab, open one
:tabs                list tabs
:quit                save and exit
::text               send ':text' to the shell";

/// Parse one line read from stdin
pub fn parse_line(line: &str) -> Result<Command, InputError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(literal) = line.strip_prefix("::") {
        return Ok(Command::Input(format!(":{}", literal)));
    }
    let Some(command_line) = line.strip_prefix(':') else {
        return Ok(Command::Input(line.to_string()));
    };

    let mut words = command_line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match name {
        "new" => Ok(Command::NewTab),
        "close" => match args.first() {
            Some(arg) => Ok(Command::CloseTab(Some(parse_number("close", arg)?))),
            None => Ok(Command::CloseTab(None)),
        },
        "next" => Ok(Command::NextTab),
        "prev" => Ok(Command::PrevTab),
        "tab" => {
            let arg = args.first().ok_or(InputError::MissingArgument {
                command: "tab",
                what: "a tab number",
            })?;
            Ok(Command::SwitchTab(parse_number("tab", arg)?))
        }
        "zoom+" => Ok(Command::ZoomIn),
        "zoom-" => Ok(Command::ZoomOut),
        "zoom0" => Ok(Command::ZoomReset),
        "theme" => parse_theme(&args).map(Command::SetTheme),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        "links" => Ok(Command::Links),
        "open" => {
            let arg = args.first().ok_or(InputError::MissingArgument {
                command: "open",
                what: "a link number",
            })?;
            Ok(Command::OpenLink(parse_number("open", arg)?))
        }
        "tabs" => Ok(Command::ListTabs),
        "help" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

/// 1-based number; zero is rejected
fn parse_number(command: &'static str, value: &str) -> Result<usize, InputError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(InputError::InvalidArgument {
            command,
            value: value.to_string(),
        }),
    }
}

fn parse_theme(args: &[&str]) -> Result<Theme, InputError> {
    let name = args.first().ok_or(InputError::MissingArgument {
        command: "theme",
        what: "light, dark or custom",
    })?;
    let kind = ThemeKind::parse(name).ok_or_else(|| InputError::InvalidArgument {
        command: "theme",
        value: name.to_string(),
    })?;

    match kind {
        ThemeKind::Custom => {
            let (Some(fg), Some(bg)) = (args.get(1), args.get(2)) else {
                return Err(InputError::MissingArgument {
                    command: "theme",
                    what: "foreground and background colours",
                });
            };
            let parse = |hex: &str| {
                Color::from_hex(hex).ok_or_else(|| InputError::InvalidArgument {
                    command: "theme",
                    value: hex.to_string(),
                })
            };
            Ok(Theme::custom(parse(*fg)?, parse(*bg)?))
        }
        kind => Ok(Theme::named(kind).unwrap_or_default()),
    }
}
