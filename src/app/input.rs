use crate::binding::EditInput;

/// One line of editor input.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    Click { x: f32, y: f32 },
    Select(String),
    Deselect,
    Set { index: usize, value: EditInput },
    TextureAdd { index: usize },
    TextureOn { index: usize, source: Option<String> },
    TextureOff { index: usize },
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command} needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("invalid {argument}: {value:?}")]
    InvalidArgument { argument: &'static str, value: String },
    #[error("{0} takes no further arguments")]
    TrailingArguments(&'static str),
}

pub const HELP: &str = "\
commands:
  click <x> <y>              pick the object under a screen position
  select <name> | deselect
  set <index> <value>        edit a property (true/false, number, #RRGGBB, path)
  texture-add <index>        bind the placeholder texture
  texture-on <index> [path]  enable a texture, optionally from a new path
  texture-off <index>
  show | help | quit";

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<EditorCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "click" => {
            let mut parts = rest.split_whitespace();
            let x = float_arg(parts.next(), "click", "x")?;
            let y = float_arg(parts.next(), "click", "y")?;
            if parts.next().is_some() {
                return Err(CommandError::TrailingArguments("click"));
            }
            EditorCommand::Click { x, y }
        }
        "select" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "select",
                    argument: "an object name",
                });
            }
            EditorCommand::Select(rest.to_string())
        }
        "set" => {
            let (index, value) = index_and_rest(rest, "set")?;
            if value.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "set",
                    argument: "a value",
                });
            }
            EditorCommand::Set {
                index,
                value: EditInput::parse(value),
            }
        }
        "texture-add" => EditorCommand::TextureAdd {
            index: only_index(rest, "texture-add")?,
        },
        "texture-on" => {
            let (index, source) = index_and_rest(rest, "texture-on")?;
            EditorCommand::TextureOn {
                index,
                source: (!source.is_empty()).then(|| source.to_string()),
            }
        }
        "texture-off" => EditorCommand::TextureOff {
            index: only_index(rest, "texture-off")?,
        },
        "deselect" => no_args(rest, "deselect", EditorCommand::Deselect)?,
        "show" => no_args(rest, "show", EditorCommand::Show)?,
        "help" => no_args(rest, "help", EditorCommand::Help)?,
        "quit" | "exit" => no_args(rest, "quit", EditorCommand::Quit)?,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn float_arg(
    value: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<f32, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument { command, argument })?;
    match value.parse::<f32>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(CommandError::InvalidArgument {
            argument,
            value: value.to_string(),
        }),
    }
}

fn index_and_rest<'a>(
    rest: &'a str,
    command: &'static str,
) -> Result<(usize, &'a str), CommandError> {
    let (index, tail) = match rest.split_once(char::is_whitespace) {
        Some((index, tail)) => (index, tail.trim()),
        None => (rest, ""),
    };
    if index.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a property index",
        });
    }
    let index = index
        .parse::<usize>()
        .map_err(|_| CommandError::InvalidArgument {
            argument: "property index",
            value: index.to_string(),
        })?;
    Ok((index, tail))
}

fn only_index(rest: &str, command: &'static str) -> Result<usize, CommandError> {
    let (index, tail) = index_and_rest(rest, command)?;
    if !tail.is_empty() {
        return Err(CommandError::TrailingArguments(command));
    }
    Ok(index)
}

fn no_args(
    rest: &str,
    command: &'static str,
    parsed: EditorCommand,
) -> Result<EditorCommand, CommandError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(CommandError::TrailingArguments(command))
    }
}
