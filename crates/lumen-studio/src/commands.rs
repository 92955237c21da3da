//! Console command parsing.

use std::path::PathBuf;
use std::str::FromStr;

use lumen_common::{ColorParseError, IconId, IconRef, Rgb};
use lumen_editor::paint::{Axis, Tool};
use thiserror::Error;

/// Help text listing every command.
pub const HELP: &str = "\
Drawing:
  paint ROW COL          paint one cell with the current colour
  click X Y [SIZE]       paint at canvas pixel X,Y (canvas shown at SIZE px)
  stroke R C [R C ...]   drag through cells as one undoable stroke
  pick ROW COL           copy a cell's colour
  tool draw|pick         select the tool
  color #RRGGBB          set the current colour
  sym h|v                toggle horizontal / vertical symmetry
  fill [#RRGGBB]         fill the frame (current colour by default)
  clear                  clear the frame to black
  undo | redo            step through history
Frames:
  frame add|dup|del|N    add, duplicate, delete or select a frame
  fps N                  set the playback rate
  play | stop            preview the animation
Output:
  show                   draw the current frame
  export [DIR]           write the frame as PNG
  send [BRIGHTNESS]      apply the frame to the device
Library:
  new                    start a new icon
  save [NAME]            save the animation to the library
  list                   list saved icons
  open ID                load a library icon
  delete ID              delete a library icon
  preview ID             show an icon's first frame or thumbnail
  help | quit";

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Empty input.
    #[error("empty command")]
    Empty,

    /// Unrecognised command word.
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),

    /// A required argument is missing.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// Command word
        command: &'static str,
        /// Name of the missing argument
        argument: &'static str,
    },

    /// An argument could not be parsed.
    #[error("invalid {argument}: {value}")]
    InvalidArgument {
        /// Name of the argument
        argument: &'static str,
        /// Offending value
        value: String,
    },

    /// A colour could not be parsed.
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Frame management sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCommand {
    /// Append a black frame.
    Add,
    /// Duplicate the active frame.
    Duplicate,
    /// Delete the active frame.
    Delete,
    /// Select a frame by zero-based index.
    Select(usize),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Single-cell stroke.
    Paint {
        /// Row
        row: i32,
        /// Column
        col: i32,
    },
    /// Single stroke at canvas pixel coordinates.
    Click {
        /// Horizontal pixel offset
        x: u32,
        /// Vertical pixel offset
        y: u32,
        /// Size the canvas is displayed at, when scaled
        rendered: Option<u32>,
    },
    /// Multi-cell stroke.
    Stroke(Vec<(i32, i32)>),
    /// Colour pick.
    Pick {
        /// Row
        row: i32,
        /// Column
        col: i32,
    },
    /// Tool selection.
    Tool(Tool),
    /// Current colour.
    Color(Rgb),
    /// Symmetry toggle.
    Symmetry(Axis),
    /// Fill with a colour (current colour when `None`).
    Fill(Option<Rgb>),
    /// Clear to black.
    Clear,
    /// Undo.
    Undo,
    /// Redo.
    Redo,
    /// Frame management.
    Frame(FrameCommand),
    /// Playback rate.
    Fps(u32),
    /// Start preview playback.
    Play,
    /// Stop preview playback.
    Stop,
    /// Render the live frame.
    Show,
    /// PNG export.
    Export(Option<PathBuf>),
    /// Device output with optional brightness.
    Send(Option<u8>),
    /// Start a new icon.
    New,
    /// Save under an optional name.
    Save(Option<String>),
    /// List the library.
    List,
    /// Open an icon.
    Open(IconRef),
    /// Delete an icon.
    Delete(IconId),
    /// Preview an icon.
    Preview(IconRef),
    /// Show help.
    Help,
    /// Exit.
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match word.to_ascii_lowercase().as_str() {
            "paint" | "p" => {
                let (row, col) = cell(&args, "paint")?;
                Self::Paint { row, col }
            },
            "click" => Self::Click {
                x: number(required(&args, 0, "click", "x")?, "x")?,
                y: number(required(&args, 1, "click", "y")?, "y")?,
                rendered: args.get(2).map(|size| number(size, "size")).transpose()?,
            },
            "stroke" => {
                if args.is_empty() || args.len() % 2 != 0 {
                    return Err(CommandError::MissingArgument {
                        command: "stroke",
                        argument: "row/column pairs",
                    });
                }
                let cells = args
                    .chunks(2)
                    .map(|pair| cell(pair, "stroke"))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::Stroke(cells)
            },
            "pick" => {
                let (row, col) = cell(&args, "pick")?;
                Self::Pick { row, col }
            },
            "tool" => match required(&args, 0, "tool", "tool name")? {
                "draw" => Self::Tool(Tool::Draw),
                "pick" => Self::Tool(Tool::Pick),
                other => return Err(invalid("tool", other)),
            },
            "color" | "colour" => Self::Color(Rgb::parse_hex(required(&args, 0, "color", "colour")?)?),
            "sym" | "symmetry" => match required(&args, 0, "sym", "axis")? {
                "h" | "horizontal" => Self::Symmetry(Axis::Horizontal),
                "v" | "vertical" => Self::Symmetry(Axis::Vertical),
                other => return Err(invalid("axis", other)),
            },
            "fill" => Self::Fill(args.first().map(|hex| Rgb::parse_hex(hex)).transpose()?),
            "clear" => Self::Clear,
            "undo" | "u" => Self::Undo,
            "redo" | "r" => Self::Redo,
            "frame" | "f" => Self::Frame(match required(&args, 0, "frame", "action")? {
                "add" => FrameCommand::Add,
                "dup" | "duplicate" => FrameCommand::Duplicate,
                "del" | "delete" => FrameCommand::Delete,
                index => FrameCommand::Select(number(index, "frame index")?),
            }),
            "fps" => Self::Fps(number(required(&args, 0, "fps", "rate")?, "rate")?),
            "play" => Self::Play,
            "stop" => Self::Stop,
            "show" => Self::Show,
            "export" => Self::Export(args.first().map(PathBuf::from)),
            "send" => Self::Send(args.first().map(|b| number(b, "brightness")).transpose()?),
            "new" => Self::New,
            "save" => Self::Save((!args.is_empty()).then(|| args.join(" "))),
            "list" | "ls" => Self::List,
            "open" => Self::Open(IconRef::parse(required(&args, 0, "open", "icon id")?)),
            "delete" | "rm" => {
                let raw = required(&args, 0, "delete", "icon id")?;
                Self::Delete(IconId::parse(raw).ok_or_else(|| invalid("library icon id", raw))?)
            },
            "preview" => Self::Preview(IconRef::parse(required(&args, 0, "preview", "icon id")?)),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn number<T: FromStr>(raw: &str, argument: &'static str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| invalid(argument, raw))
}

fn cell(args: &[&str], command: &'static str) -> Result<(i32, i32), CommandError> {
    let row = number(required(args, 0, command, "row")?, "row")?;
    let col = number(required(args, 1, command, "column")?, "column")?;
    Ok((row, col))
}

fn invalid(argument: &'static str, value: &str) -> CommandError {
    CommandError::InvalidArgument {
        argument,
        value: value.to_string(),
    }
}
