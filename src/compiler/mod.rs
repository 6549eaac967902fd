//! Config compiler - declarative lines to an ordered [`FrameList`].
//!
//! Each `txt` line becomes one TEXT frame. Each `cmd` line runs its command,
//! splits the transcoded output into STRING fragments of at most
//! [`MAX_STRING_SIZE`] bytes, and appends one TEXT frame that references
//! those fragments in order. Every frame takes one label from the pool.
//!
//! The number of fragments a `cmd` line reserves never depends on what its
//! command prints, so a config always compiles to the same label layout and
//! an update run only ever writes to labels set up as STRING files.
//!
//! # Example
//!
//! ```
//! use signwire::compiler::Compiler;
//!
//! let frames = Compiler::new().compile("# greeting\ntxt a Hello\n").unwrap();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames.labels().collect::<Vec<_>>(), vec![0x20]);
//! ```

mod command;
mod line;

pub use command::{CommandRunner, ShellCommandRunner};

use std::borrow::Cow;
use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::error::{Result, SignError};
use crate::markup::transcode;
use crate::profile::DeviceProfile;
use crate::protocol::modes::mode_name;
use crate::protocol::{
    Frame, FrameList, LabelAllocator, LabelPool, MAX_STRING_GROUP_COUNT, MAX_STRING_SIZE,
    MAX_TEXT_SIZE, STRING_REFERENCE,
};

use line::{parse_line, Mode, Statement};

/// Compiler settings.
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Labels available to frames.
    pub label_pool: LabelPool,
}

impl CompilerOptions {
    /// Options using the first `limit` protocol labels.
    pub fn with_label_limit(limit: usize) -> Self {
        Self {
            label_pool: LabelPool::with_limit(limit),
        }
    }

    /// Options matching a device profile.
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        Self::with_label_limit(profile.label_limit)
    }
}

/// Compiles config text into frames.
///
/// Commands from `cmd` lines run through `R`, [`ShellCommandRunner`] by
/// default.
#[derive(Debug, Clone, Default)]
pub struct Compiler<R = ShellCommandRunner> {
    options: CompilerOptions,
    runner: R,
}

impl Compiler<ShellCommandRunner> {
    /// Compiler with default options that runs commands through `sh -c`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> Compiler<R> {
    /// Compiler with a custom command runner.
    pub fn with_runner(runner: R) -> Self {
        Self {
            options: CompilerOptions::default(),
            runner,
        }
    }

    /// Replace the compiler options.
    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile a whole config file.
    pub fn compile(&self, source: &str) -> Result<FrameList> {
        self.compile_bytes(source.as_bytes())
    }

    /// Compile a config file that may not be UTF-8 (Latin-1 text, say).
    pub fn compile_bytes(&self, source: &[u8]) -> Result<FrameList> {
        self.compile_lines(source.split(|&b| b == b'\n'))
    }

    /// Compile config read from `reader` (a file or stdin).
    pub fn compile_reader(&self, mut reader: impl Read) -> Result<FrameList> {
        let mut source = Vec::new();
        reader.read_to_end(&mut source)?;
        self.compile_bytes(&source)
    }

    /// Compile config lines. Line numbers in errors are 1-based positions in
    /// `lines`.
    pub fn compile_lines<I, S>(&self, lines: I) -> Result<FrameList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut build = Build {
            frames: FrameList::new(),
            labels: self.options.label_pool.allocator(),
        };

        for (index, raw) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            let line = strip_carriage_returns(raw.as_ref());
            match parse_line(&line, line_no)? {
                Statement::Skip => {}
                Statement::Text { mode, text } => build.text(mode, text, line_no)?,
                Statement::Command {
                    mode,
                    size,
                    command,
                } => {
                    let raw = self.runner.run(&command)?;
                    build.command(mode, size, &raw, line_no)?;
                }
            }
        }

        debug!(
            frames = build.frames.len(),
            labels = build.labels.issued(),
            "Config compiled"
        );
        Ok(build.frames)
    }
}

/// Frames and label cursor for one compile run.
struct Build<'a> {
    frames: FrameList,
    labels: LabelAllocator<'a>,
}

impl Build<'_> {
    fn next_label(&mut self) -> Result<u8> {
        let max_labels = self.labels.capacity();
        self.labels.allocate().ok_or(SignError::Capacity {
            max_labels,
            cmd_cost: MAX_STRING_GROUP_COUNT + 1,
        })
    }

    fn text(&mut self, mode: Mode, text: Option<&[u8]>, line_no: usize) -> Result<()> {
        log_mode(mode, line_no);

        let payload = text.map(|text| {
            let result = transcode(text, MAX_TEXT_SIZE);
            if result.truncated {
                warn_truncated(line_no, result.consumed, MAX_TEXT_SIZE);
            }
            result.output
        });

        let label = self.next_label()?;
        self.frames
            .push(Frame::text(label, mode.mode, mode.special, payload));
        Ok(())
    }

    /// Fragment `raw` into STRING frames and append the referencing TEXT frame.
    ///
    /// With an explicit `size`, exactly `ceil(size / 125)` fragments are
    /// reserved (none for size 0). Without one, the full group of
    /// [`MAX_STRING_GROUP_COUNT`] is reserved. Fragments the output doesn't
    /// reach stay empty.
    fn command(&mut self, mode: Mode, size: Option<usize>, raw: &[u8], line_no: usize) -> Result<()> {
        log_mode(mode, line_no);

        let max_fragments = size.map_or(MAX_STRING_GROUP_COUNT, |size| {
            size.div_ceil(MAX_STRING_SIZE)
        });
        if max_fragments == 0 && !raw.is_empty() {
            warn_truncated(line_no, 0, 0);
        }

        let mut references = BytesMut::with_capacity(2 * max_fragments);
        let mut consumed = 0;
        for index in 0..max_fragments {
            let fragment = transcode(&raw[consumed..], MAX_STRING_SIZE);
            consumed += fragment.consumed;

            let last = index + 1 == max_fragments;
            if fragment.truncated && last {
                warn_truncated(line_no, consumed, max_fragments * MAX_STRING_SIZE);
            }

            let label = self.next_label()?;
            debug!(line = line_no, label, bytes = fragment.output.len(), "String fragment");
            self.frames.push(Frame::string_fragment(label, fragment.output));
            references.put_u8(STRING_REFERENCE);
            references.put_u8(label);
        }

        let label = self.next_label()?;
        let references: Bytes = references.freeze();
        self.frames
            .push(Frame::text(label, mode.mode, mode.special, Some(references)));
        Ok(())
    }
}

fn strip_carriage_returns(line: &[u8]) -> Cow<'_, [u8]> {
    if line.contains(&b'\r') {
        Cow::Owned(line.iter().copied().filter(|&b| b != b'\r').collect())
    } else {
        Cow::Borrowed(line)
    }
}

fn log_mode(mode: Mode, line_no: usize) {
    match mode_name(mode.mode, mode.special()) {
        Some(name) => debug!(line = line_no, mode = name, "Display mode"),
        None => debug!(
            line = line_no,
            mode = %char::from(mode.mode),
            "Undocumented display mode"
        ),
    }
}

fn warn_truncated(line_no: usize, input_index: usize, available: usize) {
    warn!(
        "Warning, line {}: Data has been truncated at input index {} to fit {} available output bytes.",
        line_no, input_index, available
    );
    warn!("Input vs output bytecount can vary if you used inline commands in your input.");
}
