//! The interactive advising menu. Reads choices line by line from a [`LineSource`]: a
//! [`Terminal`] when a person is at the keyboard, or a [`Script`] over canned input in tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, error};

use crate::display;
use crate::index::CourseIndex;
use crate::loader;

const MENU: &str = "\
Menu:
  1. Load Data Structure
  2. Print Course List
  3. Print Course
  4. Remove Course
  9. Exit
";

const CHOICE_PROMPT: &str = "Enter choice: ";

/// Where the menu reads its answers from.
pub trait LineSource {
    /// Shows `prompt` and reads one trimmed line. `None` means there is nothing left to read.
    fn read_line<W: Write>(&mut self, prompt: &str, output: &mut W) -> io::Result<Option<String>>;
}

/// Answers read from a buffered reader. Prompts are echoed to the menu's output and bytes that
/// aren't UTF-8 are replaced rather than failing the read.
pub struct Script<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Script<R> {
    /// Reads answers from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for Script<R> {
    fn read_line<W: Write>(&mut self, prompt: &str, output: &mut W) -> io::Result<Option<String>> {
        write!(output, "{prompt}")?;
        output.flush()?;

        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).trim().to_string()))
    }
}

/// Answers typed at a terminal, with line editing and history.
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    /// Sets up the line editor.
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Terminal {
    fn read_line<W: Write>(&mut self, prompt: &str, output: &mut W) -> io::Result<Option<String>> {
        output.flush()?;

        match self.editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => {
                error!(%err, "readline error");
                Err(io::Error::new(io::ErrorKind::Other, err))
            }
        }
    }
}

/// Menu loop over an input, an output and the index it drives.
pub struct Menu<I, W> {
    input: I,
    output: W,
    index: CourseIndex,
    catalog: PathBuf,
}

impl<I, W> Menu<I, W>
where
    I: LineSource,
    W: Write,
{
    /// Creates a menu that loads `catalog` when asked to and otherwise works on `index`.
    pub fn new(input: I, output: W, index: CourseIndex, catalog: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            index,
            catalog: catalog.into(),
        }
    }

    /// The index the menu is working on.
    pub fn index(&self) -> &CourseIndex {
        &self.index
    }

    /// Hands back the output, mostly so tests can look at it.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Shows the menu and handles choices until the user exits or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt(CHOICE_PROMPT)? else {
                break;
            };
            debug!(%choice, "menu choice");

            match choice.as_str() {
                "1" => self.load()?,
                "2" => self.print_list()?,
                "3" => self.print_course()?,
                "4" => self.remove_course()?,
                "9" => break,
                other => writeln!(self.output, "{other} is not a valid option.")?,
            }
        }

        writeln!(self.output, "Good bye.")
    }

    /// Replaces the index with a fresh load of the catalog. A catalog that can't be opened
    /// leaves the current index alone.
    fn load(&mut self) -> io::Result<()> {
        writeln!(self.output, "Loading CSV file {}", self.catalog.display())?;

        let mut fresh = CourseIndex::with_policy(self.index.policy());
        let report = match loader::load_file(&self.catalog, &mut fresh) {
            Ok(report) => report,
            Err(err) => {
                error!(%err, "catalog load failed");
                return writeln!(self.output, "{err}");
            }
        };
        self.index = fresh;

        writeln!(self.output, "{} courses loaded.", report.loaded)?;
        for skipped in &report.skipped {
            writeln!(self.output, "Skipped {skipped}")?;
        }
        for (course, prerequisite) in &report.unknown_prerequisites {
            writeln!(
                self.output,
                "Warning: {course} lists unknown prerequisite {prerequisite}"
            )?;
        }
        Ok(())
    }

    fn print_list(&mut self) -> io::Result<()> {
        if self.index.is_empty() {
            return writeln!(self.output, "No courses loaded.");
        }
        writeln!(self.output, "{}", display::course_list(&self.index))
    }

    fn print_course(&mut self) -> io::Result<()> {
        let Some(key) = self.prompt("Input Course ")? else {
            return Ok(());
        };

        let text = match self.index.search(&key) {
            Some(course) => display::course_details(course),
            None => display::not_found(&key),
        };
        writeln!(self.output, "{text}")
    }

    fn remove_course(&mut self) -> io::Result<()> {
        let Some(key) = self.prompt("Remove Course ")? else {
            return Ok(());
        };

        match self.index.remove(&key) {
            Some(course) => {
                debug!(course = %course.id(), "removed course");
                writeln!(self.output, "Removed {}.", course.id())
            }
            None => writeln!(self.output, "{}", display::not_found(&key)),
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.input.read_line(text, &mut self.output)
    }
}
