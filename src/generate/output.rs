use crate::ast::Span;
use crate::error::GenerateError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Line-level source mapping
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Mapping {
    pub gen_line: usize,
    pub gen_col: usize,
    pub src_line: usize,
    pub src_col: usize,
}

/// Where generated text goes. Written append-only and never read back.
pub trait Destination {
    fn append(&mut self, text: &str) -> io::Result<()>;

    /// Called once after the last write of a successful run
    fn finalize(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Destination for String {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

/// File destination, created (or truncated) when opened
pub struct FileDestination {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileDestination {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { path, writer: BufWriter::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Destination for FileDestination {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    fn finalize(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Append-only text sink bound to one destination for one generation run
pub struct Emitter<'d> {
    dest: &'d mut dyn Destination,
    line: usize,
    col: usize,
    mappings: Vec<Mapping>,
}

impl<'d> Emitter<'d> {
    pub fn new(dest: &'d mut dyn Destination) -> Self {
        Self {
            dest,
            line: 0,
            col: 0,
            mappings: Vec::new(),
        }
    }

    /// Append text to the destination
    pub fn write_text(&mut self, text: &str) -> Result<(), GenerateError> {
        self.dest.append(text)?;
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count();
                self.col = text.len() - last - 1;
            }
            None => self.col += text.len(),
        }
        Ok(())
    }

    /// Append a line break
    pub fn newline(&mut self) -> Result<(), GenerateError> {
        self.write_text("\n")
    }

    /// Record that the text written next comes from `span`
    pub fn map_source(&mut self, span: Span) {
        self.mappings.push(Mapping {
            gen_line: self.line,
            gen_col: self.col,
            src_line: span.start.line,
            src_col: span.start.col,
        });
    }

    /// Current (line, column) in the generated text
    #[cfg(test)]
    fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    /// Finalize the destination and return the collected mappings
    pub fn finish(self) -> Result<Vec<Mapping>, GenerateError> {
        self.dest.finalize()?;
        Ok(self.mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    #[test]
    fn test_tracks_position() {
        let mut code = String::new();
        let mut out = Emitter::new(&mut code);
        out.write_text("public class Main {").unwrap();
        assert_eq!(out.position(), (0, 19));
        out.newline().unwrap();
        out.write_text("    Integer name;\n    ").unwrap();
        assert_eq!(out.position(), (2, 4));
        out.finish().unwrap();
        assert_eq!(code, "public class Main {\n    Integer name;\n    ");
    }

    #[test]
    fn test_mappings() {
        let mut code = String::new();
        let mut out = Emitter::new(&mut code);
        out.write_text("    ").unwrap();
        out.map_source(Span::at(4, 4));
        out.write_text("return n;\n").unwrap();
        let mappings = out.finish().unwrap();
        assert_eq!(mappings, vec![Mapping { gen_line: 0, gen_col: 4, src_line: 4, src_col: 4 }]);
    }

    #[test]
    fn test_file_destination_truncates() {
        let path = std::env::temp_dir().join(format!("pyjava-emitter-{}.java", std::process::id()));
        std::fs::write(&path, "stale contents that are longer than the new output").unwrap();

        let mut dest = FileDestination::create(&path).unwrap();
        let mut out = Emitter::new(&mut dest);
        out.write_text("fresh\n").unwrap();
        out.finish().unwrap();
        drop(dest);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
        std::fs::remove_file(&path).unwrap();
    }
}
