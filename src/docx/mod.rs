/// Word (.docx) template support.
///
/// This module reads a Word template, rewrites the paragraphs that carry
/// placeholder tokens and writes the package back out.
///
/// # Architecture
///
/// - `Package`: the .docx file as an ordered set of ZIP members
/// - `part`: per-part paragraph span scanning and splicing
/// - `Paragraph` / `Run`: one `<w:p>` element, its text and formatting
///
/// Substitution works on a paragraph's concatenated text, so a token the
/// template's editor split across runs is still matched. A rewritten
/// paragraph collapses to a single run that keeps the first run's font
/// name, size, bold and italic; the rest of the run formatting is lost,
/// by design.
pub mod package;
pub mod paragraph;
pub mod part;

pub use package::{MAIN_PART, Package};
pub use paragraph::{Paragraph, Run, RunFormat};
