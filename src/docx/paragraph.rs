//! Paragraph and run handling for Word documents.
//!
//! A paragraph is held as the raw XML bytes of its `<w:p>` element, the
//! way the template stored it. Text extraction concatenates every
//! `<w:t>` in the paragraph, so a token split across runs by the
//! template's formatting is still seen whole.
//!
//! Rewriting collapses a changed paragraph to a single run that carries
//! the first original run's font name, size, bold and italic; every
//! other run-level property (underline, color, mixed formatting) is
//! dropped. This is the documented trade-off of the engine, not an
//! oversight.

use memchr::memchr2;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;
use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::substitute::Substitutions;

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Resolve a general reference (`&name;`, `&#NN;`, `&#xHH;`).
///
/// Unknown entity names come back as `None`; callers re-emit them
/// verbatim rather than guessing.
fn resolve_general_ref(name: &[u8]) -> Option<String> {
    match name {
        b"amp" => Some("&".to_string()),
        b"lt" => Some("<".to_string()),
        b"gt" => Some(">".to_string()),
        b"quot" => Some("\"".to_string()),
        b"apos" => Some("'".to_string()),
        [b'#', digits @ ..] => {
            let code = match digits {
                [b'x' | b'X', hex @ ..] => {
                    u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?
                },
                _ => std::str::from_utf8(digits).ok()?.parse().ok()?,
            };
            Some(char::from_u32(code)?.to_string())
        },
        _ => None,
    }
}

/// Character formatting carried over when a paragraph is rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points, as the raw `w:val` attribute.
    pub size: Option<String>,
    /// ASCII font name.
    pub font: Option<String>,
}

impl RunFormat {
    fn has_any(&self) -> bool {
        self.bold || self.italic || self.size.is_some() || self.font.is_some()
    }

    /// Emit a `<w:rPr>` block, children in schema order (rFonts, b, i, sz).
    fn write_rpr(&self, out: &mut Vec<u8>) {
        if !self.has_any() {
            return;
        }
        out.extend_from_slice(b"<w:rPr>");
        if let Some(font) = &self.font {
            let escaped = escape_xml(font);
            out.extend_from_slice(b"<w:rFonts w:ascii=\"");
            out.extend_from_slice(escaped.as_bytes());
            out.extend_from_slice(b"\" w:hAnsi=\"");
            out.extend_from_slice(escaped.as_bytes());
            out.extend_from_slice(b"\"/>");
        }
        if self.bold {
            out.extend_from_slice(b"<w:b/>");
        }
        if self.italic {
            out.extend_from_slice(b"<w:i/>");
        }
        if let Some(size) = &self.size {
            out.extend_from_slice(b"<w:sz w:val=\"");
            out.extend_from_slice(escape_xml(size).as_bytes());
            out.extend_from_slice(b"\"/>");
        }
        out.extend_from_slice(b"</w:rPr>");
    }
}

/// A text run within a paragraph.
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element held as raw XML bytes.
#[derive(Debug, Clone)]
pub struct Paragraph {
    /// The raw XML bytes for this paragraph
    xml_bytes: Vec<u8>,
}

impl Paragraph {
    /// Create a new Paragraph from the XML content of a `<w:p>` element.
    pub fn new(xml_bytes: Vec<u8>) -> Self {
        Self { xml_bytes }
    }

    #[inline]
    pub fn xml_bytes(&self) -> &[u8] {
        &self.xml_bytes
    }

    /// Get the text content of this paragraph.
    ///
    /// Concatenates all text from all `<w:t>` elements, with entity
    /// references resolved. Tabs, breaks and field characters are not
    /// part of the text, matching what the template author sees as the
    /// paragraph's plain wording.
    pub fn text(&self) -> Result<String> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);

        let mut result = String::with_capacity(self.xml_bytes.len() / 4);
        let mut in_text = false;
        let mut buf = Vec::with_capacity(1024);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if e.local_name().as_ref() == b"t" {
                        in_text = true;
                    }
                },
                Ok(Event::Text(e)) if in_text => {
                    let text = e.decode().map_err(|e| Error::Xml(e.to_string()))?;
                    result.push_str(&text);
                },
                Ok(Event::GeneralRef(e)) if in_text => {
                    match resolve_general_ref(e.as_ref()) {
                        Some(resolved) => result.push_str(&resolved),
                        None => {
                            // Unknown entity, keep the reference text
                            result.push('&');
                            result.push_str(&String::from_utf8_lossy(e.as_ref()));
                            result.push(';');
                        },
                    }
                },
                Ok(Event::End(e)) => {
                    if e.local_name().as_ref() == b"t" {
                        in_text = false;
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Get the runs in this paragraph, each with its text and the subset
    /// of character formatting the rewriter knows how to carry.
    pub fn runs(&self) -> Result<SmallVec<[Run; 8]>> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);

        let mut runs: SmallVec<[Run; 8]> = SmallVec::new();
        let mut current: Option<Run> = None;
        // Text boxes nest runs inside runs; only the outermost one is a
        // run of this paragraph.
        let mut run_depth = 0usize;
        let mut in_rpr = false;
        let mut in_text = false;
        let mut buf = Vec::with_capacity(1024);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    // w:r specifically, not m:r (math runs carry no w:rPr)
                    let is_word_run = e.local_name().as_ref() == b"r"
                        && (e.name().as_ref() == b"w:r" || e.name().as_ref() == b"r");
                    if is_word_run {
                        if current.is_none() {
                            current = Some(Run::default());
                        }
                        run_depth += 1;
                    } else if current.is_some() {
                        match e.local_name().as_ref() {
                            b"rPr" => in_rpr = true,
                            b"t" if !in_rpr => in_text = true,
                            name if in_rpr => {
                                apply_rpr_child(name, e, current.as_mut().map(|run| &mut run.format));
                            },
                            _ => {},
                        }
                    }
                },
                Ok(Event::Empty(ref e)) => {
                    if current.is_some() && in_rpr {
                        apply_rpr_child(
                            e.local_name().as_ref(),
                            e,
                            current.as_mut().map(|run| &mut run.format),
                        );
                    }
                },
                Ok(Event::Text(e)) if in_text => {
                    if let Some(run) = current.as_mut() {
                        let text = e.decode().map_err(|e| Error::Xml(e.to_string()))?;
                        run.text.push_str(&text);
                    }
                },
                Ok(Event::GeneralRef(e)) if in_text => {
                    if let Some(run) = current.as_mut()
                        && let Some(resolved) = resolve_general_ref(e.as_ref())
                    {
                        run.text.push_str(&resolved);
                    }
                },
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"rPr" => in_rpr = false,
                    b"r" if e.name().as_ref() == b"w:r" || e.name().as_ref() == b"r" => {
                        run_depth = run_depth.saturating_sub(1);
                        if run_depth == 0
                            && let Some(run) = current.take()
                        {
                            runs.push(run);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(runs)
    }

    /// Apply the substitutions to this paragraph.
    ///
    /// Returns the rewritten `<w:p>` XML when a token matched, `None`
    /// when the paragraph is untouched (so callers keep the original
    /// bytes and the operation stays idempotent).
    pub fn substituted(&self, subs: &Substitutions) -> Result<Option<Vec<u8>>> {
        // A token (or its escaped form) always leaves a '[' or '&' in
        // the raw bytes; most paragraphs are skipped right here.
        if memchr2(b'[', b'&', &self.xml_bytes).is_none() {
            return Ok(None);
        }

        let text = self.text()?;
        let Cow::Owned(new_text) = subs.apply(&text) else {
            return Ok(None);
        };

        let format = self
            .runs()?
            .first()
            .map(|run| run.format.clone())
            .unwrap_or_default();

        self.rebuild(&new_text, &format).map(Some)
    }

    /// Re-emit this paragraph with its original start tag and `<w:pPr>`
    /// block, followed by a single run with the new text.
    fn rebuild(&self, new_text: &str, format: &RunFormat) -> Result<Vec<u8>> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);
        let mut out = Vec::with_capacity(self.xml_bytes.len() + new_text.len());
        let mut buf = Vec::with_capacity(1024);

        // Opening <w:p> tag, attributes preserved.
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    write_start_tag(&mut out, b"w:p", e);
                    break;
                },
                Ok(Event::Eof) => {
                    return Err(Error::Xml("paragraph without <w:p> element".to_string()));
                },
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }
        buf.clear();

        // Copy the paragraph-properties block verbatim if it is there
        // (per the schema it is the first child).
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"pPr" => {
                    let start = e.to_owned();
                    copy_element(&mut reader, &start, &mut out)?;
                    break;
                },
                Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"pPr" => {
                    write_empty_tag(&mut out, e);
                    break;
                },
                Ok(Event::Text(e)) if (*e).iter().all(u8::is_ascii_whitespace) => {},
                Ok(_) | Err(_) => break,
            }
            buf.clear();
        }

        out.extend_from_slice(b"<w:r>");
        format.write_rpr(&mut out);
        for (index, line) in new_text.split('\n').enumerate() {
            if index > 0 {
                out.extend_from_slice(b"<w:br/>");
            }
            if !line.is_empty() {
                out.extend_from_slice(b"<w:t xml:space=\"preserve\">");
                out.extend_from_slice(escape_xml(line).as_bytes());
                out.extend_from_slice(b"</w:t>");
            }
        }
        out.extend_from_slice(b"</w:r></w:p>");

        Ok(out)
    }
}

/// Set a run-format field from a `<w:rPr>` child element.
fn apply_rpr_child(name: &[u8], e: &BytesStart, format: Option<&mut RunFormat>) {
    let Some(format) = format else { return };
    match name {
        b"b" => format.bold = flag_value(e),
        b"i" => format.italic = flag_value(e),
        b"sz" => format.size = attr_value(e, b"val"),
        b"rFonts" => {
            format.font = attr_value(e, b"ascii").or_else(|| attr_value(e, b"hAnsi"));
        },
        _ => {},
    }
}

/// An on/off property is on unless `w:val` says otherwise.
fn flag_value(e: &BytesStart) -> bool {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"val" {
            return !matches!(attr.value.as_ref(), b"false" | b"0" | b"none");
        }
    }
    true
}

fn attr_value(e: &BytesStart, local: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == local {
            return Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    None
}

fn write_start_tag(out: &mut Vec<u8>, name: &[u8], e: &BytesStart) {
    out.push(b'<');
    out.extend_from_slice(name);
    for attr in e.attributes().flatten() {
        out.push(b' ');
        out.extend_from_slice(attr.key.as_ref());
        out.extend_from_slice(b"=\"");
        out.extend_from_slice(&attr.value);
        out.push(b'"');
    }
    out.push(b'>');
}

fn write_empty_tag(out: &mut Vec<u8>, e: &BytesStart) {
    out.push(b'<');
    out.extend_from_slice(e.name().as_ref());
    for attr in e.attributes().flatten() {
        out.push(b' ');
        out.extend_from_slice(attr.key.as_ref());
        out.extend_from_slice(b"=\"");
        out.extend_from_slice(&attr.value);
        out.push(b'"');
    }
    out.extend_from_slice(b"/>");
}

/// Copy an element subtree verbatim, `start` tag included.
fn copy_element(reader: &mut Reader<&[u8]>, start: &BytesStart, out: &mut Vec<u8>) -> Result<()> {
    write_start_tag(out, start.name().as_ref(), start);
    let mut depth = 1usize;
    let mut buf = Vec::with_capacity(512);

    while depth > 0 {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                write_start_tag(out, e.name().as_ref(), &e);
            },
            Ok(Event::Empty(e)) => write_empty_tag(out, &e),
            Ok(Event::End(e)) => {
                depth -= 1;
                out.extend_from_slice(b"</");
                out.extend_from_slice(e.name().as_ref());
                out.push(b'>');
            },
            Ok(Event::Text(e)) => out.extend_from_slice(e.as_ref()),
            Ok(Event::GeneralRef(e)) => {
                out.push(b'&');
                out.extend_from_slice(e.as_ref());
                out.push(b';');
            },
            Ok(Event::Eof) => {
                return Err(Error::Xml("unclosed element in paragraph".to_string()));
            },
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jeton::{Jeton, PlaceholderMap};

    fn subs(entries: &[(Jeton, &str)]) -> Substitutions {
        let mut map = PlaceholderMap::new();
        for (jeton, valeur) in entries {
            map.insert(*jeton, *valeur);
        }
        Substitutions::compile(&map).unwrap()
    }

    #[test]
    fn text_concatenates_split_runs() {
        let para = Paragraph::new(
            b"<w:p><w:r><w:t>[mon</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>tant_gfa]</w:t></w:r></w:p>"
                .to_vec(),
        );
        assert_eq!(para.text().unwrap(), "[montant_gfa]");
    }

    #[test]
    fn text_resolves_entities() {
        let para =
            Paragraph::new(b"<w:p><w:r><w:t>Barnes &amp; Fils &#233;</w:t></w:r></w:p>".to_vec());
        assert_eq!(para.text().unwrap(), "Barnes & Fils é");
    }

    #[test]
    fn runs_expose_first_run_formatting() {
        let para = Paragraph::new(
            b"<w:p><w:r><w:rPr><w:rFonts w:ascii=\"Garamond\" w:hAnsi=\"Garamond\"/><w:b/><w:sz w:val=\"24\"/></w:rPr><w:t>texte</w:t></w:r><w:r><w:t> suite</w:t></w:r></w:p>"
                .to_vec(),
        );
        let runs = para.runs().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "texte");
        assert!(runs[0].format.bold);
        assert!(!runs[0].format.italic);
        assert_eq!(runs[0].format.size.as_deref(), Some("24"));
        assert_eq!(runs[0].format.font.as_deref(), Some("Garamond"));
        assert_eq!(runs[1].text, " suite");
        assert!(!runs[1].format.bold);
    }

    #[test]
    fn bold_off_is_not_carried() {
        let para = Paragraph::new(
            b"<w:p><w:r><w:rPr><w:b w:val=\"false\"/></w:rPr><w:t>[date]</w:t></w:r></w:p>"
                .to_vec(),
        );
        let runs = para.runs().unwrap();
        assert!(!runs[0].format.bold);
    }

    #[test]
    fn substituted_rewrites_to_a_single_run_with_first_run_format() {
        let para = Paragraph::new(
            b"<w:p><w:pPr><w:jc w:val=\"both\"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val=\"22\"/></w:rPr><w:t>Prix : [mon</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>tant_gfa] \xe2\x82\xac</w:t></w:r></w:p>"
                .to_vec(),
        );
        let rewritten = para
            .substituted(&subs(&[(Jeton::MontantGfa, "1.500.000")]))
            .unwrap()
            .expect("paragraph should change");
        let xml = String::from_utf8(rewritten).unwrap();
        assert!(xml.starts_with("<w:p>"));
        // Paragraph properties survive verbatim.
        assert!(xml.contains("<w:pPr><w:jc w:val=\"both\"/></w:pPr>"));
        // One run, first run's formatting only.
        assert_eq!(xml.matches("<w:r>").count(), 1);
        assert!(xml.contains("<w:rPr><w:b/><w:sz w:val=\"22\"/></w:rPr>"));
        assert!(!xml.contains("<w:i/>"));
        assert!(xml.contains("<w:t xml:space=\"preserve\">Prix : 1.500.000 €</w:t>"));

        let reparsed = Paragraph::new(xml.into_bytes());
        assert_eq!(reparsed.text().unwrap(), "Prix : 1.500.000 €");
    }

    #[test]
    fn untouched_paragraph_returns_none() {
        let para = Paragraph::new(b"<w:p><w:r><w:t>Pas de jeton ici</w:t></w:r></w:p>".to_vec());
        assert!(para.substituted(&subs(&[(Jeton::Date, "2 juin 2025")])).unwrap().is_none());
        // Unknown bracket text is also left alone.
        let para = Paragraph::new(b"<w:p><w:r><w:t>[jeton_inconnu]</w:t></w:r></w:p>".to_vec());
        assert!(para.substituted(&subs(&[(Jeton::Date, "2 juin 2025")])).unwrap().is_none());
    }

    #[test]
    fn replacement_value_is_escaped() {
        let para = Paragraph::new(b"<w:p><w:r><w:t>[Nom du promoteur]</w:t></w:r></w:p>".to_vec());
        let rewritten = para
            .substituted(&subs(&[(Jeton::NomPromoteur, "Barnes & Fils <SA>")]))
            .unwrap()
            .unwrap();
        let xml = String::from_utf8(rewritten).unwrap();
        assert!(xml.contains("Barnes &amp; Fils &lt;SA&gt;"));
        let reparsed = Paragraph::new(xml.into_bytes());
        assert_eq!(reparsed.text().unwrap(), "Barnes & Fils <SA>");
    }

    #[test]
    fn newlines_in_value_become_breaks_in_one_run() {
        let para =
            Paragraph::new(b"<w:p><w:r><w:t>[section_complete_cii]</w:t></w:r></w:p>".to_vec());
        let rewritten = para
            .substituted(&subs(&[(Jeton::SectionCompleteCii, "ligne a\n\nligne b")]))
            .unwrap()
            .unwrap();
        let xml = String::from_utf8(rewritten).unwrap();
        assert_eq!(xml.matches("<w:r>").count(), 1);
        assert_eq!(xml.matches("<w:br/>").count(), 2);
        assert!(xml.contains("<w:t xml:space=\"preserve\">ligne a</w:t>"));
        assert!(xml.contains("<w:t xml:space=\"preserve\">ligne b</w:t>"));
    }

    #[test]
    fn paragraph_without_runs_still_rewrites() {
        // Degenerate but legal: token text directly under w:p is not a
        // thing in WordprocessingML, so an empty paragraph stays empty.
        let para = Paragraph::new(b"<w:p><w:pPr/></w:p>".to_vec());
        assert!(para.substituted(&subs(&[(Jeton::Date, "x")])).unwrap().is_none());
    }
}
