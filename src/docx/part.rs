//! Part-level paragraph rewriting.
//!
//! A text-bearing part (`word/document.xml`, a header or a footer) is
//! scanned once for the byte spans of its outermost `<w:p>` elements —
//! body paragraphs and table-cell paragraphs alike, since cells nest
//! their paragraphs inside `<w:tbl>` within the same part. Changed
//! paragraphs are spliced back at their original offsets; everything
//! else (section properties, tables, bookmarks, the XML declaration)
//! keeps its original bytes.

use memchr::memchr2;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::docx::paragraph::Paragraph;
use crate::error::{Error, Result};
use crate::substitute::Substitutions;

/// Byte span of one outermost `<w:p>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParagraphSpan {
    start: usize,
    end: usize,
}

/// Rewrite every placeholder-bearing paragraph of a part.
///
/// Returns the new part XML and the number of rewritten paragraphs, or
/// `None` when no paragraph changed (callers then keep the original
/// part untouched).
pub fn rewrite_part(xml: &[u8], subs: &Substitutions) -> Result<Option<(Vec<u8>, usize)>> {
    // No '[' and no entity anywhere means no token anywhere.
    if subs.is_empty() || memchr2(b'[', b'&', xml).is_none() {
        return Ok(None);
    }

    let spans = paragraph_spans(xml)?;

    let mut out: Option<Vec<u8>> = None;
    let mut copied_up_to = 0usize;
    let mut rewritten = 0usize;

    for span in spans {
        let paragraph = Paragraph::new(xml[span.start..span.end].to_vec());
        if let Some(new_xml) = paragraph.substituted(subs)? {
            let out = out.get_or_insert_with(|| Vec::with_capacity(xml.len() + 256));
            out.extend_from_slice(&xml[copied_up_to..span.start]);
            out.extend_from_slice(&new_xml);
            copied_up_to = span.end;
            rewritten += 1;
        }
    }

    match out {
        Some(mut out) => {
            out.extend_from_slice(&xml[copied_up_to..]);
            Ok(Some((out, rewritten)))
        },
        None => Ok(None),
    }
}

/// Locate the outermost `<w:p>` elements of a part.
///
/// Depth is tracked for `w:p` only, so a paragraph nested in a text box
/// run stays inside its host paragraph's span.
fn paragraph_spans(xml: &[u8]) -> Result<Vec<ParagraphSpan>> {
    let mut reader = Reader::from_reader(xml);

    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut buf = Vec::with_capacity(2048);

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let is_word_p = e.local_name().as_ref() == b"p"
                    && (e.name().as_ref() == b"w:p" || e.name().as_ref() == b"p");
                if is_word_p {
                    if depth == 0 {
                        start = before;
                    }
                    depth += 1;
                }
            },
            Ok(Event::End(ref e)) => {
                let is_word_p = e.local_name().as_ref() == b"p"
                    && (e.name().as_ref() == b"w:p" || e.name().as_ref() == b"p");
                if is_word_p && depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(ParagraphSpan {
                            start,
                            end: reader.buffer_position() as usize,
                        });
                    }
                }
            },
            // <w:p/> carries no runs, nothing to substitute.
            Ok(Event::Empty(_)) => {},
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(spans)
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

    const PART: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:body>\
<w:p><w:r><w:t>Objet : [objet]</w:t></w:r></w:p>\
<w:p><w:r><w:t>Sans jeton</w:t></w:r></w:p>\
<w:tbl><w:tr><w:tc>\
<w:p><w:r><w:t>[date]</w:t></w:r></w:p>\
</w:tc></w:tr></w:tbl>\
<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr>\
</w:body></w:document>";

    #[test]
    fn spans_cover_body_and_table_cell_paragraphs() {
        let spans = paragraph_spans(PART).unwrap();
        assert_eq!(spans.len(), 3);
        for span in spans {
            let slice = &PART[span.start..span.end];
            assert!(slice.starts_with(b"<w:p>"));
            assert!(slice.ends_with(b"</w:p>"));
        }
    }

    #[test]
    fn rewrites_only_matching_paragraphs() {
        let (out, rewritten) = rewrite_part(
            PART,
            &subs(&[(Jeton::Objet, "Construction de 12 logements"), (Jeton::Date, "2 juin 2025")]),
        )
        .unwrap()
        .expect("part should change");
        assert_eq!(rewritten, 2);

        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.contains("Objet : Construction de 12 logements"));
        assert!(text.contains("<w:t xml:space=\"preserve\">2 juin 2025</w:t>"));
        // Untouched paragraph, table shell and section properties keep
        // their original bytes.
        assert!(text.contains("<w:p><w:r><w:t>Sans jeton</w:t></w:r></w:p>"));
        assert!(text.contains("<w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr>"));
        assert!(text.starts_with("<?xml version=\"1.0\""));
    }

    #[test]
    fn no_match_returns_none() {
        assert!(rewrite_part(PART, &subs(&[(Jeton::NomSccv, "SCCV")])).unwrap().is_none());
    }

    #[test]
    fn rewriting_is_idempotent() {
        let substitutions = subs(&[(Jeton::Objet, "Construction"), (Jeton::Date, "2 juin 2025")]);
        let (once, _) = rewrite_part(PART, &substitutions).unwrap().unwrap();
        assert!(rewrite_part(&once, &substitutions).unwrap().is_none());
    }

    #[test]
    fn token_split_across_runs_is_matched() {
        let part = b"<w:document><w:body>\
<w:p><w:r><w:t>[ob</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>jet]</w:t></w:r></w:p>\
</w:body></w:document>";
        let (out, rewritten) =
            rewrite_part(part, &subs(&[(Jeton::Objet, "Programme")])).unwrap().unwrap();
        assert_eq!(rewritten, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<w:t xml:space=\"preserve\">Programme</w:t>"));
        assert!(!text.contains("[ob"));
    }
}
