//! Package implementation for Word documents.
//!
//! A `.docx` file is an OPC package: a ZIP archive of XML parts. The
//! whole archive is read into memory once per generation call; only the
//! text-bearing parts are ever rewritten, every other member (styles,
//! numbering, media, relationships) round-trips byte for byte.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::CompressionMethod;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::docx::part::rewrite_part;
use crate::error::{Error, Result};
use crate::substitute::Substitutions;

/// The main document part of a Word package.
pub const MAIN_PART: &str = "word/document.xml";

/// A Word (.docx) package.
///
/// This is the entry point for filling a template. Open it, apply a
/// compiled substitution set, save it somewhere else; the package is
/// owned by one generation call and dropped at the end.
///
/// # Examples
///
/// ```rust,no_run
/// use libelle::docx::Package;
/// use libelle::jeton::{Jeton, PlaceholderMap};
/// use libelle::substitute::Substitutions;
///
/// let mut map = PlaceholderMap::new();
/// map.insert(Jeton::Date, "2 juin 2025");
/// let subs = Substitutions::compile(&map)?;
///
/// let mut pkg = Package::open("template_ts.docx")?;
/// pkg.substitute(&subs)?;
/// pkg.save_to("termsheet.docx")?;
/// # Ok::<(), libelle::Error>(())
/// ```
pub struct Package {
    /// All archive members, in original order.
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Open a .docx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Open a .docx package from its raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut member = archive.by_index(index)?;
            if member.is_dir() {
                continue;
            }
            let mut blob = Vec::with_capacity(member.size() as usize);
            member.read_to_end(&mut blob)?;
            parts.push((member.name().to_string(), blob));
        }

        let package = Self { parts };
        if package.part(MAIN_PART).is_none() {
            return Err(Error::InvalidPackage(format!("no {MAIN_PART} part")));
        }
        Ok(package)
    }

    /// Get the binary content of a part by member name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, blob)| blob.as_slice())
    }

    /// All member names, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(member, _)| member.as_str())
    }

    /// Apply a compiled substitution set to every text-bearing part:
    /// the main document (body and table-cell paragraphs) plus every
    /// header and footer part.
    ///
    /// Returns the number of rewritten paragraphs across the package.
    pub fn substitute(&mut self, subs: &Substitutions) -> Result<usize> {
        let mut rewritten = 0usize;
        for index in 0..self.parts.len() {
            if !is_text_part(&self.parts[index].0) {
                continue;
            }
            if let Some((new_xml, count)) = rewrite_part(&self.parts[index].1, subs)? {
                self.parts[index].1 = new_xml;
                rewritten += count;
            }
        }
        Ok(rewritten)
    }

    /// Extract all text from the main document part.
    ///
    /// Concatenates every `<w:t>` of the body in document order, for
    /// previews and tests.
    pub fn document_text(&self) -> Result<String> {
        let xml = self
            .part(MAIN_PART)
            .ok_or_else(|| Error::PartNotFound(MAIN_PART.to_string()))?;

        let mut reader = Reader::from_reader(xml);
        let mut result = String::with_capacity(xml.len() / 8);
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
                    if let Ok(name) = std::str::from_utf8(e.as_ref()) {
                        match name {
                            "amp" => result.push('&'),
                            "lt" => result.push('<'),
                            "gt" => result.push('>'),
                            "quot" => result.push('"'),
                            "apos" => result.push('\''),
                            _ => {},
                        }
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

    /// Serialize the package back to .docx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, blob) in &self.parts {
            writer.start_file(name.clone(), options)?;
            writer.write_all(blob)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }

    /// Write the package to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

/// Text-bearing parts: the main document plus headers and footers of
/// every section.
fn is_text_part(name: &str) -> bool {
    name == MAIN_PART
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jeton::{Jeton, PlaceholderMap};

    const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

    const RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";

    fn document_xml(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:body>{body}</w:body></w:document>"
        )
    }

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in parts {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn template(body: &str) -> Vec<u8> {
        build_docx(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", RELS),
            ("word/styles.xml", "<w:styles/>"),
            ("word/document.xml", &document_xml(body)),
            (
                "word/header1.xml",
                "<w:hdr><w:p><w:r><w:t>Dossier [référence dossier]</w:t></w:r></w:p></w:hdr>",
            ),
            (
                "word/footer1.xml",
                "<w:ftr><w:p><w:r><w:t>[Ville]</w:t></w:r></w:p></w:ftr>",
            ),
        ])
    }

    fn subs(entries: &[(Jeton, &str)]) -> Substitutions {
        let mut map = PlaceholderMap::new();
        for (jeton, valeur) in entries {
            map.insert(*jeton, *valeur);
        }
        Substitutions::compile(&map).unwrap()
    }

    #[test]
    fn missing_main_part_is_rejected() {
        let data = build_docx(&[("[Content_Types].xml", CONTENT_TYPES)]);
        assert!(matches!(Package::from_bytes(data), Err(Error::InvalidPackage(_))));
    }

    #[test]
    fn not_a_zip_is_rejected() {
        assert!(matches!(Package::from_bytes(b"pas un zip".to_vec()), Err(Error::Zip(_))));
    }

    #[test]
    fn substitutes_body_headers_and_footers() {
        let data = template(
            "<w:p><w:r><w:t>Le [montant_gfa] \u{20ac} ([montant_gfa_lettres] euros)</w:t></w:r></w:p>",
        );
        let mut pkg = Package::from_bytes(data).unwrap();
        let rewritten = pkg
            .substitute(&subs(&[
                (Jeton::MontantGfa, "1.500.000"),
                (Jeton::MontantGfaLettres, "un million cinq cent mille"),
                (Jeton::ReferenceDossier, "2025-042"),
                (Jeton::VilleRcs, "Nanterre"),
            ]))
            .unwrap();
        assert_eq!(rewritten, 3);

        let text = pkg.document_text().unwrap();
        assert_eq!(text, "Le 1.500.000 \u{20ac} (un million cinq cent mille euros)");

        let header = String::from_utf8(pkg.part("word/header1.xml").unwrap().to_vec()).unwrap();
        assert!(header.contains("Dossier 2025-042"));
        let footer = String::from_utf8(pkg.part("word/footer1.xml").unwrap().to_vec()).unwrap();
        assert!(footer.contains("Nanterre"));
    }

    #[test]
    fn untouched_parts_round_trip_byte_identical() {
        let data = template("<w:p><w:r><w:t>[objet]</w:t></w:r></w:p>");
        let mut pkg = Package::from_bytes(data).unwrap();
        pkg.substitute(&subs(&[(Jeton::Objet, "Programme")])).unwrap();

        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.part("word/styles.xml").unwrap(), b"<w:styles/>");
        assert_eq!(
            reopened.part("[Content_Types].xml").unwrap(),
            CONTENT_TYPES.as_bytes()
        );
        // Member order is preserved.
        let names: Vec<&str> = reopened.part_names().collect();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/styles.xml",
                "word/document.xml",
                "word/header1.xml",
                "word/footer1.xml",
            ]
        );
    }

    #[test]
    fn substitution_is_idempotent_at_package_level() {
        let data = template("<w:p><w:r><w:t>[objet] et [jeton_inconnu]</w:t></w:r></w:p>");
        let substitutions = subs(&[
            (Jeton::Objet, "Programme"),
            (Jeton::ReferenceDossier, "2025-042"),
            (Jeton::VilleRcs, "Nanterre"),
        ]);

        let mut pkg = Package::from_bytes(data).unwrap();
        pkg.substitute(&substitutions).unwrap();
        let first = pkg.to_bytes().unwrap();

        let mut again = Package::from_bytes(first.clone()).unwrap();
        let rewritten = again.substitute(&substitutions).unwrap();
        assert_eq!(rewritten, 0);
        // Unknown bracket text is still there, untouched.
        assert!(again.document_text().unwrap().contains("[jeton_inconnu]"));
        assert_eq!(again.to_bytes().unwrap(), first);
    }

    #[test]
    fn save_to_writes_a_reopenable_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("termsheet_genere.docx");

        let data = template("<w:p><w:r><w:t>[date]</w:t></w:r></w:p>");
        let mut pkg = Package::from_bytes(data).unwrap();
        pkg.substitute(&subs(&[(Jeton::Date, "2 juin 2025")])).unwrap();
        pkg.save_to(&path).unwrap();

        let reopened = Package::open(&path).unwrap();
        assert_eq!(reopened.document_text().unwrap(), "2 juin 2025");
    }

    #[test]
    fn open_missing_template_is_an_io_error() {
        assert!(matches!(Package::open("absent/template_ts.docx"), Err(Error::Io(_))));
    }
}
