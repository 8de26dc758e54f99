//! Combining plotted sheets into one bookmarked PDF.

use crate::error::{PackError, Result};
use lopdf::{Bookmark, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Collects PDFs in order and writes them out as one document.
pub trait PdfMerger {
    /// Queue every page of `path`, bookmarked as `title`.
    fn append(&mut self, path: &Path, title: &str) -> Result<()>;

    /// Write the queued documents to `output` and start over. Returns how many were written.
    fn write(&mut self, output: &Path) -> Result<usize>;
}

/// [`PdfMerger`] built on `lopdf` page-tree concatenation.
#[derive(Debug, Default)]
pub struct LopdfMerger {
    pending: Vec<(String, Document)>,
}

impl LopdfMerger {
    /// Create an empty merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued documents.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl PdfMerger for LopdfMerger {
    /// A file that can't be loaded drops everything queued so far.
    fn append(&mut self, path: &Path, title: &str) -> Result<()> {
        let document = match Document::load(path) {
            Ok(document) => document,
            Err(source) => {
                self.pending.clear();
                return Err(PackError::PdfRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.pending.push((title.to_string(), document));
        Ok(())
    }

    fn write(&mut self, output: &Path) -> Result<usize> {
        if self.pending.is_empty() {
            return Err(PackError::EmptyMerge {
                path: output.to_path_buf(),
            });
        }
        let documents = std::mem::take(&mut self.pending);
        let count = documents.len();

        let mut merged = concatenate(documents, output)?;
        merged.save(output).map_err(|e| PackError::PdfWrite {
            path: output.to_path_buf(),
            message: e.to_string(),
        })?;

        info!("Merged {} file(s) into {}", count, output.display());
        Ok(count)
    }
}

fn structure_error(output: &Path, message: &str) -> PackError {
    PackError::PdfStructure {
        path: output.to_path_buf(),
        message: message.to_string(),
    }
}

/// Page attributes a page may inherit from its page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copy inherited attributes onto `page` so it survives moving to another page tree.
fn inherit_attributes(doc: &Document, page: &mut lopdf::Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(parent_id) = parent {
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
}

/// Join the page trees of `documents` under one catalog, one outline entry per document.
fn concatenate(documents: Vec<(String, Document)>, output: &Path) -> Result<Document> {
    let mut max_id = 1;
    let mut merged = Document::with_version("1.5");
    let mut pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for (title, mut doc) in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let mut first = true;
        for (_, page_id) in doc.get_pages() {
            if first {
                merged.add_bookmark(Bookmark::new(title.clone(), [0.0, 0.0, 0.0], 0, page_id), None);
                first = false;
            }
            if let Ok(page) = doc.get_dictionary(page_id) {
                let mut page = page.clone();
                inherit_attributes(&doc, &mut page);
                pages.push((page_id, Object::Dictionary(page)));
            }
        }
        objects.extend(doc.objects);
    }

    let mut catalog: Option<(ObjectId, Object)> = None;
    let mut page_tree: Option<(ObjectId, Object)> = None;

    for (object_id, object) in objects {
        let kind = object.type_name().map(|name| name.as_bytes().to_vec()).unwrap_or_default();
        match kind.as_slice() {
            b"Catalog" => {
                let id = catalog.as_ref().map_or(object_id, |(id, _)| *id);
                catalog = Some((id, object));
            }
            b"Pages" => {
                if let Ok(dictionary) = object.as_dict() {
                    let mut dictionary = dictionary.clone();
                    if let Some((_, ref previous)) = page_tree {
                        if let Ok(previous) = previous.as_dict() {
                            dictionary.extend(previous);
                        }
                    }
                    let id = page_tree.as_ref().map_or(object_id, |(id, _)| *id);
                    page_tree = Some((id, Object::Dictionary(dictionary)));
                }
            }
            b"Page" | b"Outlines" | b"Outline" => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (tree_id, tree) = page_tree.ok_or_else(|| structure_error(output, "no page tree"))?;
    let (catalog_id, catalog) = catalog.ok_or_else(|| structure_error(output, "no catalog"))?;

    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    for (object_id, object) in pages {
        if let Object::Dictionary(mut dictionary) = object {
            dictionary.set("Parent", tree_id);
            merged.objects.insert(object_id, Object::Dictionary(dictionary));
        }
    }

    let mut tree = tree
        .as_dict()
        .map_err(|_| structure_error(output, "page tree is not a dictionary"))?
        .clone();
    tree.set("Count", kids.len() as u32);
    tree.set("Kids", kids);
    merged.objects.insert(tree_id, Object::Dictionary(tree));

    let mut catalog = catalog
        .as_dict()
        .map_err(|_| structure_error(output, "catalog is not a dictionary"))?
        .clone();
    catalog.set("Pages", tree_id);
    catalog.remove(b"Outlines");
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.adjust_zero_pages();

    if let Some(outline_id) = merged.build_outline() {
        let root = merged
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| structure_error(output, "no root reference"))?;
        if let Ok(Object::Dictionary(dict)) = merged.get_object_mut(root) {
            dict.set("Outlines", Object::Reference(outline_id));
        }
    }

    merged.compress();
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    /// Write a single-page PDF showing `text`.
    fn write_one_page_pdf(path: &Path, text: &str) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 1224.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    /// Top-level outline entries of `doc` as (title, target page).
    fn outline(doc: &Document) -> Vec<(String, ObjectId)> {
        let root = doc
            .catalog()
            .unwrap()
            .get(b"Outlines")
            .and_then(Object::as_reference)
            .unwrap();
        let mut next = doc
            .get_dictionary(root)
            .unwrap()
            .get(b"First")
            .and_then(Object::as_reference)
            .ok();

        let mut entries = Vec::new();
        while let Some(id) = next {
            let entry = doc.get_dictionary(id).unwrap();
            let title = entry.get(b"Title").and_then(Object::as_str).unwrap();
            let dest = match entry.get(b"Dest") {
                Ok(dest) => dest,
                Err(_) => {
                    let (_, action) = doc.dereference(entry.get(b"A").unwrap()).unwrap();
                    action.as_dict().unwrap().get(b"D").unwrap()
                }
            };
            let (_, dest) = doc.dereference(dest).unwrap();
            let page = dest.as_array().unwrap()[0].as_reference().unwrap();
            entries.push((decode_title(title), page));
            next = entry.get(b"Next").and_then(Object::as_reference).ok();
        }
        entries
    }

    fn decode_title(bytes: &[u8]) -> String {
        match bytes.strip_prefix(&[0xFE, 0xFF]) {
            Some(utf16) => {
                let units: Vec<u16> = utf16
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            None => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    #[test]
    fn test_merge_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut merger = LopdfMerger::new();
        for i in 1..=3 {
            let path = dir.path().join(format!("sheet-{i:02}.pdf"));
            write_one_page_pdf(&path, &format!("Sheet {i}"));
            merger.append(&path, &format!("sheet-{i:02}")).unwrap();
        }
        assert_eq!(merger.len(), 3);

        let output = dir.path().join("merged.pdf");
        assert_eq!(merger.write(&output).unwrap(), 3);
        assert!(merger.is_empty());

        let merged = Document::load(&output).unwrap();
        let pages = merged.get_pages();
        assert_eq!(pages.len(), 3);

        let entries = outline(&merged);
        let titles: Vec<&str> = entries.iter().map(|(title, _)| title.as_str()).collect();
        assert_eq!(titles, vec!["sheet-01", "sheet-02", "sheet-03"]);
        let targets: Vec<ObjectId> = entries.iter().map(|(_, page)| *page).collect();
        let in_order: Vec<ObjectId> = pages.values().copied().collect();
        assert_eq!(targets, in_order);
    }

    #[test]
    fn test_failed_append_drops_queue() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("sheet-01.pdf");
        write_one_page_pdf(&sheet, "Sheet 1");

        let mut merger = LopdfMerger::new();
        merger.append(&sheet, "sheet-01").unwrap();
        assert!(merger.append(&dir.path().join("missing.pdf"), "missing").is_err());
        assert!(merger.is_empty());

        merger.append(&sheet, "sheet-01").unwrap();
        let output = dir.path().join("merged.pdf");
        assert_eq!(merger.write(&output).unwrap(), 1);
        assert_eq!(Document::load(&output).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn test_merge_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut merger = LopdfMerger::new();
        let err = merger.write(&dir.path().join("merged.pdf")).unwrap_err();
        assert!(matches!(err, PackError::EmptyMerge { .. }));
    }

    #[test]
    fn test_append_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut merger = LopdfMerger::new();
        let err = merger
            .append(&dir.path().join("missing.pdf"), "missing")
            .unwrap_err();
        assert!(matches!(err, PackError::PdfRead { .. }));
    }
}
