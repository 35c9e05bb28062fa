//! PDF assembly: append per-page blobs into one document and write it.
//!
//! [`PdfMerger`] is the job-scoped accumulator the pipeline owns for the
//! duration of one conversion. `write_to` consumes it, so the buffered
//! blobs are released on every exit path by ordinary ownership — no
//! finalizer timing to worry about.
//!
//! The merge itself is the classic lopdf recipe: start from the first
//! document, offset every object ID of each subsequent document past the
//! current maximum, remap internal references, and append the remapped
//! pages to the page tree in order.

use crate::error::OcrPdfError;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Accumulates single-page PDF blobs for one conversion job.
pub struct PdfMerger {
    blobs: Vec<Vec<u8>>,
}

impl PdfMerger {
    pub fn new() -> Self {
        Self { blobs: Vec::new() }
    }

    /// Number of pages appended so far.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Append one single-page PDF, keeping original page order.
    pub fn append(&mut self, pdf_bytes: Vec<u8>) {
        self.blobs.push(pdf_bytes);
    }

    /// Merge everything appended so far and write the result to `target`.
    ///
    /// Consumes the merger; its buffers are dropped whether or not the
    /// write succeeds.
    pub fn write_to(self, target: &Path) -> Result<(), OcrPdfError> {
        if self.blobs.is_empty() {
            return Err(OcrPdfError::MergeFailed {
                detail: "no pages to merge".into(),
            });
        }

        let merged = merge_blobs(self.blobs)?;
        std::fs::write(target, merged).map_err(|source| OcrPdfError::OutputWriteFailed {
            path: target.to_path_buf(),
            source,
        })
    }
}

impl Default for PdfMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge loaded blobs into one serialized PDF.
fn merge_blobs(blobs: Vec<Vec<u8>>) -> Result<Vec<u8>, OcrPdfError> {
    let mut loaded = Vec::with_capacity(blobs.len());
    for (i, bytes) in blobs.iter().enumerate() {
        let doc = Document::load_mem(bytes).map_err(|e| OcrPdfError::MergeFailed {
            detail: format!("failed to parse page {} PDF: {e}", i + 1),
        })?;
        loaded.push(doc);
    }

    // Single page: nothing to remap, just recompress and serialize.
    let mut dest = loaded.remove(0);
    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs = page_references(&dest);

    for source in loaded {
        let source_pages = page_references(&source);
        let id_offset = dest_max_id;

        // Remap all object IDs in the source past the current maximum.
        let mut remapped = BTreeMap::new();
        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            remapped.insert(new_id, remap_object_refs(object, id_offset));
        }
        dest.objects.extend(remapped);

        for old_ref in source_pages {
            dest_page_refs.push((old_ref.0 + id_offset, old_ref.1));
        }

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    update_page_tree(&mut dest, dest_page_refs)?;
    dest.max_id = dest_max_id;
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| OcrPdfError::MergeFailed {
            detail: format!("failed to serialize merged PDF: {e}"),
        })?;
    Ok(buffer)
}

/// All page object references of a document, in page order.
fn page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Recursively shift object references by `offset`.
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Point the destination's page tree at the combined page list.
fn update_page_tree(doc: &mut Document, page_refs: Vec<ObjectId>) -> Result<(), OcrPdfError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| OcrPdfError::MergeFailed {
            detail: format!("document has no catalog: {e}"),
        })?;

    let pages_id = doc
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .and_then(|c| c.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| OcrPdfError::MergeFailed {
            detail: format!("document has no page tree: {e}"),
        })?;

    let count = page_refs.len() as i64;
    let kids: Vec<Object> = page_refs.iter().map(|&id| Object::Reference(id)).collect();

    // Every page must point back at the root Pages node.
    for &page_ref in &page_refs {
        if let Ok(page) = doc.get_object_mut(page_ref).and_then(Object::as_dict_mut) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let pages = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| OcrPdfError::MergeFailed {
            detail: format!("page tree is not a dictionary: {e}"),
        })?;
    pages.set("Kids", Object::Array(kids));
    pages.set("Count", Object::Integer(count));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Build a minimal one-page PDF in memory.
    fn tiny_pdf(width: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn empty_merger_refuses_to_write() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let err = PdfMerger::new().write_to(&target).unwrap_err();
        assert!(matches!(err, OcrPdfError::MergeFailed { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn single_blob_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");

        let mut merger = PdfMerger::new();
        merger.append(tiny_pdf(612));
        assert_eq!(merger.len(), 1);
        merger.write_to(&target).expect("write single page");

        let reread = Document::load(&target).expect("reload output");
        assert_eq!(reread.get_pages().len(), 1);
    }

    #[test]
    fn merge_preserves_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");

        let mut merger = PdfMerger::new();
        // distinct MediaBox widths let us check order after the merge
        merger.append(tiny_pdf(100));
        merger.append(tiny_pdf(200));
        merger.append(tiny_pdf(300));
        merger.write_to(&target).expect("write merged");

        let reread = Document::load(&target).expect("reload output");
        let pages = reread.get_pages();
        assert_eq!(pages.len(), 3);

        let widths: Vec<i64> = pages
            .values()
            .map(|&id| {
                let media_box = reread
                    .get_object(id)
                    .and_then(Object::as_dict)
                    .and_then(|d| d.get(b"MediaBox"))
                    .and_then(Object::as_array)
                    .expect("MediaBox");
                media_box[2].as_i64().expect("width")
            })
            .collect();
        assert_eq!(widths, vec![100, 200, 300]);
    }

    #[test]
    fn garbage_blob_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");

        let mut merger = PdfMerger::new();
        merger.append(b"not a pdf at all".to_vec());
        let err = merger.write_to(&target).unwrap_err();
        assert!(matches!(err, OcrPdfError::MergeFailed { .. }));
        assert!(!target.exists());
    }
}
