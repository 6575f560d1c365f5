//! Licence watermark for delivered PDFs.
//!
//! Each page gets the licence line twice, bottom-left and top-left, drawn in
//! a separate content stream after the original page content. The original
//! content is wrapped in `q`/`Q` so its graphics state cannot leak into the
//! stamp.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

const FONT_KEY: &str = "FWmk";
const GSTATE_KEY: &str = "GSWmk";
const FONT_SIZE: i64 = 10;
const MARGIN: f32 = 20.0;
const TOP_OFFSET: f32 = 30.0;
/// US Letter, used when a page declares no MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Failed to parse PDF: {0}")]
    Parse(lopdf::Error),

    #[error("Failed to stamp PDF: {0}")]
    Stamp(#[from] lopdf::Error),

    #[error("PDF has no pages")]
    NoPages,

    #[error("Failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Stamps `text` onto every page of the PDF in `bytes`.
pub fn watermark_pdf(bytes: &[u8], text: &str) -> Result<Vec<u8>, WatermarkError> {
    let mut doc = Document::load_mem(bytes).map_err(WatermarkError::Parse)?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if pages.is_empty() {
        return Err(WatermarkError::NoPages);
    }

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
    });
    let open_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let close_id = doc.add_object(Stream::new(dictionary! {}, b"Q\n".to_vec()));

    for page_id in pages {
        stamp_page(&mut doc, page_id, font_id, open_id, close_id, text)?;
    }

    let mut out = Vec::with_capacity(bytes.len() + 4096);
    doc.save_to(&mut out)?;
    Ok(out)
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    open_id: ObjectId,
    close_id: ObjectId,
    text: &str,
) -> Result<(), WatermarkError> {
    let [llx, lly, _, ury] = media_box(doc, page_id);

    let mut resources = match inherited(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };
    add_resource(doc, &mut resources, b"Font", FONT_KEY, Object::Reference(font_id));
    add_resource(
        doc,
        &mut resources,
        b"ExtGState",
        GSTATE_KEY,
        Object::Dictionary(dictionary! {
            "Type" => "ExtGState",
            "ca" => Object::Real(0.8),
            "CA" => Object::Real(0.8),
        }),
    );

    let stamp = stamp_content(text, llx + MARGIN, lly + MARGIN, ury - TOP_OFFSET).encode()?;
    let stamp_id = doc.add_object(Stream::new(dictionary! {}, stamp));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;

    let mut contents = vec![Object::Reference(open_id)];
    match page.get(b"Contents") {
        Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
        Ok(Object::Reference(id)) => contents.push(Object::Reference(*id)),
        _ => {}
    }
    contents.push(Object::Reference(close_id));
    contents.push(Object::Reference(stamp_id));

    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

fn stamp_content(text: &str, x: f32, bottom_y: f32, top_y: f32) -> Content {
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec![Object::Name(GSTATE_KEY.as_bytes().to_vec())]),
    ];

    for y in [bottom_y, top_y] {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_KEY.as_bytes().to_vec()), FONT_SIZE.into()],
            ),
            Operation::new(
                "rg",
                vec![Object::Real(0.06), Object::Real(0.73), Object::Real(0.5)],
            ),
            Operation::new("Td", vec![Object::Real(x.into()), Object::Real(y.into())]),
            Operation::new("Tj", vec![Object::string_literal(ascii_only(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    operations.push(Operation::new("Q", vec![]));
    Content { operations }
}

/// The standard fonts only cover Latin-1; anything outside ASCII becomes `?`.
fn ascii_only(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Looks up a page attribute, following the `Parent` chain for inherited keys.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        // Guard against cyclic page trees.
        depth += 1;
        if depth > 64 {
            return None;
        }

        let node = doc.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(resolve(doc, value).clone());
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn add_resource(
    doc: &Document,
    resources: &mut Dictionary,
    category: &[u8],
    key: &str,
    value: Object,
) {
    let mut entries = match resources.get(category).map(|o| resolve(doc, o)) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    entries.set(key, value);
    resources.set(category.to_vec(), Object::Dictionary(entries));
}

fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let Some(Object::Array(values)) = inherited(doc, page_id, b"MediaBox") else {
        return DEFAULT_MEDIA_BOX;
    };
    if values.len() != 4 {
        return DEFAULT_MEDIA_BOX;
    }

    let mut out = DEFAULT_MEDIA_BOX;
    for (slot, value) in out.iter_mut().zip(values.iter()) {
        match resolve(doc, value) {
            Object::Integer(i) => *slot = *i as f32,
            Object::Real(r) => *slot = *r as f32,
            _ => return DEFAULT_MEDIA_BOX,
        }
    }
    out
}
