use std::io::Write;

use chrono::{DateTime, Local};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::layout::{
    Face, TextRun, LOGO_HEIGHT, LOGO_WIDTH, LOGO_X, LOGO_Y, PAGE_HEIGHT, PAGE_WIDTH, TITLE,
};
use super::logo::LogoImage;
use super::RenderError;

const LOGO_NAME: &str = "Logo";

fn real(value: f64) -> Object {
    Object::from(value)
}

fn font_resource(face: Face) -> &'static str {
    match face {
        Face::Regular => "F1",
        Face::Bold => "F2",
        Face::Oblique => "F3",
    }
}

fn base_font(face: Face) -> &'static str {
    match face {
        Face::Regular => "Helvetica",
        Face::Bold => "Helvetica-Bold",
        Face::Oblique => "Helvetica-Oblique",
    }
}

/// Encode text for a WinAnsi standard font
///
/// Latin-1 outside the C1 controls passes through. The punctuation WinAnsi
/// keeps in 0x80..=0x9F is mapped to its slot; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        '\u{0080}'..='\u{009f}' => b'?',
        _ => u8::try_from(u32::from(c)).unwrap_or(b'?'),
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(RenderError::Image)?;
    encoder.finish().map_err(RenderError::Image)
}

fn add_logo(doc: &mut Document, logo: &LogoImage) -> Result<ObjectId, RenderError> {
    let mut image = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => logo.width as i64,
        "Height" => logo.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if logo.has_transparency() {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => logo.width as i64,
                "Height" => logo.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&logo.alpha)?,
        ));
        image.set("SMask", Object::Reference(smask_id));
    }

    Ok(doc.add_object(Stream::new(image, deflate(&logo.rgb)?)))
}

fn logo_operations() -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                real(LOGO_WIDTH),
                real(0.0),
                real(0.0),
                real(LOGO_HEIGHT),
                real(LOGO_X),
                real(LOGO_Y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(LOGO_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn text_operations(run: &TextRun) -> [Operation; 5] {
    [
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource(run.face).as_bytes().to_vec()),
                real(run.size),
            ],
        ),
        Operation::new("Td", vec![real(run.x), real(run.y)]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(&run.text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Build the one-page A4 document and serialize it
pub fn encode(
    runs: &[TextRun],
    logo: Option<&LogoImage>,
    created: DateTime<Local>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in [Face::Regular, Face::Bold, Face::Oblique] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font(face),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font_resource(face), Object::Reference(font_id));
    }

    let mut resources = dictionary! {
        "Font" => fonts,
    };

    let mut operations = Vec::with_capacity(runs.len() * 5 + 4);
    // title first, then the logo, then everything below it
    let mut runs = runs.iter();
    if let Some(title) = runs.next() {
        operations.extend(text_operations(title));
    }
    if let Some(logo) = logo {
        let logo_id = add_logo(&mut doc, logo)?;
        resources.set(
            "XObject",
            dictionary! {
                LOGO_NAME => Object::Reference(logo_id),
            },
        );
        operations.extend(logo_operations());
    }
    for run in runs {
        operations.extend(text_operations(run));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let resources_id = doc.add_object(resources);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(TITLE),
        "Producer" => Object::string_literal(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(created.format("D:%Y%m%d%H%M%S").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(RenderError::Serialize)?;
    Ok(bytes)
}
