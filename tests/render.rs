use std::fs;
use std::path::Path;

use chrono::Local;
use image::{Rgb, RgbImage};
use lopdf::content::Content;
use lopdf::Document;

use hvac_invoice::config::Config;
use hvac_invoice::invoice_gen::{render, InvoiceGenerator, LogoStatus, PrintStatus, RenderError};
use hvac_invoice::ledger::Ledger;
use hvac_invoice::models::{CustomerRecord, RawLineItem, Unit};

fn customer() -> CustomerRecord {
    CustomerRecord {
        name: "Northside Mechanical".to_string(),
        address: "88 Harbour St".to_string(),
        contact: "555-0142".to_string(),
        email: "accounts@northside.example".to_string(),
    }
}

fn raw(size: &str, quantity: &str, rate: &str, count: &str) -> RawLineItem {
    RawLineItem {
        size: size.to_string(),
        description: "Galvanised duct".to_string(),
        quantity: quantity.to_string(),
        rate: rate.to_string(),
        count: count.to_string(),
    }
}

fn config_in(dir: &Path) -> Config {
    Config {
        output_path: dir.join("invoice.pdf"),
        logo_path: dir.join("images.png"),
        print_after_render: false,
        ..Config::default()
    }
}

/// Every string drawn with `Tj`, in content-stream order
fn drawn_text(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).expect("valid pdf");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "invoice is a single page");
    let page_id = *pages.values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .map(|op| String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned())
        .collect()
}

fn draws_image(pdf: &[u8]) -> bool {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content.operations.iter().any(|op| op.operator == "Do")
}

#[test]
fn two_items_total_forty_dollars() {
    let mut ledger = Ledger::new();
    ledger.append(&raw("12in", "2.0", "5.0", "3"), Unit::Meters).unwrap();
    ledger.append(&raw("8in", "1.0", "10.0", "1"), Unit::Meters).unwrap();
    assert_eq!(ledger.total(), 40.0);

    let pdf = render(&customer(), ledger.items(), ledger.total(), None, Local::now()).unwrap();
    let text = drawn_text(&pdf);

    assert!(text.contains(&"Total Amount: $40.00".to_string()), "{text:?}");
    assert!(text.contains(&"$30.00".to_string()));
    assert!(text.contains(&"$10.00".to_string()));
    assert!(text.contains(&"12in".to_string()));
}

#[test]
fn empty_ledger_renders_headers_and_zero_total() {
    let ledger = Ledger::new();
    let pdf = render(&customer(), ledger.items(), ledger.total(), None, Local::now()).unwrap();

    assert_eq!(
        drawn_text(&pdf),
        vec![
            "HVAC Ducting Invoice",
            "Customer Name: Northside Mechanical",
            "Address: 88 Harbour St",
            "Contact: 555-0142",
            "Email: accounts@northside.example",
            "S.No",
            "Size",
            "Description",
            "Sq.Ft",
            "Rate",
            "Quantity",
            "Amount",
            "Total Amount: $0.00",
            "Thank you for your business!",
        ]
    );
}

#[test]
fn rows_show_converted_quantities() {
    let mut ledger = Ledger::new();
    ledger.append(&raw("6in", "250", "4", "2"), Unit::Centimeters).unwrap();

    let pdf = render(&customer(), ledger.items(), ledger.total(), None, Local::now()).unwrap();
    let text = drawn_text(&pdf);

    let row_start = text.iter().position(|t| t == "1").unwrap();
    assert_eq!(
        &text[row_start..row_start + 7],
        &["1", "6in", "Galvanised duct", "2.50", "4.00", "2", "$20.00"]
    );
}

#[test]
fn missing_logo_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let generator = InvoiceGenerator::new(&config);

    let outcome = generator.generate_invoice(&customer(), &Ledger::new()).unwrap();

    assert_eq!(outcome.path, config.output_path);
    assert_eq!(outcome.logo, LogoStatus::Missing);
    assert_eq!(outcome.print, PrintStatus::Skipped);
    let pdf = fs::read(&config.output_path).unwrap();
    assert!(!draws_image(&pdf));
}

#[test]
fn logo_is_embedded_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    RgbImage::from_pixel(8, 5, Rgb([20, 60, 140])).save(&config.logo_path).unwrap();

    let outcome = InvoiceGenerator::new(&config)
        .generate_invoice(&customer(), &Ledger::new())
        .unwrap();

    assert_eq!(outcome.logo, LogoStatus::Embedded);
    let pdf = fs::read(&config.output_path).unwrap();
    assert!(draws_image(&pdf));
    assert_eq!(drawn_text(&pdf)[0], "HVAC Ducting Invoice");
}

#[test]
fn broken_logo_is_reported_but_render_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.logo_path, b"this is not an image at all").unwrap();

    let outcome = InvoiceGenerator::new(&config)
        .generate_invoice(&customer(), &Ledger::new())
        .unwrap();

    assert!(matches!(outcome.logo, LogoStatus::Failed(_)), "{:?}", outcome.logo);
    assert!(config.output_path.exists());
}

#[test]
fn second_render_fully_replaces_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let generator = InvoiceGenerator::new(&config);

    let mut ledger = Ledger::new();
    for _ in 0..6 {
        ledger.append(&raw("10in", "1", "7", "1"), Unit::Meters).unwrap();
    }
    generator.generate_invoice(&customer(), &ledger).unwrap();
    let first = drawn_text(&fs::read(&config.output_path).unwrap());
    assert!(first.contains(&"Total Amount: $42.00".to_string()));

    let other = CustomerRecord {
        name: "Second Customer".to_string(),
        ..CustomerRecord::default()
    };
    generator.generate_invoice(&other, &Ledger::new()).unwrap();
    let second = drawn_text(&fs::read(&config.output_path).unwrap());

    assert!(second.contains(&"Customer Name: Second Customer".to_string()));
    assert!(second.contains(&"Total Amount: $0.00".to_string()));
    assert!(!second.iter().any(|t| t.contains("Northside") || t == "10in" || t.contains("42.00")));
}

#[test]
fn unwritable_output_path_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_path: dir.path().join("no-such-dir").join("invoice.pdf"),
        ..config_in(dir.path())
    };

    let err = InvoiceGenerator::new(&config)
        .generate_invoice(&customer(), &Ledger::new())
        .unwrap_err();

    match err {
        RenderError::Write { path, .. } => assert_eq!(path, config.output_path),
        other => panic!("expected a write error, got {other:?}"),
    }
}

#[test]
fn document_metadata_names_the_invoice() {
    let pdf = render(&customer(), &[], 0.0, None, Local::now()).unwrap();
    let doc = Document::load_mem(&pdf).unwrap();
    let info_ref = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_ref).unwrap();
    assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"HVAC Ducting Invoice");

    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box.len(), 4);
}
