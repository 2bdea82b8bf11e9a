use pixy_encode::{DoctypePolicy, EncodeOptions, Error, Operation, convert_svg};

fn ops(svg: &str) -> Vec<String> {
    convert_svg(svg, &EncodeOptions::default())
        .unwrap()
        .operations()
        .iter()
        .map(|op| match op {
            Operation::VectorRun(_) => "R".to_string(),
            Operation::Compose(c) if c.previous => "P".to_string(),
            Operation::Compose(_) => "C".to_string(),
            Operation::Group { id } => format!("G{id}"),
            Operation::Detail { level } => format!("D{level}"),
            Operation::End => "E".to_string(),
            other => panic!("unexpected {other:?}"),
        })
        .collect()
}

const INKSCAPE: &str = r#"xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape""#;

#[test]
fn structural_labels_drive_markers() {
    let svg = format!(
        r#"<svg {INKSCAPE} width="10" height="10">
            <g inkscape:label="choice_2_0"><path d="M0 0 L1 1"/></g>
            <g inkscape:label="detail_1"><path d="M0 0 L1 1"/></g>
            <g inkscape:label="detail_0"><path d="M0 0 L1 1"/></g>
            <g inkscape:label="Layer 1"><path d="M0 0 L1 1"/></g>
        </svg>"#
    );
    assert_eq!(
        ops(&svg),
        // the closing G0 is replaced by the detail marker that follows it
        vec!["G2", "R", "C", "D1", "R", "P", "R", "P", "R", "P", "E"]
    );
}

#[test]
fn empty_choice_collapses_to_its_closing_group() {
    let svg = format!(
        r#"<svg {INKSCAPE} width="10" height="10">
            <g inkscape:label="detail_3"/>
            <g inkscape:label="choice_5_1"/>
        </svg>"#
    );
    assert_eq!(ops(&svg), vec!["E"]);
}

#[test]
fn trailing_empty_detail_survives_the_end_marker() {
    let svg = format!(
        r#"<svg {INKSCAPE} width="10" height="10">
            <path d="M0 0 L1 1"/>
            <g inkscape:label="detail_2"/>
        </svg>"#
    );
    assert_eq!(ops(&svg), vec!["R", "C", "D2", "E"]);
}

#[test]
fn choice_resets_previous_fill() {
    let svg = format!(
        r#"<svg {INKSCAPE} width="10" height="10">
            <path d="M0 0 L1 1"/>
            <g inkscape:label="choice_1_0"><path d="M0 0 L1 1"/></g>
        </svg>"#
    );
    assert_eq!(ops(&svg), vec!["R", "C", "G1", "R", "C", "G0", "E"]);
}

#[test]
fn unknown_structural_label_fails() {
    let svg = format!(
        r#"<svg {INKSCAPE} width="10" height="10"><g inkscape:label="choice_16_0"/></svg>"#
    );
    let err = convert_svg(&svg, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownStructuralLabel { ref label } if label == "choice_16_0"));
}

#[test]
fn doctype_policy() {
    let svg = r#"<!DOCTYPE html><svg width="1" height="1"/>"#;
    let err = convert_svg(svg, &EncodeOptions::strict()).unwrap_err();
    assert!(matches!(err, Error::InvalidDocumentType { ref doctype } if doctype == "html"));

    let lenient = EncodeOptions::lenient();
    assert_eq!(lenient.doctype, DoctypePolicy::Lenient);
    assert!(convert_svg(svg, &lenient).is_ok());

    let svg_doctype = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd"><svg width="1" height="1"/>"#;
    assert!(convert_svg(svg_doctype, &EncodeOptions::strict()).is_ok());
}

#[test]
fn doctype_inside_comments_or_body_is_ignored() {
    let commented = r#"<!-- <!DOCTYPE html> --><svg width="1" height="1"/>"#;
    assert!(convert_svg(commented, &EncodeOptions::strict()).is_ok());

    let quoted = r#"<svg width="1" height="1"><desc>&lt;!DOCTYPE html&gt;</desc><!-- <!DOCTYPE html> --></svg>"#;
    assert!(convert_svg(quoted, &EncodeOptions::strict()).is_ok());
}

#[test]
fn root_must_be_svg() {
    for options in [EncodeOptions::strict(), EncodeOptions::lenient()] {
        let err = convert_svg("<html/>", &options).unwrap_err();
        assert!(matches!(err, Error::InvalidDocumentType { .. }));
    }
}

#[test]
fn missing_canvas_size_fails() {
    let err = convert_svg(r#"<svg height="1"/>"#, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingAttribute {
            attribute: "width",
            ..
        }
    ));
}

#[test]
fn path_errors_abort_the_conversion() {
    for d in ["M1,2,3", "M0 0 A5 5 0 0 1 10 10", "M0 0 L1"] {
        let svg = format!(r#"<svg width="1" height="1"><path d="{d}"/></svg>"#);
        let err = convert_svg(&svg, &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Core(_)), "{d}: {err}");
    }
}

#[test]
fn malformed_xml_is_reported() {
    let err = convert_svg("<svg width='1' height='1'>", &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Xml(_)));
}

#[test]
fn style_cascade_reaches_paths() {
    let drawing = convert_svg(
        r#"<svg width="10" height="10" style="fill:#123456;opacity:50%">
            <g fill-opacity="0.5"><path d="M0 0 L1 1"/></g>
        </svg>"#,
        &EncodeOptions::default(),
    )
    .unwrap();
    let compose = drawing
        .operations()
        .iter()
        .find_map(|op| match op {
            Operation::Compose(c) => Some(*c),
            _ => None,
        })
        .unwrap();
    assert_eq!(compose.fill.alpha, 64);
    assert_eq!(compose.fill.rgb, pixy_core::Rgb::new(0x12, 0x34, 0x56));
}
