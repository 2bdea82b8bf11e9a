use pixy::encode::{EncodeOptions, Fill, Operation, PixyError, encode_path, encode_svg};
use pixy::{PathFormatOptions, Rgb, format_path};

#[test]
fn path_rewriting_is_reexported() {
    let opts = PathFormatOptions {
        absolute: false,
        ..Default::default()
    };
    assert_eq!(format_path("M1 1 L2 2", &opts).unwrap(), "m1 1l1 1");
}

#[test]
fn encode_path_reports_operations() {
    let ops = encode_path("M0 0 L1 0 Z M0 0 L0 1", Fill::opaque(Rgb::WHITE)).unwrap();
    // run, compose at Z, compose at the second M, run, closing compose
    assert_eq!(ops.len(), 5);
    assert!(matches!(ops[1], Operation::Compose(c) if !c.previous));
    assert!(matches!(ops[2], Operation::Compose(c) if c.previous));
    assert!(matches!(ops[3], Operation::VectorRun(_)));
    assert!(matches!(ops[4], Operation::Compose(c) if c.previous));
}

#[test]
fn errors_from_both_layers_are_wrapped() {
    assert!(matches!(
        encode_path("M0 0 Q1", Fill::opaque(Rgb::BLACK)),
        Err(PixyError::Path(_))
    ));
    assert!(matches!(
        encode_svg("<html/>", &EncodeOptions::default()),
        Err(PixyError::Encode(_))
    ));
}
