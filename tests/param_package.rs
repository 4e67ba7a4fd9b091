use padbridge::param_package::{ParamPackage, EMPTY_PACKAGE};
use proptest::collection::btree_map;
use proptest::prelude::*;

#[test]
fn parses_keyboard_binding() {
    let params = ParamPackage::parse("engine:keyboard,code:23");
    assert_eq!(params.get_str("engine", ""), "keyboard");
    assert_eq!(params.get("code", 0), 23);
}

#[test]
fn empty_sentinel_both_ways() {
    assert_eq!(ParamPackage::new().serialize(), EMPTY_PACKAGE);
    assert!(ParamPackage::parse(EMPTY_PACKAGE).is_empty());
}

#[test]
fn malformed_pairs_are_skipped() {
    let params = ParamPackage::parse("engine:gamepad,broken,port:2,a:b:c");
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("port", 0), 2);
    assert!(!params.has("broken"));
}

proptest! {
    #[test]
    fn serialize_then_parse_is_identity(
        entries in btree_map("[a-z_$,:]{1,8}", "[a-zA-Z0-9$,: ]{0,12}", 0..8)
    ) {
        let original: ParamPackage = entries
            .into_iter()
            .collect();
        let decoded = ParamPackage::parse(&original.serialize());
        prop_assert_eq!(decoded, original);
    }
}
