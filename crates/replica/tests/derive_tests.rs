use pretty_assertions::assert_eq;
use replica::{on_change, partial, Node, RecordNode, Shape};

#[derive(Debug, Clone, Default, PartialEq, Node)]
struct Renamed {
    #[replica(rename = "Name")]
    name: String,
    #[replica(skip)]
    cache: Vec<u8>,
    port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
struct Pair(String, u32);

#[derive(Debug, Clone, Default, PartialEq, Node)]
struct Wrapper<T>
where
    T: Node + Clone + PartialEq + Default,
{
    inner: T,
    label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
struct Keywords {
    r#type: String,
}

#[test]
fn test_fields_exposed_under_selector_names() {
    let value = Renamed::default();
    assert!(value.field("Name").is_some());
    assert!(value.field("name").is_none());
    assert!(value.field("port").is_some());
    assert!(matches!(value.shape(), Shape::Record(_)));
}

#[test]
fn test_rename_is_used_by_selectors() {
    let src = Renamed {
        name: "http".into(),
        cache: vec![1, 2, 3],
        port: 80,
    };
    let mut dst = Renamed::default();

    assert!(!partial(&mut dst, &src, &["name"]).unwrap());
    assert!(partial(&mut dst, &src, &["Name"]).unwrap());
    assert_eq!(dst.name, "http");
    assert_eq!(dst.port, 0);
}

#[test]
fn test_skipped_field_is_invisible() {
    let src = Renamed {
        cache: vec![9],
        ..Renamed::default()
    };
    let mut dst = Renamed::default();

    assert!(src.field("cache").is_none());
    assert!(!on_change(&mut dst, &src, &["cache"]).unwrap());
    assert!(dst.cache.is_empty());
}

#[test]
fn test_tuple_struct_fields_by_index() {
    let src = Pair("left".into(), 7);
    let mut dst = Pair::default();

    assert!(src.field("1").is_some());
    assert!(src.field("2").is_none());
    assert!(partial(&mut dst, &src, &["1"]).unwrap());
    assert_eq!(dst, Pair(String::new(), 7));
}

#[test]
fn test_generic_struct() {
    let src = Wrapper {
        inner: Pair("a".into(), 2),
        label: "outer".into(),
    };
    let mut dst = Wrapper::<Pair>::default();

    assert!(on_change(&mut dst, &src, &["inner.0"]).unwrap());
    assert_eq!(dst.inner.0, "a");
    assert!(dst.label.is_empty());
}

#[test]
fn test_raw_identifier_selector() {
    let src = Keywords {
        r#type: "ClusterIP".into(),
    };
    let mut dst = Keywords::default();

    assert!(src.field("type").is_some());
    assert!(src.field("r#type").is_none());
    assert!(partial(&mut dst, &src, &["type"]).unwrap());
    assert_eq!(dst, src);
}

#[test]
fn test_field_mut_writes_through() {
    let mut value = Renamed::default();
    let port = value.field_mut("port").unwrap();
    assert!(port.assign_from(&443_u16));
    assert_eq!(value.port, 443);
}
