use infill_core::{FieldDef, FieldFlags, FieldPath, RecordDef, ScalarType, TypeDef, Value};
use infill_reflect::{FieldKind, SchemaError, describe, describe_def};
use infill_testhelpers::{eyre, setup};

use crate::fixtures::Contact;

fn record(type_name: &'static str, fields: &'static [FieldDef]) -> &'static RecordDef {
    Box::leak(Box::new(
        RecordDef::builder().type_name(type_name).fields(fields).build(),
    ))
}

#[test]
fn describes_typed_records() -> eyre::Result<()> {
    setup();
    let schema = describe::<Contact>()?;

    let address = schema.field("address").expect("address is declared");
    assert_eq!(address.kind, FieldKind::Record);
    assert!(address.required);
    let zip = address
        .nested()
        .and_then(|nested| nested.field("zipCode"))
        .expect("zip code answers to its alias");
    assert_eq!(zip.name, "zip_code");
    assert!(zip.nullable && !zip.required);

    let previous = schema.field("previous").expect("previous is declared");
    assert_eq!(previous.kind, FieldKind::ListOfRecord);
    assert!(!previous.required);
    assert!(schema.field("phone").is_some_and(|phone| phone.sensitive));

    insta::assert_snapshot!(
        schema.paths().iter().map(FieldPath::to_string).collect::<Vec<_>>().join(" "),
        @"address address.street address.city address.zip_code previous previous.street previous.city previous.zip_code phone"
    );
    Ok(())
}

#[test]
fn rejects_types_it_cannot_fill() {
    setup();
    static MAP: &[FieldDef] = &[FieldDef::builder()
        .name("labels")
        .ty(TypeDef::Map(&TypeDef::STRING))
        .build()];
    static UNION: &[FieldDef] = &[FieldDef::builder()
        .name("id")
        .ty(TypeDef::Union(&[TypeDef::INT, TypeDef::STRING]))
        .build()];
    static NESTED_LIST: &[FieldDef] = &[FieldDef::builder()
        .name("grid")
        .ty(TypeDef::List(&TypeDef::List(&TypeDef::INT)))
        .build()];
    static OPTION_OPTION: &[FieldDef] = &[FieldDef::builder()
        .name("maybe")
        .ty(TypeDef::Option(&TypeDef::Option(&TypeDef::INT)))
        .build()];

    for fields in [MAP, UNION, NESTED_LIST, OPTION_OPTION] {
        let err = describe_def(record("Bad", fields)).unwrap_err();
        assert!(
            matches!(err, SchemaError::UnsupportedType { record: "Bad", .. }),
            "{err:?}"
        );
    }
}

#[test]
fn rejects_colliding_keys() {
    setup();
    static FIELDS: &[FieldDef] = &[
        FieldDef::builder().name("zip").ty(TypeDef::STRING).build(),
        FieldDef::builder()
            .name("zip_code")
            .aliases(&["zip"])
            .ty(TypeDef::STRING)
            .build(),
    ];
    assert_eq!(
        describe_def(record("Address", FIELDS)),
        Err(SchemaError::DuplicateKey {
            record: "Address",
            key: "zip",
        })
    );
}

static NODE_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("label").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("children")
        .ty(TypeDef::List(&TypeDef::Record(node)))
        .build(),
];
static NODE: RecordDef = RecordDef::builder()
    .type_name("Node")
    .fields(NODE_FIELDS)
    .build();
fn node() -> &'static RecordDef {
    &NODE
}

#[test]
fn rejects_recursive_records() {
    setup();
    assert_eq!(
        describe_def(&NODE),
        Err(SchemaError::RecursiveRecord {
            cycle: vec!["Node", "Node"],
        })
    );
}

#[test]
fn rejects_bad_field_definitions() {
    setup();
    static EMPTY_ENUM: &[FieldDef] = &[FieldDef::builder()
        .name("state")
        .ty(TypeDef::Scalar(ScalarType::Enum(&[])))
        .build()];
    assert!(matches!(
        describe_def(record("Job", EMPTY_ENUM)),
        Err(SchemaError::EmptyEnum { field: "state", .. })
    ));

    static NON_EMPTY_SCALAR: &[FieldDef] = &[FieldDef::builder()
        .name("name")
        .ty(TypeDef::STRING)
        .flags(FieldFlags::NON_EMPTY)
        .build()];
    assert!(matches!(
        describe_def(record("Job", NON_EMPTY_SCALAR)),
        Err(SchemaError::InvalidFlags { field: "name", .. })
    ));

    static BAD_DEFAULT: &[FieldDef] = &[FieldDef::builder()
        .name("retries")
        .ty(TypeDef::INT)
        .default(|| Value::from("three"))
        .build()];
    match describe_def(record("Job", BAD_DEFAULT)) {
        Err(SchemaError::InvalidDefault {
            field, violations, ..
        }) => {
            assert_eq!(field, "retries");
            assert_eq!(violations.iter().count(), 1);
        }
        other => panic!("expected an invalid default, got {other:?}"),
    }
}
