use infill_core::{FieldPath, Value, map};
use infill_reflect::{Builder, FieldStatus, FinalizeError, RejectReason};
use infill_testhelpers::{eyre, setup};

use crate::fixtures::{Address, Contact, Person, Product};

fn path(s: &str) -> FieldPath {
    s.parse().unwrap()
}

#[test]
fn defaults_complete_a_record() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Person>::new()?;

    let report = builder.apply(&map! { "name" => "Ann" })?;
    assert_eq!(report.accepted().iter().collect::<Vec<_>>(), [&path("name")]);
    assert!(builder.missing_required().is_empty());
    assert_eq!(builder.finalize_value()?, map! { "name" => "Ann", "age" => 0 });
    assert_eq!(
        builder.finalize()?,
        Person {
            name: "Ann".into(),
            age: 0
        }
    );
    Ok(())
}

#[test]
fn misspelled_keys_are_reported_not_applied() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Person>::new()?;

    let report = builder.apply(&map! { "nme" => "Ann" })?;
    assert!(report.accepted().is_empty());
    assert!(report.unknown_keys().contains(&path("nme")));
    assert_eq!(
        builder.missing_required().into_iter().collect::<Vec<_>>(),
        [path("name")]
    );

    match builder.finalize() {
        Err(FinalizeError::Incomplete(err)) => {
            assert_eq!(err.record, "Person");
            assert_eq!(err.missing.into_iter().collect::<Vec<_>>(), [path("name")]);
        }
        other => panic!("expected an incomplete record, got {other:?}"),
    }
    Ok(())
}

#[test]
fn nested_records_fill_over_several_calls() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Contact>::new()?;

    builder.apply(&map! { "address" => map! { "street" => "Main" } })?;
    assert_eq!(
        builder.missing_required().into_iter().collect::<Vec<_>>(),
        [path("address.city")]
    );

    builder.apply(&map! { "address" => map! { "city" => "Metropolis" } })?;
    assert!(builder.missing_required().is_empty());
    assert_eq!(
        builder.finalize_value()?,
        map! {
            "address" => map! { "street" => "Main", "city" => "Metropolis" },
            "previous" => Value::List(vec![]),
            "phone" => "unlisted",
        }
    );
    assert_eq!(
        builder.finalize()?.address,
        Address {
            street: "Main".into(),
            city: "Metropolis".into(),
            zip_code: None,
        }
    );
    Ok(())
}

#[test]
fn mistyped_values_leave_the_record_untouched() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;
    let before = builder.value().clone();

    let report = builder.apply(&map! { "price" => "abc" })?;
    assert_eq!(
        report.rejected().get(&path("price")),
        Some(&RejectReason::TypeMismatch {
            expected: "float".into(),
            found: "string",
        })
    );
    assert_eq!(builder.value(), &before);
    assert!(builder.missing_required().contains(&path("price")));
    assert_eq!(builder.status_of(&path("price"))?, FieldStatus::Unset);
    Ok(())
}

#[test]
fn numbers_coerce_only_without_loss() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;

    let report = builder.apply(&map! { "sku" => "P-1", "price" => 3, "stock" => 2.5 })?;
    assert_eq!(report.rejected().len(), 1);
    assert!(report.rejected().contains_key(&path("stock")));
    assert_eq!(builder.get(&path("price")), Some(&Value::Float(3.0)));

    builder.apply(&map! { "stock" => 7.0 })?;
    assert_eq!(builder.get(&path("stock")), Some(&Value::Int(7)));
    assert_eq!(builder.finalize()?.stock, 7);
    Ok(())
}

#[test]
fn aliases_are_reported_under_canonical_names() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Contact>::new()?;

    let report = builder.apply(&map! {
        "address" => map! { "street" => "Main", "city" => "Metropolis", "zipCode" => "10001" },
    })?;
    assert!(report.accepted().contains(&path("address.zip_code")));
    assert_eq!(
        builder.finalize()?.address.zip_code.as_deref(),
        Some("10001")
    );
    Ok(())
}

#[test]
fn enum_fields_take_declared_variants() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;

    let report = builder.apply(&map! { "status" => "sold-out" })?;
    assert_eq!(
        report.rejected().get(&path("status")).map(RejectReason::as_str),
        Some("not_a_variant")
    );
    assert_eq!(builder.get(&path("status")), Some(&Value::from("draft")));

    builder.apply(&map! { "status" => "listed" })?;
    assert_eq!(builder.status_of(&path("status"))?, FieldStatus::FilledExplicit);
    Ok(())
}

#[test]
fn lists_of_records_track_each_element() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Contact>::new()?;

    builder.apply(&map! {
        "address" => map! { "street" => "Main", "city" => "Metropolis" },
        "previous" => vec![map! { "street" => "Elm" }],
    })?;
    assert_eq!(
        builder.missing_required().into_iter().collect::<Vec<_>>(),
        [path("previous[0].city")]
    );

    builder.apply(&map! { "previous" => vec![map! { "city" => "Gotham" }] })?;
    let contact = builder.finalize()?;
    assert_eq!(
        contact.previous,
        [Address {
            street: "Elm".into(),
            city: "Gotham".into(),
            zip_code: None,
        }]
    );
    Ok(())
}

#[test]
fn conversion_failures_surface_at_finalize() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;
    builder.apply(&map! { "sku" => "P-1", "price" => 1.5, "stock" => 300 })?;

    // an int field, but the record stores it in a u8
    assert!(builder.finalize_value().is_ok());
    match builder.finalize() {
        Err(FinalizeError::Convert(err)) => assert_eq!(err.path, path("stock")),
        other => panic!("expected a conversion error, got {other:?}"),
    }
    Ok(())
}
