use std::collections::BTreeSet;
use std::sync::Arc;

use infill_core::{FieldPath, Value, map};
use infill_reflect::{Builder, FieldStatus, Partial, describe};
use infill_testhelpers::{eyre, setup};

use crate::fixtures::{Contact, Product, Shipment};

fn filled(partial: &Partial) -> BTreeSet<FieldPath> {
    partial.tracker().filled_paths().cloned().collect()
}

fn inputs() -> Vec<Value> {
    vec![
        map! { "sku" => "P-1", "tags" => vec!["a", "b"] },
        map! { "price" => "free", "colour" => "red" },
        map! { "price" => 9.5, "status" => "listed" },
        map! { "tags" => vec!["c"], "stock" => 4 },
    ]
}

/// Inputs aimed at a nested record and a list of records, whose elements have defaults
fn nested_inputs() -> Vec<Value> {
    vec![
        map! { "carrier" => "DHL", "parcel" => map! { "label" => "A", "wieght" => 2 } },
        map! { "parcels" => vec![map! { "label" => "B" }, map! { "weight" => 3 }] },
        map! { "parcel" => map! { "weight" => 5 }, "parcels" => vec![map! { "label" => 4 }] },
    ]
}

/// Inputs in which nothing under a nested record or list element is accepted
fn nested_misses() -> Vec<Value> {
    vec![
        map! { "parcel" => map! { "lable" => "A" } },
        map! { "parcel" => map! { "label" => 5, "weight" => "heavy" } },
        map! { "parcels" => vec![map! { "bogus" => 1 }] },
        map! { "parcels" => vec![map! { "label" => 7 }, map! { "bogus" => 2 }] },
    ]
}

#[test]
fn applying_twice_is_applying_once() -> eyre::Result<()> {
    setup();
    let flat = inputs()
        .into_iter()
        .map(|input| (input, Builder::<Product>::new().map(Builder::into_partial)));
    let nested = nested_inputs()
        .into_iter()
        .map(|input| (input, Builder::<Shipment>::new().map(Builder::into_partial)));
    for (input, fresh) in flat.chain(nested) {
        let mut once = fresh?;
        once.apply(&input)?;
        let mut twice = once.clone();
        twice.apply(&input)?;

        assert_eq!(once.value(), twice.value(), "{input}");
        assert_eq!(once.tracker(), twice.tracker(), "{input}");
    }
    Ok(())
}

#[test]
fn filled_paths_stay_filled() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;
    let mut previous = filled(&builder);

    for input in inputs() {
        let report = builder.apply(&input)?;
        assert!(report.cleared().is_empty());
        let now = filled(&builder);
        assert!(now.is_superset(&previous), "{previous:?} not in {now:?}");
        previous = now;
    }
    Ok(())
}

#[test]
fn explicit_values_are_never_demoted() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;
    builder.apply(&map! { "status" => "listed" })?;
    let status: FieldPath = "status".parse()?;

    for input in inputs() {
        builder.apply(&input)?;
        assert_eq!(builder.status_of(&status)?, FieldStatus::FilledExplicit);
    }
    Ok(())
}

#[test]
fn rejected_and_unknown_keys_change_nothing() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;
    builder.apply(&map! { "sku" => "P-1" })?;
    let value = builder.value().clone();
    let tracker = builder.tracker().clone();

    let report = builder.apply(&map! {
        "price" => vec![1],
        "status" => 3,
        "tags" => Value::List(vec![]),
        "weight" => 12,
    })?;
    assert_eq!(report.rejected().len(), 3);
    assert_eq!(report.unknown_keys().len(), 1);
    assert!(report.accepted().is_empty());
    assert_eq!(builder.value(), &value);
    assert_eq!(builder.tracker(), &tracker);
    Ok(())
}

#[test]
fn nested_misses_change_nothing() -> eyre::Result<()> {
    setup();
    let fresh = Builder::<Shipment>::new()?;
    let mut started = Builder::<Shipment>::new()?;
    started.apply(&map! {
        "parcel" => map! { "label" => "A" },
        "parcels" => vec![map! { "label" => "B" }],
    })?;

    for builder in [fresh, started] {
        for input in nested_misses() {
            let mut after = builder.clone();
            let report = after.apply(&input)?;
            assert!(report.accepted().is_empty(), "{input}");
            assert!(report.defaults_applied().is_empty(), "{input}");
            assert_eq!(after.value(), builder.value(), "{input}");
            assert_eq!(after.tracker(), builder.tracker(), "{input}");
            assert_eq!(after.state(), builder.state(), "{input}");
        }
    }
    Ok(())
}

#[test]
fn builders_share_the_schema_but_nothing_else() -> eyre::Result<()> {
    setup();
    let mut first = Builder::<Contact>::new()?;
    let second = Builder::<Contact>::new()?;
    assert!(Arc::ptr_eq(first.schema(), second.schema()));
    assert!(Arc::ptr_eq(first.schema(), &describe::<Contact>()?));

    first.apply(&map! { "previous" => vec![map! { "street" => "Elm" }] })?;
    assert_eq!(second.get(&"previous".parse()?), Some(&Value::List(vec![])));
    assert_eq!(second.tracker().element_count(&"previous".parse()?), 0);
    Ok(())
}

#[test]
fn finalized_values_pass_full_validation() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Contact>::new()?;
    builder.apply(&map! {
        "address" => map! { "street" => "Main", "city" => "Metropolis", "zipCode" => Value::Null },
        "previous" => vec![map! { "street" => "Elm", "city" => "Gotham" }],
    })?;

    let value = builder.finalize_value()?;
    builder.schema().validate(&value)?;
    assert_eq!(builder.finalize_value()?, value);
    Ok(())
}

#[test]
fn history_replays_to_the_same_state() -> eyre::Result<()> {
    setup();
    let mut builder = Builder::<Product>::new()?;
    for input in inputs() {
        builder.apply(&input)?;
    }

    let replayed = Partial::replay(builder.schema().clone(), builder.options(), builder.history())?;
    assert_eq!(replayed.value(), builder.value());
    assert_eq!(replayed.tracker(), builder.tracker());
    Ok(())
}
