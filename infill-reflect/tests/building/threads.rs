use std::sync::{Arc, Mutex};
use std::thread;

use infill_core::{FieldPath, map};
use infill_reflect::{BuildState, Builder, Partial, SchemaDescriptor, Tracker};
use infill_testhelpers::{eyre, setup};
use static_assertions::assert_impl_all;

use crate::fixtures::{Address, Contact};

assert_impl_all!(SchemaDescriptor: Send, Sync);
assert_impl_all!(Tracker: Send, Sync);
assert_impl_all!(Partial: Send, Sync, Clone);
assert_impl_all!(Builder<Contact>: Send, Sync, Clone);

#[test]
fn one_builder_behind_a_mutex() -> eyre::Result<()> {
    setup();
    let shared = Arc::new(Mutex::new(Builder::<Contact>::new()?));

    let inputs = [
        map! { "address" => map! { "street" => "Main" } },
        map! { "address" => map! { "city" => "Metropolis" } },
        map! { "phone" => "555-0100" },
        map! { "previous" => vec![map! { "street" => "Elm", "city" => "Gotham" }] },
    ];
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut builder = shared.lock().unwrap();
                builder.apply(&input).map(|report| report.accepted().len())
            })
        })
        .collect();
    for handle in handles {
        let accepted = handle.join().unwrap()?;
        assert!(accepted > 0);
    }

    let builder = shared.lock().unwrap();
    assert_eq!(builder.state(), BuildState::Complete);
    assert_eq!(builder.history().len(), 4);
    let contact = builder.finalize()?;
    assert_eq!(contact.phone, "555-0100");
    assert_eq!(
        contact.address,
        Address {
            street: "Main".into(),
            city: "Metropolis".into(),
            zip_code: None,
        }
    );
    Ok(())
}

#[test]
fn builders_for_one_schema_fill_independently() -> eyre::Result<()> {
    setup();
    let handles: Vec<_> = ["Main", "Elm", "Oak"]
        .into_iter()
        .map(|street| {
            thread::spawn(move || -> eyre::Result<String> {
                let mut builder = Builder::<Contact>::new()?;
                builder.apply(&map! { "address" => map! { "street" => street, "city" => "X" } })?;
                Ok(builder.finalize()?.address.street)
            })
        })
        .collect();

    let streets = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<eyre::Result<Vec<_>>>()?;
    assert_eq!(streets, ["Main", "Elm", "Oak"]);

    let street: FieldPath = "address.street".parse()?;
    assert_eq!(Builder::<Contact>::new()?.get(&street), None);
    Ok(())
}
