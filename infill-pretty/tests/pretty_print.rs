use std::sync::Arc;

use infill_core::{FieldDef, FieldFlags, RecordDef, TypeDef, Value, map};
use infill_pretty::{InfillPretty, PrettyPrinter};
use infill_reflect::{Partial, describe_def};
use infill_testhelpers::{eyre, setup};
use insta::assert_snapshot;

static ADDRESS_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("street").ty(TypeDef::STRING).build(),
    FieldDef::builder().name("city").ty(TypeDef::STRING).build(),
];
static ADDRESS: RecordDef = RecordDef::builder()
    .type_name("Address")
    .fields(ADDRESS_FIELDS)
    .build();
fn address() -> &'static RecordDef {
    &ADDRESS
}

static VISIT_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("place").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("count")
        .ty(TypeDef::INT)
        .default(|| Value::Int(1))
        .build(),
];
static VISIT: RecordDef = RecordDef::builder()
    .type_name("Visit")
    .fields(VISIT_FIELDS)
    .build();
fn visit() -> &'static RecordDef {
    &VISIT
}

static ACCOUNT_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("user").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("password")
        .ty(TypeDef::STRING)
        .flags(FieldFlags::SENSITIVE)
        .build(),
    FieldDef::builder()
        .name("home")
        .ty(TypeDef::Record(address))
        .build(),
    FieldDef::builder()
        .name("roles")
        .ty(TypeDef::List(&TypeDef::STRING))
        .default(|| Value::from(vec!["member"]))
        .build(),
    FieldDef::builder()
        .name("visits")
        .ty(TypeDef::List(&TypeDef::Record(visit)))
        .default(|| Value::List(Vec::new()))
        .build(),
    FieldDef::builder()
        .name("nickname")
        .ty(TypeDef::Option(&TypeDef::STRING))
        .build(),
];
static ACCOUNT: RecordDef = RecordDef::builder()
    .type_name("Account")
    .fields(ACCOUNT_FIELDS)
    .build();

fn account() -> eyre::Result<Partial> {
    Ok(Partial::new(Arc::new(describe_def(&ACCOUNT)?)))
}

fn plain() -> PrettyPrinter {
    PrettyPrinter::new().with_colors(false)
}

#[test]
fn values() {
    setup();
    let value = map! {
        "name" => "Ann",
        "score" => 3.0,
        "admin" => false,
        "nickname" => Value::Null,
        "tags" => vec!["a", "b"],
        "address" => map! { "city" => "Metropolis" },
        "empty" => Value::List(vec![]),
    };
    assert_snapshot!(plain().format(&value), @r#"
    {
      name: "Ann",
      score: 3.0,
      admin: false,
      nickname: null,
      tags: [
        "a",
        "b",
      ],
      address: {
        city: "Metropolis",
      },
      empty: [],
    }
    "#);
}

#[test]
fn indent_size_and_max_depth() {
    setup();
    let value = map! {
        "a" => 1,
        "b" => map! { "c" => 2 },
        "d" => vec![1],
        "e" => map! {},
    };
    assert_snapshot!(plain().with_indent_size(4).with_max_depth(1).format(&value), @r"
    {
        a: 1,
        b: {…},
        d: […],
        e: {},
    }
    ");
    assert_eq!(plain().with_max_depth(0).format(&value), "{…}");
}

#[test]
fn partials_show_provenance() -> eyre::Result<()> {
    setup();
    let mut partial = account()?;
    partial.apply(&map! {
        "user" => "ann",
        "password" => "hunter2",
        "home" => map! { "street" => "Main" },
        "visits" => vec![map! { "place" => "Paris" }],
    })?;

    assert_snapshot!(plain().format(&partial), @r#"
    Account [partial]
      user: "ann"  (filled-explicit)
      password: [REDACTED]  (filled-explicit)
      home: {  (filled-nested-partial)
        street: "Main"  (filled-explicit)
        city: <unset>  (required)
      }
      roles: [
        "member",
      ]  (filled-default)
      visits: [  (filled-nested-partial)
        {  (filled-nested-partial)
          place: "Paris"  (filled-explicit)
          count: 1  (filled-default)
        },
      ]
      nickname: <unset>
    missing: home.city
    "#);
    Ok(())
}

#[test]
fn empty_and_complete_states() -> eyre::Result<()> {
    setup();
    let mut partial = account()?;
    let empty = plain().format(&partial);
    assert!(empty.starts_with("Account [empty]\n"));
    assert!(empty.ends_with("missing: home, password, user\n"), "{empty}");

    partial.apply(&map! {
        "user" => "ann",
        "password" => "hunter2",
        "home" => map! { "street" => "Main", "city" => "Metropolis" },
        "nickname" => Value::Null,
    })?;
    let complete = plain().format(&partial);
    assert!(complete.starts_with("Account [complete]\n"));
    assert!(complete.contains("  nickname: null  (filled-explicit)\n"));
    assert!(!complete.contains("missing"));
    Ok(())
}

#[test]
fn sensitive_values_never_show() -> eyre::Result<()> {
    setup();
    let mut partial = account()?;
    partial.apply(&map! { "user" => "ann", "password" => "hunter2" })?;

    for printer in [PrettyPrinter::new(), plain(), plain().with_max_depth(1)] {
        let output = partial.pretty_with(printer).to_string();
        assert!(output.contains("password"));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("hunter2"));
    }
    Ok(())
}

#[test]
fn nested_records_past_max_depth_are_elided() -> eyre::Result<()> {
    setup();
    let mut partial = account()?;
    partial.apply(&map! {
        "home" => map! { "street" => "Main" },
        "visits" => vec![map! { "place" => "Paris" }],
    })?;

    let output = plain().with_max_depth(1).format(&partial);
    assert!(output.contains("  home: {…}  (filled-nested-partial)\n"), "{output}");
    assert!(output.contains("  visits: […]  (filled-nested-partial)\n"), "{output}");
    assert!(!output.contains("Paris"));
    Ok(())
}

#[test]
fn fill_reports() -> eyre::Result<()> {
    setup();
    let mut partial = account()?;
    let report = partial.apply(&map! {
        "user" => 5,
        "colour" => "red",
        "nickname" => Value::Null,
        "home" => Value::Null,
    })?;

    assert_snapshot!(plain().format(&report), @r"
    1 accepted, 1 rejected, 1 unknown, 0 defaulted, 1 cleared
      accepted: nickname
      rejected: user (type_mismatch)
      unknown: colour
      cleared: home
    ");
    Ok(())
}
