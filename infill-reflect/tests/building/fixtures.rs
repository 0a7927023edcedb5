//! Typed records shared by the tests, written the way generated code writes them.

use infill_core::{
    ConvertError, FieldDef, FieldFlags, Fields, FromValue, Record, RecordDef, ScalarType, TypeDef,
    Value, def_of,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i64,
}

const PERSON_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("name").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("age")
        .ty(TypeDef::INT)
        .default(|| Value::Int(0))
        .build(),
];

impl Record for Person {
    const DEF: &'static RecordDef = &RecordDef::builder()
        .type_name("Person")
        .fields(PERSON_FIELDS)
        .build();
}

impl FromValue for Person {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let mut fields = Fields::new(value)?;
        Ok(Self {
            name: fields.take("name")?,
            age: fields.take("age")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip_code: Option<String>,
}

const ADDRESS_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("street").ty(TypeDef::STRING).build(),
    FieldDef::builder().name("city").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("zip_code")
        .aliases(&["zipCode"])
        .ty(TypeDef::Option(&TypeDef::STRING))
        .build(),
];

impl Record for Address {
    const DEF: &'static RecordDef = &RecordDef::builder()
        .type_name("Address")
        .fields(ADDRESS_FIELDS)
        .build();
}

impl FromValue for Address {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let mut fields = Fields::new(value)?;
        Ok(Self {
            street: fields.take("street")?,
            city: fields.take("city")?,
            zip_code: fields.take("zip_code")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub address: Address,
    pub previous: Vec<Address>,
    pub phone: String,
}

const CONTACT_FIELDS: &[FieldDef] = &[
    FieldDef::builder()
        .name("address")
        .ty(TypeDef::Record(def_of::<Address>))
        .build(),
    FieldDef::builder()
        .name("previous")
        .ty(TypeDef::List(&TypeDef::Record(def_of::<Address>)))
        .default(|| Value::List(Vec::new()))
        .build(),
    FieldDef::builder()
        .name("phone")
        .ty(TypeDef::STRING)
        .flags(FieldFlags::SENSITIVE)
        .default(|| Value::from("unlisted"))
        .build(),
];

impl Record for Contact {
    const DEF: &'static RecordDef = &RecordDef::builder()
        .type_name("Contact")
        .fields(CONTACT_FIELDS)
        .build();
}

impl FromValue for Contact {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let mut fields = Fields::new(value)?;
        Ok(Self {
            address: fields.take("address")?,
            previous: fields.take("previous")?,
            phone: fields.take("phone")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub sku: String,
    pub price: f64,
    pub stock: u8,
    pub status: String,
    pub tags: Vec<String>,
}

const PRODUCT_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("sku").ty(TypeDef::STRING).build(),
    FieldDef::builder().name("price").ty(TypeDef::FLOAT).build(),
    FieldDef::builder()
        .name("stock")
        .ty(TypeDef::INT)
        .default(|| Value::Int(0))
        .build(),
    FieldDef::builder()
        .name("status")
        .ty(TypeDef::Scalar(ScalarType::Enum(&["draft", "listed", "retired"])))
        .default(|| Value::from("draft"))
        .build(),
    FieldDef::builder()
        .name("tags")
        .ty(TypeDef::List(&TypeDef::STRING))
        .flags(FieldFlags::NON_EMPTY)
        .default(|| Value::from(vec!["new"]))
        .build(),
];

impl Record for Product {
    const DEF: &'static RecordDef = &RecordDef::builder()
        .type_name("Product")
        .fields(PRODUCT_FIELDS)
        .build();
}

impl FromValue for Product {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let mut fields = Fields::new(value)?;
        Ok(Self {
            sku: fields.take("sku")?,
            price: fields.take("price")?,
            stock: fields.take("stock")?,
            status: fields.take("status")?,
            tags: fields.take("tags")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub label: String,
    pub weight: i64,
}

const PARCEL_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("label").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("weight")
        .ty(TypeDef::INT)
        .default(|| Value::Int(1))
        .build(),
];

impl Record for Parcel {
    const DEF: &'static RecordDef = &RecordDef::builder()
        .type_name("Parcel")
        .fields(PARCEL_FIELDS)
        .build();
}

impl FromValue for Parcel {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let mut fields = Fields::new(value)?;
        Ok(Self {
            label: fields.take("label")?,
            weight: fields.take("weight")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub carrier: String,
    pub parcel: Parcel,
    pub parcels: Vec<Parcel>,
}

const SHIPMENT_FIELDS: &[FieldDef] = &[
    FieldDef::builder().name("carrier").ty(TypeDef::STRING).build(),
    FieldDef::builder()
        .name("parcel")
        .ty(TypeDef::Record(def_of::<Parcel>))
        .build(),
    FieldDef::builder()
        .name("parcels")
        .ty(TypeDef::List(&TypeDef::Record(def_of::<Parcel>)))
        .default(|| Value::List(Vec::new()))
        .build(),
];

impl Record for Shipment {
    const DEF: &'static RecordDef = &RecordDef::builder()
        .type_name("Shipment")
        .fields(SHIPMENT_FIELDS)
        .build();
}

impl FromValue for Shipment {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let mut fields = Fields::new(value)?;
        Ok(Self {
            carrier: fields.take("carrier")?,
            parcel: fields.take("parcel")?,
            parcels: fields.take("parcels")?,
        })
    }
}
