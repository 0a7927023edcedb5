use core::marker::PhantomData;
use core::ops::Deref;

use infill_core::{Record, Value};

use super::{Partial, PartialOptions};
use crate::{FillReport, FinalizeError, MalformedInputError, SchemaError, describe};

/// A [`Partial`] for the record type `T`, whose `finalize` hands back a `T`.
///
/// Everything that only reads the builder is reachable through `Deref`.
pub struct Builder<T> {
    partial: Partial,
    marker: PhantomData<fn() -> T>,
}

impl<T: Record> Builder<T> {
    /// Creates a builder for `T`, describing `T` on first use
    pub fn new() -> Result<Self, SchemaError> {
        Self::with_options(PartialOptions::default())
    }

    /// Creates a builder for `T` with the given options
    pub fn with_options(options: PartialOptions) -> Result<Self, SchemaError> {
        Ok(Self {
            partial: Partial::with_options(describe::<T>()?, options),
            marker: PhantomData,
        })
    }

    /// See [`Partial::apply`]
    pub fn apply(&mut self, input: &Value) -> Result<FillReport, MalformedInputError> {
        self.partial.apply(input)
    }

    /// See [`Partial::reset`]
    pub fn reset(&mut self) {
        self.partial.reset();
    }

    /// Finalizes the record and converts it into a `T`.
    pub fn finalize(&self) -> Result<T, FinalizeError> {
        let value = self.partial.finalize()?;
        Ok(T::from_value(value)?)
    }

    /// Finalizes the record without converting it
    pub fn finalize_value(&self) -> Result<Value, FinalizeError> {
        self.partial.finalize()
    }

    /// Unwraps the untyped builder
    pub fn into_partial(self) -> Partial {
        self.partial
    }
}

impl<T> Deref for Builder<T> {
    type Target = Partial;

    fn deref(&self) -> &Self::Target {
        &self.partial
    }
}

impl<T> Clone for Builder<T> {
    fn clone(&self) -> Self {
        Self {
            partial: self.partial.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> core::fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Builder")
            .field("record", &self.partial.schema().type_name)
            .field("state", &self.partial.state())
            .finish()
    }
}
