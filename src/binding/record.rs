//! Static field tables for bindable records.
//!
//! A record describes itself once, as a declaration-ordered table of
//! [`FieldSpec`]s, and hands out mutable access to individual fields by
//! name. The binder never inspects the record's layout beyond that.

use super::ScalarKind;
use super::ScalarValue;
use crate::BindError;
use crate::Result;

/// How the binder treats a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Leaf fetched from the store and coerced
    Scalar,
    /// Record bound recursively under the field's path
    Nested,
    /// Recognized but never fetched or assigned (timestamp-like values)
    Opaque,
}

/// One row of a record's field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as declared; lower-cased to form the default path segment
    pub name: &'static str,
    /// Raw tag text, e.g. `name:port:default:8080`
    pub tag: &'static str,
    pub shape: FieldShape,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        tag: &'static str,
        shape: FieldShape,
    ) -> Self {
        Self { name, tag, shape }
    }

    pub const fn scalar(
        name: &'static str,
        tag: &'static str,
    ) -> Self {
        Self::new(name, tag, FieldShape::Scalar)
    }

    pub const fn nested(
        name: &'static str,
        tag: &'static str,
    ) -> Self {
        Self::new(name, tag, FieldShape::Nested)
    }

    pub const fn opaque(name: &'static str) -> Self {
        Self::new(name, "", FieldShape::Opaque)
    }
}

/// Mutable view of a single field
pub enum FieldMut<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Nested(&'a mut dyn Bindable),
}

/// A leaf value the binder can assign
pub trait ScalarSlot: Send {
    fn kind(&self) -> ScalarKind;

    fn assign(
        &mut self,
        value: ScalarValue,
    ) -> Result<()>;
}

/// A record that can be populated by [`crate::ConfigBinder`].
///
/// Usually implemented through [`impl_bindable!`](crate::impl_bindable).
pub trait Bindable: Send {
    /// Field table in declaration order
    fn fields(&self) -> &'static [FieldSpec];

    /// Mutable access to the field named `name`; `None` for opaque or
    /// unknown fields.
    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<FieldMut<'_>>;
}

macro_rules! scalar_slot {
    ($ty:ty, $kind:ident) => {
        impl ScalarSlot for $ty {
            fn kind(&self) -> ScalarKind {
                ScalarKind::$kind
            }

            fn assign(
                &mut self,
                value: ScalarValue,
            ) -> Result<()> {
                match value {
                    ScalarValue::$kind(v) => {
                        *self = v;
                        Ok(())
                    }
                    other => Err(BindError::UnsupportedType { kind: other.kind() }.into()),
                }
            }
        }
    };
}

scalar_slot!(String, Text);
scalar_slot!(f32, Float32);
scalar_slot!(f64, Float64);
scalar_slot!(isize, Int);

macro_rules! unsupported_slot {
    ($ty:ty, $kind:ident) => {
        impl ScalarSlot for $ty {
            fn kind(&self) -> ScalarKind {
                ScalarKind::$kind
            }

            fn assign(
                &mut self,
                _value: ScalarValue,
            ) -> Result<()> {
                Err(BindError::UnsupportedType {
                    kind: ScalarKind::$kind,
                }
                .into())
            }
        }
    };
}

unsupported_slot!(bool, Bool);
unsupported_slot!(u64, Uint);

/// Implements [`Bindable`] from a field list.
///
/// Each entry is `<shape> <field> [= "<tag>"]` with shape one of `scalar`,
/// `nested` or `opaque`:
///
/// ```
/// use kvfacade::impl_bindable;
///
/// #[derive(Default)]
/// struct Limits {
///     max_conns: isize,
/// }
///
/// #[derive(Default)]
/// struct Service {
///     name: String,
///     size: isize,
///     limits: Limits,
///     started_at: Option<std::time::SystemTime>,
/// }
///
/// impl_bindable!(Limits {
///     scalar max_conns = "name:max-conns:default:16",
/// });
///
/// impl_bindable!(Service {
///     scalar name,
///     scalar size = "default:100",
///     nested limits,
///     opaque started_at,
/// });
/// ```
#[macro_export]
macro_rules! impl_bindable {
    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };
    (@shape scalar) => {
        $crate::FieldShape::Scalar
    };
    (@shape nested) => {
        $crate::FieldShape::Nested
    };
    (@shape opaque) => {
        $crate::FieldShape::Opaque
    };
    (@slot $record:ident scalar $field:ident) => {
        ::core::option::Option::Some($crate::FieldMut::Scalar(&mut $record.$field))
    };
    (@slot $record:ident nested $field:ident) => {
        ::core::option::Option::Some($crate::FieldMut::Nested(&mut $record.$field))
    };
    (@slot $record:ident opaque $field:ident) => {
        ::core::option::Option::None
    };
    ($record_ty:ty { $( $shape:ident $field:ident $(= $tag:literal)? ),* $(,)? }) => {
        impl $crate::Bindable for $record_ty {
            fn fields(&self) -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $(
                        $crate::FieldSpec::new(
                            stringify!($field),
                            $crate::impl_bindable!(@tag $($tag)?),
                            $crate::impl_bindable!(@shape $shape),
                        )
                    ),*
                ];
                FIELDS
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> ::core::option::Option<$crate::FieldMut<'_>> {
                $(
                    if name == stringify!($field) {
                        return $crate::impl_bindable!(@slot self $shape $field);
                    }
                )*
                ::core::option::Option::None
            }
        }
    };
}
