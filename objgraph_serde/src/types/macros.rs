
/// Registers a struct with named fields for structural capture.
///
/// Fields are written in the listed order, each under its name. All fields must be listed.
///
/// ```
/// use objgraph_serde::impl_record;
///
/// #[derive(Default)]
/// struct Clock {
///     white_ms: u64,
///     black_ms: u64,
/// }
/// impl_record!(Clock { white_ms, black_ms });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::types::Ser for $ty {
            fn ser<W: ::std::io::Write>(
                &self,
                w: &mut $crate::serde::GraphWriter<W>,
            ) -> ::std::result::Result<(), $crate::CodecError> {
                const FIELDS: &[&str] = &[$(stringify!($field)),*];
                let mut rec = w.ser_record(stringify!($ty), FIELDS.len())?;
                $( rec.field(stringify!($field), &self.$field)?; )*
                rec.finish()
            }
        }
        impl $crate::types::Deser for $ty {
            fn deser<R: ::std::io::Read>(
                r: &mut $crate::serde::GraphReader<R>,
            ) -> ::std::result::Result<Self, $crate::CodecError> {
                const FIELDS: &[&str] = &[$(stringify!($field)),*];
                let mut rec = r.deser_record(stringify!($ty), FIELDS.len())?;
                let moi = Self {
                    $( $field: rec.field(stringify!($field))?, )*
                };
                rec.finish()?;
                Ok(moi)
            }
        }
        impl $crate::types::Serializable for $ty {
            fn type_name() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(stringify!($ty))
            }
        }
    };
}

/// Registers a field-less enum for structural capture. Variants are written by name.
///
/// ```
/// use objgraph_serde::impl_unit_enum;
///
/// enum Colour {
///     White,
///     Black,
/// }
/// impl_unit_enum!(Colour { White, Black });
/// ```
#[macro_export]
macro_rules! impl_unit_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::types::Ser for $ty {
            fn ser<W: ::std::io::Write>(
                &self,
                w: &mut $crate::serde::GraphWriter<W>,
            ) -> ::std::result::Result<(), $crate::CodecError> {
                let variant = match self {
                    $( Self::$variant => stringify!($variant), )+
                };
                w.ser_variant(stringify!($ty), variant, &())
            }
        }
        impl $crate::types::Deser for $ty {
            fn deser<R: ::std::io::Read>(
                r: &mut $crate::serde::GraphReader<R>,
            ) -> ::std::result::Result<Self, $crate::CodecError> {
                let (variant, payload) = r.deser_variant(stringify!($ty))?;
                let moi = match variant.as_str() {
                    $( stringify!($variant) => Self::$variant, )+
                    _ => return Err(payload.unknown(&variant)),
                };
                payload.payload::<()>()?;
                Ok(moi)
            }
        }
        impl $crate::types::Serializable for $ty {
            fn type_name() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(stringify!($ty))
            }
        }
    };
}
