use crate::error::CodecError;
use crate::serde::{GraphReader, GraphWriter};
use crate::types::{Deser, Ser, Serializable};
use std::borrow::Cow;
use std::io::{Read, Write};

/* Signed integers all travel as I64; the width is checked on the way back. */
macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl Ser for $ty {
                fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
                    w.ser_i64(i64::from(*self))
                }
            }
            impl Deser for $ty {
                fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
                    let i = r.deser_i64()?;
                    <$ty>::try_from(i).map_err(|_| {
                        CodecError::type_mismatch(stringify!($ty), format!("integer {i}"))
                    })
                }
            }
            impl Serializable for $ty {
                fn type_name() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }
            }
        )*
    };
}
impl_signed!(i8, i16, i32, i64);

/* Unsigned integers all travel as U64. */
macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Ser for $ty {
                fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
                    w.ser_u64(u64::from(*self))
                }
            }
            impl Deser for $ty {
                fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
                    let u = r.deser_u64()?;
                    <$ty>::try_from(u).map_err(|_| {
                        CodecError::type_mismatch(stringify!($ty), format!("integer {u}"))
                    })
                }
            }
            impl Serializable for $ty {
                fn type_name() -> Cow<'static, str> {
                    Cow::Borrowed(stringify!($ty))
                }
            }
        )*
    };
}
impl_unsigned!(u8, u16, u32, u64);

impl Ser for usize {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        let u = u64::try_from(*self)
            .map_err(|_| CodecError::NotCapturable(format!("usize {self} exceeds u64")))?;
        w.ser_u64(u)
    }
}
impl Deser for usize {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        let u = r.deser_u64()?;
        usize::try_from(u)
            .map_err(|_| CodecError::type_mismatch("usize", format!("integer {u}")))
    }
}
impl Serializable for usize {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("usize")
    }
}

impl Ser for f64 {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_f64(*self)
    }
}
impl Deser for f64 {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_f64()
    }
}
impl Serializable for f64 {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("f64")
    }
}

/// Widening to f64 is exact, so an f32 round-trips unchanged.
/// Reading back an f64 that has no exact f32 representation is a type mismatch.
impl Ser for f32 {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_f64(f64::from(*self))
    }
}
impl Deser for f32 {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        let f = r.deser_f64()?;
        let narrow = f as f32;
        if !f.is_nan() && f64::from(narrow) != f {
            return Err(CodecError::type_mismatch("f32", format!("float {f}")));
        }
        Ok(narrow)
    }
}
impl Serializable for f32 {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("f32")
    }
}

impl Ser for bool {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_bool(*self)
    }
}
impl Deser for bool {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_bool()
    }
}
impl Serializable for bool {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("bool")
    }
}

impl Ser for char {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_u64(u64::from(u32::from(*self)))
    }
}
impl Deser for char {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        let u = r.deser_u64()?;
        u32::try_from(u)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| CodecError::Format(format!("invalid char scalar {u:#x}")))
    }
}
impl Serializable for char {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("char")
    }
}

impl Ser for () {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_unit()
    }
}
impl Deser for () {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_unit()
    }
}
impl Serializable for () {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("()")
    }
}

impl Ser for String {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_str(self)
    }
}
impl Deser for String {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_str()
    }
}
impl Serializable for String {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("String")
    }
}
