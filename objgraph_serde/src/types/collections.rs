use crate::error::CodecError;
use crate::serde::{GraphReader, GraphWriter};
use crate::types::{Deser, Ser, Serializable};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;
use std::io::{Read, Write};


/* Sequences. */

impl<T: Ser> Ser for Vec<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_seq(self.iter())
    }
}
impl<T: Deser> Deser for Vec<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_seq()
    }
}
impl<T: Serializable> Serializable for Vec<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Vec<{}>", T::type_name()))
    }
}

impl<T: Ser> Ser for VecDeque<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_seq(self.iter())
    }
}
impl<T: Deser> Deser for VecDeque<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_seq().map(VecDeque::from)
    }
}
impl<T: Serializable> Serializable for VecDeque<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("VecDeque<{}>", T::type_name()))
    }
}

/* Option and Box. Box is transparent on the wire. */

impl<T: Ser> Ser for Option<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        match self {
            None => w.ser_unit(),
            Some(t) => w.ser_some(t),
        }
    }
}
impl<T: Deser> Deser for Option<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_option()
    }
}
impl<T: Serializable> Serializable for Option<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Option<{}>", T::type_name()))
    }
}

impl<T: Ser> Ser for Box<T> {
    const CYCLIC: bool = T::CYCLIC;

    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        (**self).ser(w)
    }
}
impl<T: Deser> Deser for Box<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        T::deser(r).map(Box::new)
    }
    fn vacant() -> Option<Self> {
        T::vacant().map(Box::new)
    }
    fn refill(&self, body: Self) {
        (**self).refill(*body)
    }
}
impl<T: Serializable> Serializable for Box<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Box<{}>", T::type_name()))
    }
}

/* Maps. */

impl<K: Ser, V: Ser> Ser for BTreeMap<K, V> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_map(self.iter())
    }
}
impl<K: Deser + Ord, V: Deser> Deser for BTreeMap<K, V> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_map().map(|entries| entries.into_iter().collect())
    }
}
impl<K: Serializable + Ord, V: Serializable> Serializable for BTreeMap<K, V> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("BTreeMap<{}, {}>", K::type_name(), V::type_name()))
    }
}

impl<K: Ser, V: Ser> Ser for HashMap<K, V> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_map(self.iter())
    }
}
impl<K: Deser + Eq + Hash, V: Deser> Deser for HashMap<K, V> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_map().map(|entries| entries.into_iter().collect())
    }
}
impl<K: Serializable + Eq + Hash, V: Serializable> Serializable for HashMap<K, V> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("HashMap<{}, {}>", K::type_name(), V::type_name()))
    }
}

/* Tuples travel as fixed-length sequences. */
macro_rules! impl_tuple {
    ($len:literal; $($name:ident $idx:tt),+) => {
        impl<$($name: Ser),+> Ser for ($($name,)+) {
            fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
                w.ser_seq_with($len, |w| {
                    $( self.$idx.ser(w)?; )+
                    Ok(())
                })
            }
        }
        impl<$($name: Deser),+> Deser for ($($name,)+) {
            fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
                r.deser_seq_with(|r, len| {
                    if len != $len {
                        return Err(CodecError::type_mismatch(
                            format!("tuple of {}", $len),
                            format!("sequence of {len}"),
                        ));
                    }
                    Ok(($($name::deser(r)?,)+))
                })
            }
        }
        impl<$($name: Serializable),+> Serializable for ($($name,)+) {
            fn type_name() -> Cow<'static, str> {
                let names: &[Cow<'static, str>] = &[$($name::type_name()),+];
                Cow::Owned(format!("({})", names.join(", ")))
            }
        }
    };
}
impl_tuple!(1; A 0);
impl_tuple!(2; A 0, B 1);
impl_tuple!(3; A 0, B 1, C 2);
impl_tuple!(4; A 0, B 1, C 2, D 3);
