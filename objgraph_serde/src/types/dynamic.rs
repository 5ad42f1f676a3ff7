use crate::error::CodecError;
use std::any::{self, Any};


/// A value whose static type has been erased, tagged with the name of that type.
///
/// Recovering the static type is always checked; a wrong guess is a
/// [`CodecError::TypeMismatch`], never a reinterpretation.
pub struct Dynamic {
    obj: Box<dyn Any>,
    type_name: &'static str,
}

impl Dynamic {
    pub fn new<T: Any>(t: T) -> Self {
        Self {
            obj: Box::new(t),
            type_name: any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        (*self.obj).is::<T>()
    }

    pub fn cast<T: Any>(self) -> Result<T, CodecError> {
        let type_name = self.type_name;
        match self.obj.downcast::<T>() {
            Ok(t) => Ok(*t),
            Err(_) => Err(CodecError::type_mismatch(any::type_name::<T>(), type_name)),
        }
    }

    pub fn cast_ref<T: Any>(&self) -> Result<&T, CodecError> {
        (*self.obj)
            .downcast_ref::<T>()
            .ok_or_else(|| CodecError::type_mismatch(any::type_name::<T>(), self.type_name))
    }
}

/// Checked replacement for an unchecked cast out of a type-erased value.
pub fn cast<T: Any>(dynamic: Dynamic) -> Result<T, CodecError> {
    dynamic.cast()
}
