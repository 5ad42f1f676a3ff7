use crate::error::CodecError;
use crate::serde::{GraphReader, GraphWriter, NodeType};
use crate::types::{Deser, Ser, Serializable};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::{self, Rc};
use std::sync::{self, Arc, Mutex};


/// A reference-counted pointer whose allocations are tracked by identity.
pub trait SharedPtr: Clone + 'static {
    type Pointee: 'static;

    fn new(pointee: Self::Pointee) -> Self;
    fn pointee(&self) -> &Self::Pointee;
    fn addr(&self) -> usize;
}

impl<T: 'static> SharedPtr for Rc<T> {
    type Pointee = T;
    fn new(pointee: T) -> Self {
        Rc::new(pointee)
    }
    fn pointee(&self) -> &T {
        self
    }
    fn addr(&self) -> usize {
        Rc::as_ptr(self) as usize
    }
}

impl<T: 'static> SharedPtr for Arc<T> {
    type Pointee = T;
    fn new(pointee: T) -> Self {
        Arc::new(pointee)
    }
    fn pointee(&self) -> &T {
        self
    }
    fn addr(&self) -> usize {
        Arc::as_ptr(self) as usize
    }
}

/* Rc and Arc. */

impl<T: Ser + 'static> Ser for Rc<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_shared(self.addr(), self.pointee())
    }
}
impl<T: Deser + 'static> Deser for Rc<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_shared()
    }
}
impl<T: Serializable> Serializable for Rc<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Rc<{}>", T::type_name()))
    }
}

impl<T: Ser + 'static> Ser for Arc<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_shared(self.addr(), self.pointee())
    }
}
impl<T: Deser + 'static> Deser for Arc<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_shared()
    }
}
impl<T: Serializable> Serializable for Arc<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Arc<{}>", T::type_name()))
    }
}

/* Weak pointers. A dead pointer is written as Unit. */

impl<T: Ser + 'static> Ser for rc::Weak<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        match self.upgrade() {
            None => w.ser_unit(),
            Some(strong) => w.ser_shared(strong.addr(), strong.pointee()),
        }
    }
}
impl<T: Deser + 'static> Deser for rc::Weak<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        match r.take_node_type()? {
            NodeType::Unit => Ok(rc::Weak::new()),
            node_type => {
                let strong: Rc<T> = r.deser_shared_after(node_type)?;
                Ok(Rc::downgrade(&strong))
            }
        }
    }
}
impl<T: Serializable> Serializable for rc::Weak<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Weak<{}>", T::type_name()))
    }
}

impl<T: Ser + 'static> Ser for sync::Weak<T> {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        match self.upgrade() {
            None => w.ser_unit(),
            Some(strong) => w.ser_shared(strong.addr(), strong.pointee()),
        }
    }
}
impl<T: Deser + 'static> Deser for sync::Weak<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        match r.take_node_type()? {
            NodeType::Unit => Ok(sync::Weak::new()),
            node_type => {
                let strong: Arc<T> = r.deser_shared_after(node_type)?;
                Ok(Arc::downgrade(&strong))
            }
        }
    }
}
impl<T: Serializable> Serializable for sync::Weak<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("sync::Weak<{}>", T::type_name()))
    }
}

/* Interior mutability. These are the pointees that may close a cycle. */

impl<T: Ser> Ser for RefCell<T> {
    const CYCLIC: bool = true;

    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        let inner = self.try_borrow().map_err(|_| {
            CodecError::NotCapturable(String::from("RefCell is mutably borrowed during encoding"))
        })?;
        inner.ser(w)
    }
}
impl<T: Deser + Default> Deser for RefCell<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        T::deser(r).map(RefCell::new)
    }
    fn vacant() -> Option<Self> {
        Some(RefCell::new(T::default()))
    }
    fn refill(&self, body: Self) {
        *self.borrow_mut() = body.into_inner();
    }
}
impl<T: Serializable + Default> Serializable for RefCell<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("RefCell<{}>", T::type_name()))
    }
}

/// The value is snapshotted with `try_lock`, so encoding never blocks.
/// A lock held anywhere at that moment, by this thread or another one, fails with
/// [`CodecError::NotCapturable`], as does a poisoned lock. Callers sharing the graph
/// across threads should quiesce writers or retry.
impl<T: Ser> Ser for Mutex<T> {
    const CYCLIC: bool = true;

    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        let inner = self.try_lock().map_err(|e| {
            CodecError::NotCapturable(format!("Mutex cannot be snapshotted: {e}"))
        })?;
        inner.ser(w)
    }
}
impl<T: Deser + Default> Deser for Mutex<T> {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        T::deser(r).map(Mutex::new)
    }
    fn vacant() -> Option<Self> {
        Some(Mutex::new(T::default()))
    }
    fn refill(&self, body: Self) {
        let body = body.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.lock() {
            Ok(mut guard) => *guard = body,
            Err(poisoned) => *poisoned.into_inner() = body,
        }
    }
}
impl<T: Serializable + Default> Serializable for Mutex<T> {
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("Mutex<{}>", T::type_name()))
    }
}
