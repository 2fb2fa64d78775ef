//! Fixed-size array storage.
//!
//! An array variable holds an [`ArrayRef`], a shared handle to one
//! [`ArrayStore`]. Copying the variable copies the handle, so element writes
//! through either name are visible through both.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use goo_syntax::ast::Type;

use crate::error::{fail, ErrorKind, Result};
use crate::value::Value;

#[derive(Debug)]
pub struct ArrayStore {
    elem: Type,
    cells: Vec<Value>,
}

impl ArrayStore {
    /// A zero-filled store. Element types are already validated as scalar.
    pub fn new(len: usize, elem: Type) -> Self {
        let zero = match elem {
            Type::Float32 => Value::Float(0.0),
            _ => Value::Int(0),
        };
        Self {
            elem,
            cells: vec![zero; len],
        }
    }

    fn slot(&self, index: i64) -> Result<usize> {
        match usize::try_from(index) {
            Ok(i) if i < self.cells.len() => Ok(i),
            _ => fail(ErrorKind::IndexOutOfRange {
                index,
                len: self.cells.len(),
            }),
        }
    }

    pub fn get(&self, index: i64) -> Result<Value> {
        let i = self.slot(index)?;
        Ok(self.cells[i].clone())
    }

    /// Stores an already type-checked element.
    pub fn set(&mut self, index: i64, value: Value) -> Result<()> {
        let i = self.slot(index)?;
        self.cells[i] = value;
        Ok(())
    }
}

#[derive(Clone)]
pub struct ArrayRef(Rc<RefCell<ArrayStore>>);

impl ArrayRef {
    pub fn new(len: usize, elem: Type) -> Self {
        ArrayRef(Rc::new(RefCell::new(ArrayStore::new(len, elem))))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn elem(&self) -> Type {
        self.0.borrow().elem.clone()
    }

    /// The array's full type, e.g. `[10]float32`.
    pub fn ty(&self) -> Type {
        Type::array(self.len(), self.elem())
    }

    pub fn get(&self, index: i64) -> Result<Value> {
        self.0.borrow().get(index)
    }

    pub fn set(&self, index: i64, value: Value) -> Result<()> {
        self.0.borrow_mut().set(index, value)
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().cells.clone()
    }
}

/// Two handles are equal when they name the same store.
impl PartialEq for ArrayRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayRef({}, {:?})", self.ty(), self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_filled() {
        let arr = ArrayRef::new(3, Type::Float32);
        assert_eq!(arr.values(), vec![Value::Float(0.0); 3]);
        assert_eq!(arr.ty(), Type::array(3, Type::Float32));
    }

    #[test]
    fn test_bounds() {
        let arr = ArrayRef::new(10, Type::Int);
        arr.set(9, Value::Int(81)).unwrap();
        assert_eq!(arr.get(9), Ok(Value::Int(81)));
        let err = arr.get(10).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfRange { index: 10, len: 10 });
        let err = arr.set(-1, Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndexOutOfRange { index: -1, len: 10 });
    }

    #[test]
    fn test_handles_share_storage() {
        let a = ArrayRef::new(2, Type::Int);
        let b = a.clone();
        b.set(0, Value::Int(5)).unwrap();
        assert_eq!(a.get(0), Ok(Value::Int(5)));
        assert_eq!(a, b);
        assert_ne!(a, ArrayRef::new(2, Type::Int));
    }
}
