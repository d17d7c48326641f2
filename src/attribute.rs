//! Read access to the attributes of the geometry a [`PointBvh`](crate::partitioning::PointBvh)
//! was built from.
//!
//! The hierarchy does not own any attribute storage. Attributes live in the caller's
//! geometry and are addressed by [`PointOffset`]s; this module only describes how a
//! hit location can read them.

/// Identifier of a point in the caller's attribute storage.
pub type PointOffset = u32;

/// Cache-invalidation token of an attribute array. `-1` means unknown.
pub type DataId = i64;

/// The kind of geometric element an attribute is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeOwner {
    /// One value per point.
    Point,
    /// One value per vertex (point reference of a primitive).
    Vertex,
    /// One value per primitive.
    Primitive,
    /// A single value for the whole geometry.
    Detail,
}

/// An attribute that can be read at a given element offset.
pub trait AttributeRead<T> {
    /// The kind of element this attribute is attached to.
    fn owner(&self) -> AttributeOwner;

    /// Reads the value of the element at `offset`.
    ///
    /// Detail attributes ignore the offset. Returns `None` if `offset` is out of bounds.
    fn get(&self, offset: u32) -> Option<T>;
}

/// An attribute stored as a contiguous array indexed by element offset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeArray<T> {
    owner: AttributeOwner,
    values: Vec<T>,
}

impl<T> AttributeArray<T> {
    /// Creates an attribute attached to `owner` with the given values.
    pub fn new(owner: AttributeOwner, values: Vec<T>) -> Self {
        Self { owner, values }
    }

    /// A point attribute.
    pub fn point(values: Vec<T>) -> Self {
        Self::new(AttributeOwner::Point, values)
    }

    /// A detail attribute holding a single value.
    pub fn detail(value: T) -> Self {
        Self::new(AttributeOwner::Detail, vec![value])
    }

    /// The raw values of this attribute.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Clone> AttributeRead<T> for AttributeArray<T> {
    fn owner(&self) -> AttributeOwner {
        self.owner
    }

    fn get(&self, offset: u32) -> Option<T> {
        let index = match self.owner {
            AttributeOwner::Detail => 0,
            _ => offset as usize,
        };
        self.values.get(index).cloned()
    }
}
