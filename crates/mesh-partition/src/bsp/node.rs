//! Flat BSP node records.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{Axis, RecordError};

/// Child slot value meaning "no child".
pub const NO_CHILD: i32 = -1;

/// Size of one serialized node in bytes.
pub const NODE_RECORD_SIZE: usize = 16;

/// Node kind as stored in the record's flag field.
///
/// Split nodes are named after the plane they split with, which is normal to
/// the split axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NodeFlag {
    /// Split along X.
    YzPlane = 0,
    /// Split along Y.
    XzPlane = 1,
    /// Split along Z.
    XyPlane = 2,
    Leaf = 4,
}

impl NodeFlag {
    /// Flag for a node split along `axis`.
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::X => NodeFlag::YzPlane,
            Axis::Y => NodeFlag::XzPlane,
            Axis::Z => NodeFlag::XyPlane,
        }
    }

    /// Split axis, or `None` for a leaf.
    pub fn axis(self) -> Option<Axis> {
        match self {
            NodeFlag::YzPlane => Some(Axis::X),
            NodeFlag::XzPlane => Some(Axis::Y),
            NodeFlag::XyPlane => Some(Axis::Z),
            NodeFlag::Leaf => None,
        }
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self as u16
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(NodeFlag::YzPlane),
            1 => Some(NodeFlag::XzPlane),
            2 => Some(NodeFlag::XyPlane),
            4 => Some(NodeFlag::Leaf),
            _ => None,
        }
    }
}

/// One finished node of a [`BspTree`](super::BspTree).
///
/// A leaf owns the range `face_start..face_start + face_count` of the tree's
/// face index array and has no children. A split node has no faces; each
/// child slot holds a node index or [`NO_CHILD`] when that half was empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspNode {
    flag: NodeFlag,
    child_a: i32,
    child_b: i32,
    face_count: u32,
    face_start: u32,
    plane_distance: f32,
}

impl BspNode {
    /// Creates a leaf owning `face_count` indices starting at `face_start`.
    pub fn leaf(face_start: u32, face_count: u32) -> Self {
        Self {
            flag: NodeFlag::Leaf,
            child_a: NO_CHILD,
            child_b: NO_CHILD,
            face_count,
            face_start,
            plane_distance: 0.0,
        }
    }

    /// Creates a split node. `child_a` covers the half below the plane,
    /// `child_b` the half above.
    pub fn split(
        axis: Axis,
        plane_distance: f32,
        child_a: Option<usize>,
        child_b: Option<usize>,
    ) -> Self {
        Self {
            flag: NodeFlag::for_axis(axis),
            child_a: child_slot(child_a),
            child_b: child_slot(child_b),
            face_count: 0,
            face_start: 0,
            plane_distance,
        }
    }

    #[inline]
    pub fn flag(&self) -> NodeFlag {
        self.flag
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.flag == NodeFlag::Leaf
    }

    /// Split axis, or `None` for a leaf.
    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        self.flag.axis()
    }

    /// Index of the child below the plane, if any.
    pub fn child_a(&self) -> Option<usize> {
        usize::try_from(self.child_a).ok()
    }

    /// Index of the child above the plane, if any.
    pub fn child_b(&self) -> Option<usize> {
        usize::try_from(self.child_b).ok()
    }

    #[inline]
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    #[inline]
    pub fn face_start(&self) -> u32 {
        self.face_start
    }

    /// Position of the split plane along the split axis. Zero for leaves.
    #[inline]
    pub fn plane_distance(&self) -> f32 {
        self.plane_distance
    }

    /// Writes the 16-byte little-endian record: `flags u16`, `child_a i16`,
    /// `child_b i16`, `face_count u16`, `face_start u32`, `plane_distance f32`.
    ///
    /// Fails if a child index or the face count doesn't fit its field.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), RecordError> {
        out.write_u16::<LittleEndian>(self.flag.bits())?;
        out.write_i16::<LittleEndian>(narrow("child_a", self.child_a)?)?;
        out.write_i16::<LittleEndian>(narrow("child_b", self.child_b)?)?;
        out.write_u16::<LittleEndian>(narrow("face_count", self.face_count)?)?;
        out.write_u32::<LittleEndian>(self.face_start)?;
        out.write_f32::<LittleEndian>(self.plane_distance)?;
        Ok(())
    }

    /// Reads a record written by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(input: &mut R) -> Result<Self, RecordError> {
        let bits = input.read_u16::<LittleEndian>()?;
        let flag = NodeFlag::from_bits(bits).ok_or(RecordError::OutOfRange {
            field: "flags",
            value: i64::from(bits),
        })?;
        Ok(Self {
            flag,
            child_a: i32::from(input.read_i16::<LittleEndian>()?),
            child_b: i32::from(input.read_i16::<LittleEndian>()?),
            face_count: u32::from(input.read_u16::<LittleEndian>()?),
            face_start: input.read_u32::<LittleEndian>()?,
            plane_distance: input.read_f32::<LittleEndian>()?,
        })
    }
}

fn child_slot(child: Option<usize>) -> i32 {
    let Some(index) = child else {
        return NO_CHILD;
    };
    i32::try_from(index).unwrap_or(NO_CHILD)
}

fn narrow<T, V>(field: &'static str, value: V) -> Result<T, RecordError>
where
    V: Copy + Into<i64>,
    T: TryFrom<V>,
{
    T::try_from(value).map_err(|_| RecordError::OutOfRange {
        field,
        value: value.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_has_no_children() {
        let leaf = BspNode::leaf(10, 5);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.child_a(), None);
        assert_eq!(leaf.child_b(), None);
        assert_eq!(leaf.axis(), None);
        assert_eq!(leaf.face_count(), 5);
    }

    #[test]
    fn split_node_children() {
        let node = BspNode::split(Axis::Y, 2.5, Some(1), None);
        assert!(!node.is_leaf());
        assert_eq!(node.flag(), NodeFlag::XzPlane);
        assert_eq!(node.axis(), Some(Axis::Y));
        assert_eq!(node.child_a(), Some(1));
        assert_eq!(node.child_b(), None);
        assert_eq!(node.face_count(), 0);
    }

    #[test]
    fn flag_values() {
        assert_eq!(NodeFlag::for_axis(Axis::X).bits(), 0);
        assert_eq!(NodeFlag::for_axis(Axis::Y).bits(), 1);
        assert_eq!(NodeFlag::for_axis(Axis::Z).bits(), 2);
        assert_eq!(NodeFlag::Leaf.bits(), 4);
        assert_eq!(NodeFlag::from_bits(3), None);
    }

    #[test]
    fn leaf_record_layout() {
        let mut bytes = Vec::new();
        BspNode::leaf(10, 5).write_to(&mut bytes).unwrap();
        assert_eq!(
            bytes,
            vec![4, 0, 0xFF, 0xFF, 0xFF, 0xFF, 5, 0, 10, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(bytes.len(), NODE_RECORD_SIZE);
    }

    #[test]
    fn split_record_reads_back() {
        let node = BspNode::split(Axis::Z, -3.25, Some(7), Some(8));
        let mut bytes = Vec::new();
        node.write_to(&mut bytes).unwrap();
        assert_eq!(&bytes[0..2], &[2, 0]);
        assert_eq!(&bytes[12..16], &(-3.25f32).to_le_bytes());
        assert_eq!(BspNode::read_from(&mut bytes.as_slice()).unwrap(), node);
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let mut bytes = Vec::new();
        let err = BspNode::leaf(0, 70_000).write_to(&mut bytes).unwrap_err();
        assert!(matches!(
            err,
            RecordError::OutOfRange {
                field: "face_count",
                value: 70_000
            }
        ));

        let err = BspNode::split(Axis::X, 0.0, Some(40_000), None)
            .write_to(&mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::OutOfRange {
                field: "child_a",
                ..
            }
        ));
    }
}
