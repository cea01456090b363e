use std::{ffi::c_void, marker::PhantomData};

/// # Safety
/// You must ensure that `as_gl_bytes` and `gl_type_layout` match each other
/// in terms of byte layout.
pub unsafe trait GlLayout {
    fn gl_type_layout() -> Box<[GlType]>;

    fn as_gl_bytes(&self) -> &[u8];
}

#[derive(Clone, Copy, Debug)]
pub enum GlType {
    Float,  // f32
    Double, // f64
}

impl GlType {
    pub fn get_size(&self) -> usize {
        match *self {
            GlType::Double => std::mem::size_of::<f64>(),
            GlType::Float => std::mem::size_of::<f32>(),
        }
    }
}

/// A byte buffer of vertex data laid out the way the bound attribute
/// pointers expect, ready to hand to `gl::BufferData`.
#[derive(Clone)]
pub struct RenderVec<T: GlLayout> {
    inner: Vec<u8>,
    stride: usize,
    _phantom: PhantomData<T>,
}

impl<T: GlLayout> RenderVec<T> {
    pub fn new() -> Self {
        let mut stride = 0;
        for gl_type in T::gl_type_layout().iter() {
            stride += gl_type.get_size();
        }
        Self {
            inner: vec![],
            stride,
            _phantom: PhantomData,
        }
    }
    pub fn push(&mut self, value: T) {
        self.inner.extend_from_slice(value.as_gl_bytes());
    }
    pub fn extend_from_slice(&mut self, slice: &[T]) {
        self.inner.reserve(slice.len() * self.stride);
        for value in slice {
            self.inner.extend_from_slice(value.as_gl_bytes());
        }
    }
    pub fn stride(&self) -> usize {
        self.stride
    }
    pub fn gl_size(&self) -> isize {
        (self.inner.len()).try_into().unwrap_or(isize::MAX)
    }
    pub fn gl_len(&self) -> i32 {
        (self.inner.len() / self.stride).try_into().unwrap_or(i32::MAX)
    }
    pub fn gl_data(&self) -> *const c_void {
        self.inner.as_ptr().cast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    #[test]
    fn stride_matches_three_packed_floats() {
        let vec: RenderVec<Vertex> = RenderVec::new();
        assert_eq!(vec.stride(), 3 * std::mem::size_of::<f32>());
    }

    #[test]
    fn push_accumulates_whole_vertices() {
        let mut vec = RenderVec::new();
        vec.push(Vertex::new(-0.5, -0.5, 0.0));
        vec.push(Vertex::new(0.5, -0.5, 0.0));
        assert_eq!(vec.gl_len(), 2);
        assert_eq!(vec.gl_size(), 2 * vec.stride() as isize);
    }

    #[test]
    fn bytes_are_the_vertex_floats_in_order() {
        let mut vec = RenderVec::new();
        vec.extend_from_slice(&[Vertex::new(1.0, 2.0, 3.0)]);

        let mut expected = Vec::new();
        for float in [1.0f32, 2.0, 3.0] {
            expected.extend_from_slice(&float.to_ne_bytes());
        }
        let bytes =
            unsafe { std::slice::from_raw_parts(vec.gl_data().cast::<u8>(), vec.gl_size() as usize) };
        assert_eq!(bytes, expected.as_slice());
    }
}
