use crate::render_vec::{GlLayout, GlType};

/// A single point in clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub pos: [f32; 3],
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { pos: [x, y, z] }
    }
}

pub fn to_byte_slice(floats: &[f32]) -> &[u8] {
    // SAFETY: any f32 bit pattern is a valid byte, and the length is scaled
    // to cover exactly the same region.
    unsafe { std::slice::from_raw_parts(floats.as_ptr().cast(), std::mem::size_of_val(floats)) }
}

unsafe impl GlLayout for Vertex {
    fn gl_type_layout() -> Box<[GlType]> {
        Box::new([GlType::Float, GlType::Float, GlType::Float])
    }
    fn as_gl_bytes(&self) -> &[u8] {
        // SAFETY: repr(C) with a single [f32; 3] field, so the struct is
        // laid out in memory exactly like three packed f32s.
        to_byte_slice(&self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_view_covers_every_float() {
        let vertex = Vertex::new(0.0, 0.5, -0.5);
        assert_eq!(vertex.as_gl_bytes().len(), 3 * std::mem::size_of::<f32>());
        assert_eq!(&vertex.as_gl_bytes()[..4], 0.0f32.to_ne_bytes());
    }
}
