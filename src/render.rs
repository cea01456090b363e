use std::ptr::null;

use gl::types as gltype;
use sdl2::video::GLContext;

use crate::{render_vec::RenderVec, shader::ShaderProgram, vertex::Vertex};

pub fn gl_upd_viewport(width: u32, height: u32) {
    let real_width: i32 = width.try_into().unwrap_or(i32::MAX);
    let real_height: i32 = height.try_into().unwrap_or(i32::MAX);
    // SAFETY:
    // gl::Viewport does not fail with non-negative values.
    unsafe {
        gl::Viewport(0, 0, real_width, real_height);
    }
}

pub fn clear() {
    unsafe {
        gl::ClearColor(0.2, 0.3, 0.3, 1.0);
        gl::Clear(gl::COLOR_BUFFER_BIT);
    }
}

/// Static geometry living on the GPU: one vertex buffer, one element buffer,
/// and the vertex array describing how attribute 0 reads the positions.
pub struct Mesh {
    vao: gltype::GLuint,
    vbo: gltype::GLuint,
    ebo: gltype::GLuint,
    index_count: i32,
}

impl Mesh {
    pub fn upload(gl_ctx: &GLContext, vertices: &[Vertex], indices: &[u32]) -> Self {
        assert!(
            gl_ctx.is_current(),
            "gl_ctx must be current in order to upload a Mesh"
        );

        let mut render_vec: RenderVec<Vertex> = RenderVec::new();
        render_vec.extend_from_slice(vertices);

        let (vao, vbo, ebo) = unsafe {
            let mut vao = 0;
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);

            let mut vbo = 0;
            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                render_vec.gl_size(),
                render_vec.gl_data(),
                gl::STATIC_DRAW,
            );

            let mut ebo = 0;
            gl::GenBuffers(1, &mut ebo);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                std::mem::size_of_val(indices).try_into().unwrap_or(0),
                indices.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            gl::VertexAttribPointer(
                0,
                3,
                gl::FLOAT,
                gl::FALSE,
                render_vec.stride().try_into().unwrap_or(0),
                null(),
            );
            gl::EnableVertexAttribArray(0);

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
            (vao, vbo, ebo)
        };

        Mesh {
            vao,
            vbo,
            ebo,
            index_count: indices.len().try_into().unwrap_or(i32::MAX),
        }
    }

    /// Draw with an explicit program instead of whatever happens to be
    /// bound at the time.
    pub fn draw(&self, program: &ShaderProgram) {
        program.bind();
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.ebo);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
