//! Small wgpu helpers shared by the cell programs

pub mod binding_types;
pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;

/// Rounds `bytes` up to the row alignment required by texture-to-buffer copies.
pub fn padded_bytes_per_row(bytes: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    bytes.div_ceil(align) * align
}
