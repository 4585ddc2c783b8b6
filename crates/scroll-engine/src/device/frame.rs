/// Surface texture, view and encoder for one frame.
///
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) before acquiring the
/// next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
