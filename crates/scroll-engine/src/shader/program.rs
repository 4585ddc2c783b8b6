use std::collections::BTreeSet;

use super::{compile_stage, link, CompiledStage, ShaderError, ShaderSource};

/// A linked vertex/fragment pair, uploaded as wgpu shader modules.
///
/// Building never hands wgpu a module naga rejected.
#[derive(Debug)]
pub struct ShaderProgram {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_entry: String,
    vertex_inputs: BTreeSet<u32>,
    resource_bindings: BTreeSet<(u32, u32)>,
}

impl ShaderProgram {
    /// Compiles both stages, links them and creates the GPU modules.
    pub fn build(
        device: &wgpu::Device,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        let vs = compile_stage(vertex)?;
        let fs = compile_stage(fragment)?;
        let linked = link(vs, fs)?;

        let vertex_inputs = linked.vertex.input_locations();
        let resource_bindings = linked
            .vertex
            .resource_bindings()
            .union(&linked.fragment.resource_bindings())
            .copied()
            .collect();

        let program = Self {
            vertex: create_module(device, &linked.vertex)?,
            fragment: create_module(device, &linked.fragment)?,
            vertex_entry: linked.vertex.entry_point,
            fragment_entry: linked.fragment.entry_point,
            vertex_inputs,
            resource_bindings,
        };

        log::info!(
            "built shader program {}:{} + {}:{}",
            linked.vertex.label,
            program.vertex_entry,
            linked.fragment.label,
            program.fragment_entry
        );

        Ok(program)
    }

    #[inline]
    pub fn vertex_module(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    #[inline]
    pub fn fragment_module(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }

    #[inline]
    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    #[inline]
    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    /// `@location` inputs read by the vertex entry point.
    #[inline]
    pub fn vertex_inputs(&self) -> &BTreeSet<u32> {
        &self.vertex_inputs
    }

    /// `(group, binding)` pairs used by either entry point.
    #[inline]
    pub fn resource_bindings(&self) -> &BTreeSet<(u32, u32)> {
        &self.resource_bindings
    }
}

fn create_module(
    device: &wgpu::Device,
    stage: &CompiledStage,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&stage.label),
        source: wgpu::ShaderSource::Wgsl(stage.code.as_str().into()),
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(ShaderError::Compile {
            stage: stage.stage,
            label: stage.label.clone(),
            log: err.to_string(),
        }),
        None => Ok(module),
    }
}
