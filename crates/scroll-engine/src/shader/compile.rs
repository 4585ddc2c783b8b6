use std::collections::BTreeSet;

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};
use naga::{Binding, BuiltIn, Handle, Module, Type, TypeInner};

use super::{ShaderError, ShaderSource, ShaderStage};

/// A parsed and validated single-stage module.
#[derive(Debug)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub label: String,
    /// Name of the first entry point for `stage`.
    pub entry_point: String,
    pub code: String,
    module: Module,
    info: ModuleInfo,
    entry_index: usize,
}

impl CompiledStage {
    pub fn module(&self) -> &Module {
        &self.module
    }

    fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    /// `@location` inputs of the entry point.
    pub fn input_locations(&self) -> BTreeSet<u32> {
        let mut inputs = Vec::new();
        for arg in &self.entry().function.arguments {
            collect_io(&self.module, arg.ty, arg.binding.as_ref(), &mut inputs);
        }
        inputs
            .iter()
            .filter_map(|(b, _)| location_of(b))
            .collect()
    }

    /// `(group, binding)` of every resource the entry point actually uses.
    pub fn resource_bindings(&self) -> BTreeSet<(u32, u32)> {
        let uses = self.info.get_entry_point(self.entry_index);
        self.module
            .global_variables
            .iter()
            .filter(|(handle, _)| !uses[*handle].is_empty())
            .filter_map(|(_, var)| var.binding.as_ref())
            .map(|rb| (rb.group, rb.binding))
            .collect()
    }
}

/// A vertex/fragment pair whose interfaces have been matched.
#[derive(Debug)]
pub struct LinkedProgram {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
}

/// Parses and validates `source`, and requires an entry point of its stage.
pub fn compile_stage(source: &ShaderSource) -> Result<CompiledStage, ShaderError> {
    let fail = |log: String| ShaderError::Compile {
        stage: source.stage,
        label: source.label.clone(),
        log,
    };

    let module = naga::front::wgsl::parse_str(&source.code)
        .map_err(|e| fail(e.emit_to_string(&source.code)))?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| fail(e.emit_to_string(&source.code)))?;

    let want = source.stage.as_naga();
    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == want)
        .ok_or_else(|| fail(format!("no @{} entry point", source.stage)))?;
    let entry_point = module.entry_points[entry_index].name.clone();

    log::debug!(
        "compiled {} shader '{}' (entry point {entry_point})",
        source.stage,
        source.label
    );

    Ok(CompiledStage {
        stage: source.stage,
        label: source.label.clone(),
        entry_point,
        code: source.code.clone(),
        module,
        info,
        entry_index,
    })
}

/// Matches the vertex outputs against the fragment inputs.
///
/// The vertex stage must write `@builtin(position)`, and every `@location`
/// the fragment stage reads must be written by the vertex stage.
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedProgram, ShaderError> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(ShaderError::Link {
            log: format!(
                "expected vertex + fragment, got {} + {}",
                vertex.stage, fragment.stage
            ),
        });
    }

    let mut outputs = Vec::new();
    if let Some(result) = &vertex.entry().function.result {
        collect_io(vertex.module(), result.ty, result.binding.as_ref(), &mut outputs);
    }

    let mut inputs = Vec::new();
    for arg in &fragment.entry().function.arguments {
        collect_io(fragment.module(), arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    let mut problems = Vec::new();

    let writes_position = outputs
        .iter()
        .any(|(b, _)| matches!(b, Binding::BuiltIn(BuiltIn::Position { .. })));
    if !writes_position {
        problems.push(format!(
            "vertex entry point '{}' does not write @builtin(position)",
            vertex.entry_point
        ));
    }

    for (binding, read_ty) in &inputs {
        let Some(loc) = location_of(binding) else { continue };
        let written = outputs
            .iter()
            .find(|(b, _)| location_of(b) == Some(loc))
            .map(|(_, ty)| ty);

        match written {
            None => problems.push(format!(
                "fragment input @location({loc}) is not written by vertex entry point '{}'",
                vertex.entry_point
            )),
            Some(write_ty) if write_ty != read_ty => problems.push(format!(
                "@location({loc}) type mismatch: vertex writes {}, fragment reads {}",
                type_name(write_ty),
                type_name(read_ty)
            )),
            Some(_) => {}
        }
    }

    if !problems.is_empty() {
        return Err(ShaderError::Link {
            log: problems.join("\n"),
        });
    }

    log::debug!(
        "linked {}:{} with {}:{}",
        vertex.label,
        vertex.entry_point,
        fragment.label,
        fragment.entry_point
    );

    Ok(LinkedProgram { vertex, fragment })
}

/// Flattens an entry-point argument or result into `(binding, type)` pairs.
///
/// Structs contribute their members; a directly bound value contributes itself.
fn collect_io(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(Binding, TypeInner)>,
) {
    if let Some(b) = binding {
        out.push((b.clone(), module.types[ty].inner.clone()));
        return;
    }

    if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
        out.extend(members.iter().filter_map(|m| {
            let b = m.binding.clone()?;
            Some((b, module.types[m.ty].inner.clone()))
        }));
    }
}

fn location_of(binding: &Binding) -> Option<u32> {
    match binding {
        Binding::Location { location, .. } => Some(*location),
        _ => None,
    }
}

/// WGSL-ish spelling of an interface type for diagnostics.
fn type_name(ty: &TypeInner) -> String {
    fn scalar(s: &naga::Scalar) -> String {
        let prefix = match s.kind {
            naga::ScalarKind::Float => "f",
            naga::ScalarKind::Sint => "i",
            naga::ScalarKind::Uint => "u",
            naga::ScalarKind::Bool => return "bool".to_string(),
            _ => return format!("{:?}", s.kind),
        };
        format!("{prefix}{}", s.width as u32 * 8)
    }

    match ty {
        TypeInner::Scalar(s) => scalar(s),
        TypeInner::Vector { size, scalar: s } => format!("vec{}<{}>", *size as u8, scalar(s)),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vs(code: &str) -> ShaderSource {
        ShaderSource::new(ShaderStage::Vertex, "test.vert", code)
    }

    fn fs(code: &str) -> ShaderSource {
        ShaderSource::new(ShaderStage::Fragment, "test.frag", code)
    }

    const FS_READS_LOC1: &str = r#"
        @fragment
        fn main(@location(1) c: vec4<f32>) -> @location(0) vec4<f32> {
            return c;
        }
    "#;

    const VS_WRITES_LOC0: &str = r#"
        struct Out {
            @builtin(position) pos: vec4<f32>,
            @location(0) uv: vec2<f32>,
        };

        @vertex
        fn main(@location(0) p: vec2<f32>) -> Out {
            var o: Out;
            o.pos = vec4<f32>(p, 0.0, 1.0);
            o.uv = p;
            return o;
        }
    "#;

    #[test]
    fn builtin_sprite_program_compiles_and_links() {
        let v = compile_stage(&ShaderSource::builtin(ShaderStage::Vertex)).unwrap();
        let f = compile_stage(&ShaderSource::builtin(ShaderStage::Fragment)).unwrap();
        assert_eq!(v.entry_point, "vs_main");
        assert_eq!(f.entry_point, "fs_main");

        let program = link(v, f).unwrap();
        assert_eq!(program.vertex.stage, ShaderStage::Vertex);
    }

    #[test]
    fn syntax_error_is_a_compile_error_for_that_stage() {
        let err = compile_stage(&vs("@vertex fn main( -> {")).unwrap_err();
        match &err {
            ShaderError::Compile { stage, label, log } => {
                assert_eq!(*stage, ShaderStage::Vertex);
                assert_eq!(label, "test.vert");
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("failed to compile vertex shader"));
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = r#"
            @fragment
            fn main() -> @location(0) vec4<f32> {
                let x: f32 = vec2<f32>(1.0, 2.0);
                return vec4<f32>(x);
            }
        "#;
        assert!(matches!(
            compile_stage(&fs(src)),
            Err(ShaderError::Compile { stage: ShaderStage::Fragment, .. })
        ));
    }

    #[test]
    fn wrong_stage_entry_point_rejected() {
        let err = compile_stage(&vs(FS_READS_LOC1)).unwrap_err();
        match err {
            ShaderError::Compile { log, .. } => assert!(log.contains("@vertex")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn link_reports_unwritten_fragment_input() {
        let v = compile_stage(&vs(VS_WRITES_LOC0)).unwrap();
        let f = compile_stage(&fs(FS_READS_LOC1)).unwrap();

        match link(v, f).unwrap_err() {
            ShaderError::Link { log } => assert!(log.contains("@location(1)")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn link_rejects_mismatched_location_types() {
        let v = compile_stage(&vs(VS_WRITES_LOC0)).unwrap();
        let f = compile_stage(&fs(r#"
            @fragment
            fn main(@location(0) c: vec4<f32>) -> @location(0) vec4<f32> {
                return c;
            }
        "#))
        .unwrap();

        match link(v, f).unwrap_err() {
            ShaderError::Link { log } => {
                assert!(log.contains("@location(0) type mismatch"), "{log}");
                assert!(log.contains("vec2<f32>") && log.contains("vec4<f32>"), "{log}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn builtin_interface_is_reported() {
        let v = compile_stage(&ShaderSource::builtin(ShaderStage::Vertex)).unwrap();
        let f = compile_stage(&ShaderSource::builtin(ShaderStage::Fragment)).unwrap();

        assert_eq!(v.input_locations(), BTreeSet::from([0, 1, 2, 3]));
        assert_eq!(v.resource_bindings(), BTreeSet::from([(0, 0)]));
        assert_eq!(f.resource_bindings(), BTreeSet::from([(0, 1), (0, 2)]));
    }

    #[test]
    fn unused_resources_are_not_reported() {
        let f = compile_stage(&fs(r#"
            @group(3) @binding(9) var<uniform> unused: vec4<f32>;

            @fragment
            fn main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        "#))
        .unwrap();
        assert!(f.resource_bindings().is_empty());
    }

    #[test]
    fn link_accepts_subset_of_outputs() {
        let v = compile_stage(&vs(VS_WRITES_LOC0)).unwrap();
        let f = compile_stage(&fs(r#"
            @fragment
            fn main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }
        "#))
        .unwrap();

        assert!(link(v, f).is_ok());
    }

    #[test]
    fn link_rejects_swapped_stages() {
        let v = compile_stage(&vs(VS_WRITES_LOC0)).unwrap();
        let v2 = compile_stage(&vs(VS_WRITES_LOC0)).unwrap();
        assert!(matches!(link(v, v2), Err(ShaderError::Link { .. })));
    }
}
