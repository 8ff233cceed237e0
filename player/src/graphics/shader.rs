//! Offline shader compilation and linking checks
//!
//! Both stages are parsed and validated with naga before wgpu sees them, so
//! a broken shader becomes a [`SetupError`] instead of a device error.

use framestream_core::error::{SetupError, ShaderStage};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, Type, TypeInner};

use super::shaders::ShaderSources;

/// Entry point the vertex stage must define
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point the fragment stage must define
pub const FRAGMENT_ENTRY: &str = "fs_main";

fn entry_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => VERTEX_ENTRY,
        ShaderStage::Fragment => FRAGMENT_ENTRY,
    }
}

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

/// Parse and validate one stage
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<Module, SetupError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        SetupError::ShaderCompileFailure {
            stage,
            log: e.emit_to_string(source),
        }
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator
        .validate(&module)
        .map_err(|e| SetupError::ShaderCompileFailure {
            stage,
            log: format!("{:?}", e),
        })?;

    let name = entry_name(stage);
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == name && ep.stage == naga_stage(stage));
    if !found {
        return Err(SetupError::ShaderCompileFailure {
            stage,
            log: format!("missing {} entry point `{}`", stage, name),
        });
    }

    Ok(module)
}

/// Check that every fragment input is written by the vertex stage
///
/// Inputs and outputs are matched by `@location` and must agree in type.
pub fn link(vertex: &Module, fragment: &Module) -> Result<(), SetupError> {
    let outputs = stage_outputs(vertex, VERTEX_ENTRY);
    let inputs = stage_inputs(fragment, FRAGMENT_ENTRY);

    for (location, input_ty) in &inputs {
        match outputs.iter().find(|(l, _)| l == location) {
            None => {
                return Err(SetupError::ShaderLinkFailure {
                    log: format!(
                        "fragment input @location({}) is not written by `{}`",
                        location, VERTEX_ENTRY
                    ),
                });
            }
            Some((_, output_ty)) if output_ty != input_ty => {
                return Err(SetupError::ShaderLinkFailure {
                    log: format!(
                        "@location({}) type mismatch: vertex writes {:?}, fragment reads {:?}",
                        location, output_ty, input_ty
                    ),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Compile both stages and link them
pub fn validate_program(sources: ShaderSources<'_>) -> Result<(), SetupError> {
    let vertex = compile_stage(ShaderStage::Vertex, sources.vertex)?;
    let fragment = compile_stage(ShaderStage::Fragment, sources.fragment)?;
    link(&vertex, &fragment)?;
    tracing::debug!("Shader program validated");
    Ok(())
}

fn stage_outputs(module: &Module, entry: &str) -> Vec<(u32, TypeInner)> {
    let mut out = Vec::new();
    if let Some(result) = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry)
        .and_then(|ep| ep.function.result.as_ref())
    {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn stage_inputs(module: &Module, entry: &str) -> Vec<(u32, TypeInner)> {
    let mut out = Vec::new();
    if let Some(ep) = module.entry_points.iter().find(|ep| ep.name == entry) {
        for arg in &ep.function.arguments {
            collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
        }
    }
    out
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(u32, TypeInner)>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.push((*location, module.types[ty].inner.clone()));
        }
        Some(Binding::BuiltIn(_)) => {}
        // Unbound values are structs whose members carry the bindings
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}
