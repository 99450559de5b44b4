use naga::{AddressSpace, Binding, Handle, Module, Scalar, Type, TypeInner};

use super::{UniformBlock, UniformField};

/// A user-defined stage input or output at a `@location`.
#[derive(Debug, Clone, PartialEq)]
pub struct Varying {
    pub location: u32,
    pub name: Option<String>,
    pub ty: TypeInner,
}

impl Varying {
    /// Scalar component count; `None` for anything but scalars and vectors.
    pub fn components(&self) -> Option<u32> {
        match self.ty {
            TypeInner::Scalar(_) => Some(1),
            TypeInner::Vector { size, .. } => Some(size as u32),
            _ => None,
        }
    }

    /// Component count when every component is an `f32`. Vertex attributes
    /// and the color output must have this shape.
    pub fn f32_components(&self) -> Option<u32> {
        match self.ty {
            TypeInner::Scalar(scalar) if scalar == Scalar::F32 => Some(1),
            TypeInner::Vector { size, scalar } if scalar == Scalar::F32 => Some(size as u32),
            _ => None,
        }
    }
}

/// A uniform global together with the bind group it was declared in.
#[derive(Debug, Clone)]
pub(super) struct ReflectedUniform {
    pub group: u32,
    pub block: UniformBlock,
}

/// A bound global that is not a uniform buffer: storage buffers, textures,
/// samplers. Programs only carry uniform bindings, so these cannot link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ForeignBinding {
    pub name: String,
    pub kind: &'static str,
    pub group: u32,
    pub binding: u32,
}

pub(super) fn inputs(module: &Module, entry: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    for arg in &entry.function.arguments {
        push_locations(module, arg.name.as_ref(), arg.ty, arg.binding.as_ref(), &mut out);
    }
    out.sort_by_key(|v| v.location);
    out
}

pub(super) fn outputs(module: &Module, entry: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(result) = &entry.function.result {
        push_locations(module, None, result.ty, result.binding.as_ref(), &mut out);
    }
    out.sort_by_key(|v| v.location);
    out
}

/// Struct-typed arguments and results carry their bindings on the members.
fn push_locations(
    module: &Module,
    name: Option<&String>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Varying {
            location: *location,
            name: name.cloned(),
            ty: module.types[ty].inner.clone(),
        }),
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    push_locations(module, member.name.as_ref(), member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

pub(super) fn uniforms(module: &Module) -> Vec<ReflectedUniform> {
    let ctx = module.to_ctx();

    module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            let inner = &module.types[var.ty].inner;

            let fields = match inner {
                TypeInner::Struct { members, .. } => members
                    .iter()
                    .filter_map(|m| {
                        Some(UniformField {
                            name: m.name.clone()?,
                            offset: m.offset,
                            size: module.types[m.ty].inner.size(ctx),
                        })
                    })
                    .collect(),
                _ => Vec::new(),
            };

            Some(ReflectedUniform {
                group: binding.group,
                block: UniformBlock {
                    name: var.name.clone().unwrap_or_default(),
                    binding: binding.binding,
                    size: inner.size(ctx),
                    fields,
                },
            })
        })
        .collect()
}

pub(super) fn foreign_bindings(module: &Module) -> Vec<ForeignBinding> {
    module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space != AddressSpace::Uniform)
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            let kind = match (&var.space, &module.types[var.ty].inner) {
                (AddressSpace::Storage { .. }, _) => "storage buffer",
                (_, TypeInner::Image { .. }) => "texture",
                (_, TypeInner::Sampler { .. }) => "sampler",
                _ => "resource",
            };
            Some(ForeignBinding {
                name: var.name.clone().unwrap_or_default(),
                kind,
                group: binding.group,
                binding: binding.binding,
            })
        })
        .collect()
}
