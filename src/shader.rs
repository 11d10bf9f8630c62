use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};

use super::{Error, WorkgroupSize};

/// A parsed and validated WGSL module.
///
/// Stands in for the compiled-kernel object a graphics backend would hold;
/// reflection queries answer from the naga IR.
pub struct Shader {
    module: naga::Module,
}

fn emit_annotated_error<E: std::error::Error>(ann_err: &naga::WithSpan<E>, source: &str) {
    let files = SimpleFile::new("", source);
    let config = term::Config::default();
    let writer = StandardStream::stderr(ColorChoice::Auto);

    let diagnostic = Diagnostic::error().with_labels(
        ann_err
            .spans()
            .map(|&(span, ref desc)| {
                Label::primary((), span.to_range().unwrap()).with_message(desc.to_owned())
            })
            .collect(),
    );

    term::emit(&mut writer.lock(), &config, &files, &diagnostic).expect("cannot write error");
}

impl Shader {
    /// Parse and validate WGSL `source`.
    ///
    /// Diagnostics go to stderr; the returned error only classifies the stage
    /// that failed.
    pub fn try_parse(source: &str) -> Result<Self, Error> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| {
            e.emit_to_stderr_with_path(source, "");
            Error::ParseFailed
        })?;

        // Bindings are set up by the backend at pipeline creation, ignore here
        let flags = naga::valid::ValidationFlags::all() ^ naga::valid::ValidationFlags::BINDINGS;
        naga::valid::Validator::new(flags, naga::valid::Capabilities::empty())
            .validate(&module)
            .map_err(|e| {
                emit_annotated_error(&e, source);
                Error::ValidationFailed
            })?;

        log::debug!(
            "Parsed shader with {} entry points",
            module.entry_points.len()
        );
        Ok(Self { module })
    }

    /// Declared `@workgroup_size` of the named compute entry point.
    pub fn workgroup_size(&self, entry_point: &str) -> Result<WorkgroupSize, Error> {
        let ep = self
            .module
            .entry_points
            .iter()
            .find(|ep| ep.name == entry_point)
            .ok_or_else(|| Error::UnknownEntryPoint {
                name: entry_point.to_string(),
            })?;
        if ep.stage != naga::ShaderStage::Compute {
            return Err(Error::NotCompute {
                name: entry_point.to_string(),
            });
        }
        WorkgroupSize::new(ep.workgroup_size)
    }

    /// Size in bytes of the named shader struct, e.g. for a buffer stride.
    pub fn get_struct_size(&self, struct_name: &str) -> Result<u32, Error> {
        match self
            .module
            .types
            .iter()
            .find(|&(_, ty)| ty.name.as_deref() == Some(struct_name))
        {
            Some((_, ty)) => match ty.inner {
                naga::TypeInner::Struct { members: _, span } => Ok(span),
                _ => Err(Error::NotAStruct {
                    name: struct_name.to_string(),
                }),
            },
            None => Err(Error::UnknownStruct {
                name: struct_name.to_string(),
            }),
        }
    }
}
