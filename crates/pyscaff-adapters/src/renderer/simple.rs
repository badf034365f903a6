//! Renderer for the `{{VARIABLE}}` / `{{#if flag}}` syntax of `RenderContext`.

use std::path::Path;

use pyscaff_core::{
    application::ports::TemplateRenderer,
    domain::{
        DomainError, DomainValidator, EffectiveOptions, ProjectStructure,
        RelativePath, RenderContext, Template, TemplateContent, TemplateNode,
    },
    error::PyscaffResult,
};
use tracing::{instrument, trace};

/// Renders the active nodes of a template: paths and parameterized content
/// go through the render context, literal content is copied as is.
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.id))]
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        options: &EffectiveOptions,
        output_root: &Path,
    ) -> PyscaffResult<ProjectStructure> {
        DomainValidator::validate_template(template)?;

        let mut structure = ProjectStructure::new(output_root);

        for node in template.active_nodes(options) {
            let path = render_path(node.path(), context)?;
            trace!(path = %path, "rendering node");

            match node {
                TemplateNode::File(spec) => {
                    let content = render_content(&spec.content, &path, context)?;
                    structure.add_file(path.into_path_buf(), content, spec.permissions);
                }
                TemplateNode::Directory(spec) => {
                    structure.add_directory(path.into_path_buf(), spec.permissions);
                }
            }
        }

        DomainValidator::validate_project_structure(&structure)?;

        Ok(structure)
    }
}

/// Rendered paths must stay relative, whatever the variables hold.
fn render_path(path: &RelativePath, ctx: &RenderContext) -> Result<RelativePath, DomainError> {
    let rendered = ctx
        .render(path.as_str())
        .map_err(|e| DomainError::RenderFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    RelativePath::try_new(rendered)
}

fn render_content(
    content: &TemplateContent,
    path: &RelativePath,
    ctx: &RenderContext,
) -> Result<String, DomainError> {
    match content {
        TemplateContent::Literal(source) => Ok(source.as_str().to_string()),
        TemplateContent::Parameterized(source) => {
            ctx.render(source.as_str())
                .map_err(|e| DomainError::RenderFailed {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
        }
    }
}
