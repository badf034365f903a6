//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Load the template and resolve overrides against its schema
//! 2. Pre-render hook: validate the project name, derive its identity
//! 3. Render the template into a `ProjectStructure`
//! 4. Write to filesystem, rolling back on failure
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{Span, debug, field, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{
        DomainValidator as validator, EffectiveOptions, FsEntry, ProjectIdentity,
        ProjectStructure, RenderContext, Template,
    },
    error::PyscaffResult,
};

/// One generation request.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Option overrides; everything else keeps its default.
    pub overrides: BTreeMap<String, String>,
    /// The project is created at `<output_dir>/<project_name>`.
    pub output_dir: PathBuf,
    /// Replace an existing project directory instead of failing.
    pub overwrite: bool,
}

impl GenerateRequest {
    pub fn new(overrides: BTreeMap<String, String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            overrides,
            output_dir: output_dir.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub request_id: Uuid,
    pub template: String,
    pub root: PathBuf,
    pub identity: ProjectIdentity,
    pub options: EffectiveOptions,
    pub files: usize,
    pub directories: usize,
}

/// Everything resolved for a request before anything touches the disk.
struct Prepared {
    template: Template,
    identity: ProjectIdentity,
    options: EffectiveOptions,
    structure: ProjectStructure,
}

/// Main scaffolding service.
///
/// Orchestrates option resolution, rendering, and writing.
pub struct ScaffoldService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use pyscaff_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(
    ///     store,      // impl TemplateStore
    ///     renderer,   // impl TemplateRenderer
    ///     filesystem, // impl Filesystem
    /// );
    /// ```
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Generate a project.
    ///
    /// Validation failures (unknown option, bad value, bad name) return
    /// before the filesystem is touched. A write failure removes every
    /// directory this call created, including missing parents of the
    /// output directory, and returns the original error.
    #[instrument(
        skip_all,
        fields(
            request_id = field::Empty,
            output_dir = %request.output_dir.display(),
        )
    )]
    pub fn generate(&self, request: GenerateRequest) -> PyscaffResult<GenerationReport> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", field::display(request_id));

        let prepared = self.prepare(&request)?;
        let structure = &prepared.structure;

        if self.filesystem.exists(structure.root()) {
            if !request.overwrite {
                return Err(ApplicationError::ProjectExists {
                    path: structure.root().to_path_buf(),
                }
                .into());
            }
            warn!(root = %structure.root().display(), "Overwriting existing project");
            self.filesystem.remove_dir_all(structure.root())?;
        }

        self.write_structure(structure)?;

        info!(
            project = %prepared.identity,
            files = structure.file_count(),
            directories = structure.directory_count(),
            "Project generated"
        );

        Ok(GenerationReport {
            request_id,
            template: prepared.template.id.to_string(),
            root: structure.root().to_path_buf(),
            files: structure.file_count(),
            directories: structure.directory_count(),
            identity: prepared.identity,
            options: prepared.options,
        })
    }

    /// Dry run: everything `generate` does except writing.
    #[instrument(skip_all, fields(output_dir = %request.output_dir.display()))]
    pub fn plan(&self, request: &GenerateRequest) -> PyscaffResult<ProjectStructure> {
        Ok(self.prepare(request)?.structure)
    }

    /// Resolve options for `overrides` without rendering.
    pub fn resolve_options(
        &self,
        overrides: &BTreeMap<String, String>,
    ) -> PyscaffResult<EffectiveOptions> {
        let template = self.store.load()?;
        Ok(template.schema.resolve(overrides)?)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn prepare(&self, request: &GenerateRequest) -> PyscaffResult<Prepared> {
        let template = self.store.load()?;
        debug!(template = %template.id, location = %self.store.location(), "Template loaded");

        let options = template.schema.resolve(&request.overrides)?;

        // Pre-render hook: the name rule is stricter than the option domain.
        let identity = validator::project_identity(options.project_name())?;

        let root = request.output_dir.join(identity.name());
        let context = RenderContext::for_project(&identity, &options, &template.schema);
        let structure = self.renderer.render(&template, &context, &options, &root)?;
        validator::validate_project_structure(&structure)?;

        debug!(
            entries = structure.entry_count(),
            root = %root.display(),
            "Template rendered"
        );

        Ok(Prepared {
            template,
            identity,
            options,
            structure,
        })
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(&self, structure: &ProjectStructure) -> PyscaffResult<()> {
        let created = self.outermost_missing(structure.root());

        match self.write_all(structure) {
            Ok(()) => {
                debug!("Successfully wrote all entries");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(&created);
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> PyscaffResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for entry in structure.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);

                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    self.filesystem.write_file(&path, &file.content)?;

                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// The highest ancestor of `root` that does not exist yet.
    ///
    /// `create_dir_all(root)` creates it and everything below, so it is what
    /// a rollback removes. Filesystem roots are never returned.
    fn outermost_missing(&self, root: &Path) -> PathBuf {
        root.ancestors()
            .take_while(|dir| dir.parent().is_some() && !self.filesystem.exists(dir))
            .last()
            .unwrap_or(root)
            .to_path_buf()
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!(path = %root.display(), "Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::ports::MockFilesystem,
        domain::{
            Condition, DirectorySpec, FileSpec, OptionSchema, OptionSpec, Permissions,
            RelativePath, TemplateContent, TemplateId, TemplateMetadata, TemplateNode, keys,
        },
        error::PyscaffError,
    };
    use mockall::predicate::*;

    struct FixedStore;

    impl TemplateStore for FixedStore {
        fn load(&self) -> PyscaffResult<Template> {
            let schema = OptionSchema::new(
                2,
                vec![
                    OptionSpec::text(keys::PROJECT_NAME, "my-project"),
                    OptionSpec::choice(keys::DOCS, ["y", "n"]),
                ],
            )?;
            let path = |p: &str| RelativePath::try_new(p);
            Ok(Template::builder()
                .id(TemplateId::new("fixture", "1.0.0")?)
                .metadata(TemplateMetadata::new("Fixture"))
                .schema(schema)
                .add_node(TemplateNode::File(FileSpec::new(
                    path("README.md")?,
                    TemplateContent::Parameterized("# {{PROJECT_NAME}}\n".into()),
                )))
                .add_node(TemplateNode::Directory(
                    DirectorySpec::new(path("docs")?).when(Condition::enabled(keys::DOCS)),
                ))
                .build()?)
        }

        fn location(&self) -> String {
            "fixture".into()
        }
    }

    /// Renders active nodes with the domain context, no path templating.
    struct PlainRenderer;

    impl TemplateRenderer for PlainRenderer {
        fn render(
            &self,
            template: &Template,
            context: &RenderContext,
            options: &EffectiveOptions,
            output_root: &Path,
        ) -> PyscaffResult<ProjectStructure> {
            let mut structure = ProjectStructure::new(output_root);
            for node in template.active_nodes(options) {
                match node {
                    TemplateNode::File(f) => {
                        let content = match &f.content {
                            TemplateContent::Literal(s) => s.as_str().to_string(),
                            TemplateContent::Parameterized(s) => {
                                context.render(s.as_str()).map_err(|e| {
                                    ApplicationError::RenderingFailed {
                                        reason: e.to_string(),
                                    }
                                })?
                            }
                        };
                        structure.add_file(f.path.as_path(), content, f.permissions);
                    }
                    TemplateNode::Directory(d) => {
                        structure.add_directory(d.path.as_path(), Permissions::default());
                    }
                }
            }
            Ok(structure)
        }
    }

    fn service(fs: MockFilesystem) -> ScaffoldService {
        ScaffoldService::new(Box::new(FixedStore), Box::new(PlainRenderer), Box::new(fs))
    }

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn generate_writes_every_entry() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/out/my-project/README.md")), eq("# my-project\n"))
            .times(1)
            .returning(|_, _| Ok(()));

        let report = service(fs)
            .generate(GenerateRequest::new(BTreeMap::new(), "/out"))
            .unwrap();

        assert_eq!(report.root, PathBuf::from("/out/my-project"));
        assert_eq!(report.files, 1);
        assert_eq!(report.directories, 1);
        assert_eq!(report.template, "fixture@1.0.0");
        assert!(!report.request_id.is_nil());
    }

    fn disk_full(path: &Path) -> PyscaffResult<()> {
        Err(ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: "disk full".into(),
        }
        .into())
    }

    #[test]
    fn write_failure_rolls_back_root() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/out"));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| disk_full(p));
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/out/my-project")))
            .times(1)
            .returning(|_| Ok(()));

        let err = service(fs)
            .generate(GenerateRequest::new(BTreeMap::new(), "/out"))
            .unwrap_err();

        assert!(matches!(
            err,
            PyscaffError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn write_failure_removes_created_output_parents() {
        let mut fs = MockFilesystem::new();
        // Only /srv exists; /srv/new/nested is created by the run.
        fs.expect_exists()
            .returning(|p| p == Path::new("/srv") || p == Path::new("/"));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| disk_full(p));
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/srv/new")))
            .times(1)
            .returning(|_| Ok(()));

        let err = service(fs)
            .generate(GenerateRequest::new(BTreeMap::new(), "/srv/new/nested"))
            .unwrap_err();
        assert!(matches!(
            err,
            PyscaffError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn rollback_never_climbs_to_the_filesystem_root() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| disk_full(p));
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/out")))
            .times(1)
            .returning(|_| Ok(()));

        assert!(
            service(fs)
                .generate(GenerateRequest::new(BTreeMap::new(), "/out"))
                .is_err()
        );
    }

    #[test]
    fn invalid_name_touches_nothing() {
        // No expectations: any filesystem call panics.
        let fs = MockFilesystem::new();
        let err = service(fs)
            .generate(GenerateRequest::new(
                overrides(&[(keys::PROJECT_NAME, "my_project")]),
                "/out",
            ))
            .unwrap_err();
        assert!(err.is_name_validation());
    }

    #[test]
    fn unknown_option_touches_nothing() {
        let fs = MockFilesystem::new();
        let err = service(fs)
            .generate(GenerateRequest::new(overrides(&[("docs", "n")]), "/out"))
            .unwrap_err();
        assert!(err.is_invalid_option());
    }

    #[test]
    fn existing_root_is_refused_without_overwrite() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);

        let err = service(fs)
            .generate(GenerateRequest::new(BTreeMap::new(), "/out"))
            .unwrap_err();
        assert!(matches!(
            err,
            PyscaffError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn overwrite_removes_old_tree_first() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/out/my-project")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));

        let report = service(fs)
            .generate(GenerateRequest::new(BTreeMap::new(), "/out").overwrite(true))
            .unwrap();
        assert_eq!(report.files, 1);
    }

    #[test]
    fn plan_honours_conditions_without_writing() {
        let fs = MockFilesystem::new();
        let structure = service(fs)
            .plan(&GenerateRequest::new(
                overrides(&[(keys::DOCS, "n")]),
                "/out",
            ))
            .unwrap();
        assert_eq!(structure.file_count(), 1);
        assert_eq!(structure.directory_count(), 0);
    }
}
