use std::path::PathBuf;

use kitgen_compose::{ComposeReport, Synthesizer};
use kitgen_core::{GeneratedFile, Result, WriteResult};

use crate::{
    GenContext,
    files::{
        BaseModelGo, ConfigGo, ConstantGo, DbGo, PostgresConfigGo, PostgresModelGo, ServiceGo,
        StatusGo, StatusYml, UtilsGo,
    },
    module::ensure_module,
};

/// The steps that make up a new service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Service,
    Model,
    Config,
    Utils,
    StorageAdapter,
    Compose,
}

impl Generator {
    /// Artifact generators, in the order a new service runs them.
    pub const ARTIFACTS: [Generator; 5] = [
        Generator::Service,
        Generator::Model,
        Generator::Config,
        Generator::Utils,
        Generator::StorageAdapter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Generator::Service => "service",
            Generator::Model => "model",
            Generator::Config => "config",
            Generator::Utils => "utils",
            Generator::StorageAdapter => "storage adapter",
            Generator::Compose => "compose",
        }
    }

    /// Files this generator writes. Empty for [`Generator::Compose`].
    pub fn files(&self, ctx: &GenContext) -> Result<Vec<Box<dyn GeneratedFile>>> {
        let paths = &ctx.config.paths;
        let names = &ctx.config.files;
        let module = ctx.module.as_str();

        let files: Vec<Box<dyn GeneratedFile>> = match self {
            Generator::Service => vec![Box::new(ServiceGo::new(
                ctx.file(&paths.service, &names.service),
                ctx.package_path(&paths.service),
                &ctx.name.camel,
            ))],
            Generator::Model => {
                let package = ctx.package_path(&paths.model);
                vec![
                    Box::new(BaseModelGo::new(
                        ctx.file(&paths.model, &names.model),
                        package.clone(),
                        module,
                        ctx.import_path(&paths.postgres)?,
                    )),
                    Box::new(PostgresModelGo::new(
                        ctx.file(&paths.model, &names.model_postgres),
                        package,
                    )),
                ]
            }
            Generator::Config => vec![
                Box::new(ConfigGo::new(
                    ctx.file(&paths.config, &names.config),
                    ctx.package_path(&paths.config),
                )),
                Box::new(StatusYml::new(ctx.file(&paths.config, &names.status))),
            ],
            Generator::Utils => {
                let package = ctx.package_path(&paths.utils);
                vec![
                    Box::new(UtilsGo::new(
                        ctx.file(&paths.utils, &names.utils),
                        package.clone(),
                        module,
                        ctx.import_path(&paths.config)?,
                    )),
                    Box::new(ConstantGo::new(
                        ctx.file(&paths.utils, &names.utils_constant),
                        package.clone(),
                    )),
                    Box::new(StatusGo::new(
                        ctx.file(&paths.utils, &names.utils_status),
                        package,
                    )),
                ]
            }
            Generator::StorageAdapter => {
                let package = ctx.package_path(&paths.postgres);
                vec![
                    Box::new(PostgresConfigGo::new(
                        ctx.file(&paths.postgres, &names.postgres_config),
                        package.clone(),
                        module,
                        ctx.import_path(&paths.config)?,
                    )),
                    Box::new(DbGo::new(
                        ctx.file(&paths.postgres, &names.postgres_db),
                        package,
                    )),
                ]
            }
            Generator::Compose => Vec::new(),
        };
        Ok(files)
    }

    /// Run this generator against the project root.
    pub fn generate(&self, ctx: &GenContext) -> Result<GenerateReport> {
        let mut report = GenerateReport::new(*self);

        if let Generator::Compose = self {
            let synthesizer = Synthesizer::new(ctx.fs, ctx.config, ctx.project.as_str());
            report.compose = Some(synthesizer.run()?);
            return Ok(report);
        }

        // Resolve every file first so a bad import path writes nothing.
        let files = self.files(ctx)?;

        if let Generator::Service = self {
            report.module_initialized = ensure_module(ctx)?;
        }

        for file in files {
            let path = file.path();
            if let Some(dir) = path.parent() {
                ctx.fs.create_dir_all(dir)?;
            }
            let result = file.write(ctx.fs)?;
            match result {
                WriteResult::Written => tracing::debug!(path = %path.display(), "wrote"),
                WriteResult::Skipped => tracing::debug!(path = %path.display(), "kept existing"),
            }
            report.files.push(FileOutcome { path, result });
        }

        Ok(report)
    }
}

/// A file a generator wrote or left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: WriteResult,
}

/// What one generator did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub generator: Generator,
    pub files: Vec<FileOutcome>,
    /// `go mod init` ran during this invocation.
    pub module_initialized: bool,
    pub compose: Option<ComposeReport>,
}

impl GenerateReport {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            files: Vec::new(),
            module_initialized: false,
            compose: None,
        }
    }

    pub fn written(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter(|f| f.result == WriteResult::Written)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter(|f| f.result == WriteResult::Skipped)
    }
}
