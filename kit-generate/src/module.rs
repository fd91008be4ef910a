//! Stamping a Go module identity on a new service directory.

use kitgen_core::Result;

use crate::GenContext;

/// Marker left by a previous successful run.
pub const GO_MOD: &str = "go.mod";

/// Run `go mod init <module>` in the service directory unless `go.mod`
/// is already there. Returns whether the command ran.
pub fn ensure_module(ctx: &GenContext) -> Result<bool> {
    let dir = ctx.service_dir();
    if ctx.fs.exists(&dir.join(GO_MOD)) {
        tracing::debug!(dir = %dir.display(), "go.mod present, keeping module identity");
        return Ok(false);
    }

    ctx.fs.create_dir_all(&dir)?;
    ctx.executor
        .run(&dir, "go", &["mod", "init", ctx.module.as_str()])?;
    tracing::info!(module = %ctx.module, dir = %dir.display(), "initialized go module");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kitgen_config::Config;
    use kitgen_core::{
        Error,
        testing::{MemoryFilesystem, RecordingExecutor},
    };

    use super::*;
    use crate::ServiceName;

    #[test]
    fn test_runs_go_mod_init_in_service_dir() {
        let fs = MemoryFilesystem::new();
        let exec = RecordingExecutor::new();
        let config = Config::default();
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("UserProfile").unwrap())
            .with_module(Some("github.com/acme/UserProfile"));

        assert!(ensure_module(&ctx).unwrap());

        let calls = exec.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].dir, PathBuf::from("user_profile"));
        assert_eq!(calls[0].program, "go");
        assert_eq!(
            calls[0].args,
            vec!["mod", "init", "github.com/acme/user_profile"]
        );
    }

    #[test]
    fn test_skipped_when_go_mod_exists() {
        let fs = MemoryFilesystem::new().with_file("shop/go.mod", "module shop\n");
        let exec = RecordingExecutor::new();
        let config = Config::default();
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("shop").unwrap());

        assert!(!ensure_module(&ctx).unwrap());
        assert!(exec.invocations().is_empty());
    }

    #[test]
    fn test_command_failure_is_toolchain_error() {
        let fs = MemoryFilesystem::new();
        let exec = RecordingExecutor::failing("go: command not found");
        let config = Config::default();
        let ctx = GenContext::new(&fs, &config, &exec, ServiceName::new("shop").unwrap());

        let err = ensure_module(&ctx).unwrap_err();
        match *err {
            Error::Toolchain { stderr, .. } => assert_eq!(stderr, "go: command not found"),
            other => panic!("expected toolchain error, got {:?}", other),
        }
    }
}
