use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::debug;
use rhai::{CallFnOptions, Dynamic, Engine, FuncArgs, ImmutableString, Scope, AST};

use super::api::{register_host_api, HostRoots};
use super::{FileHook, HookEvent, HookScope, HookSource, LifecycleHook};
use crate::utils::error::{AlvuError, Result};

/// Name of the top-level variable that scopes a hook to one page
pub const FOR_FILE_MARKER: &str = "ForFile";

const WRITER: &str = "Writer";

/// A hook script evaluated once and kept alive for the whole build
pub struct RhaiHook {
    path: PathBuf,
    engine: Engine,
    ast: AST,
    context: Mutex<Scope<'static>>,
}

impl RhaiHook {
    /// Compile and run `path` top to bottom, then read its `ForFile` marker
    pub fn load(path: &Path, roots: &HostRoots) -> Result<(Self, HookScope)> {
        let mut engine = Engine::new();
        register_host_api(&mut engine, roots);

        let ast = engine
            .compile_file(path.to_path_buf())
            .map_err(|e| AlvuError::hook(path, e))?;

        let mut scope = Scope::new();
        engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| AlvuError::hook(path, e))?;

        let marker = scope
            .get_value::<ImmutableString>(FOR_FILE_MARKER)
            .map(|name| name.to_string());
        let hook_scope = HookScope::from_marker(marker.as_deref());
        debug!("Loaded hook {} ({:?})", path.display(), hook_scope);

        let hook = RhaiHook {
            path: path.to_path_buf(),
            engine,
            ast,
            context: Mutex::new(scope),
        };
        Ok((hook, hook_scope))
    }

    /// Load `path` straight into a `HookSource`
    pub fn load_source(path: &Path, roots: &HostRoots) -> Result<HookSource> {
        let (hook, scope) = Self::load(path, roots)?;
        Ok(HookSource::new(path, scope, hook))
    }

    pub fn defines(&self, name: &str, arity: usize) -> bool {
        self.ast
            .iter_functions()
            .any(|f| f.name == name && f.params.len() == arity)
    }

    fn call(&self, name: &str, args: impl FuncArgs) -> Result<Dynamic> {
        let mut scope = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);

        self.engine
            .call_fn_with_options::<Dynamic>(options, &mut scope, &self.ast, name, args)
            .map_err(|e| AlvuError::hook(&self.path, format!("{}: {}", name, e)))
    }

    fn run_event(&self, event: HookEvent) -> Result<()> {
        if self.defines(event.name(), 0) {
            self.call(event.name(), ())?;
        }
        Ok(())
    }
}

impl LifecycleHook for RhaiHook {
    fn on_start(&self) -> Result<()> {
        self.run_event(HookEvent::OnStart)
    }

    fn on_finish(&self) -> Result<()> {
        self.run_event(HookEvent::OnFinish)
    }
}

impl FileHook for RhaiHook {
    fn write(&self, request: &str) -> Result<Option<String>> {
        if !self.defines(WRITER, 1) {
            return Ok(None);
        }

        let result = self.call(WRITER, (request.to_string(),))?;
        if result.is_unit() {
            return Ok(None);
        }
        if result.is_string() {
            return Ok(result.into_string().ok());
        }

        // Maps and arrays come back as JSON; anything else is passed on as
        // text and rejected by the response parser
        Ok(Some(
            serde_json::to_string(&result).unwrap_or_else(|_| result.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn roots(dir: &TempDir) -> HostRoots {
        HostRoots::new(dir.path(), dir.path().join("dist"))
    }

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_scope_marker() {
        let tmp = TempDir::new().unwrap();
        let scoped = script(&tmp, "a.rhai", r#"let ForFile = "blog/post.md";"#);
        let global = script(&tmp, "b.rhai", "fn Writer(input) { () }");

        let (_, scope) = RhaiHook::load(&scoped, &roots(&tmp)).unwrap();
        assert_eq!(scope, HookScope::ForFile("blog/post.md".to_string()));

        let (_, scope) = RhaiHook::load(&global, &roots(&tmp)).unwrap();
        assert_eq!(scope, HookScope::Global);
    }

    #[test]
    fn test_writer_returning_map() {
        let tmp = TempDir::new().unwrap();
        let path = script(
            &tmp,
            "tag.rhai",
            r#"
            fn Writer(input) {
                let req = json_decode(input);
                #{ data: #{ tag: "x", page: req.name } }
            }
            "#,
        );

        let (hook, _) = RhaiHook::load(&path, &roots(&tmp)).unwrap();
        let raw = hook.write(r#"{"name":"index.md"}"#).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["data"]["tag"], "x");
        assert_eq!(value["data"]["page"], "index.md");
    }

    #[test]
    fn test_writer_returning_json_string() {
        let tmp = TempDir::new().unwrap();
        let path = script(
            &tmp,
            "s.rhai",
            r#"fn Writer(input) { json_encode(#{ content: "<p>replaced</p>" }) }"#,
        );

        let (hook, _) = RhaiHook::load(&path, &roots(&tmp)).unwrap();
        assert_eq!(
            hook.write("{}").unwrap().as_deref(),
            Some(r#"{"content":"<p>replaced</p>"}"#)
        );
    }

    #[test]
    fn test_missing_functions_are_no_ops() {
        let tmp = TempDir::new().unwrap();
        let path = script(&tmp, "empty.rhai", "let x = 1;");

        let (hook, _) = RhaiHook::load(&path, &roots(&tmp)).unwrap();
        hook.on_start().unwrap();
        hook.on_finish().unwrap();
        assert!(hook.write("{}").unwrap().is_none());
    }

    #[test]
    fn test_runtime_error_names_the_hook() {
        let tmp = TempDir::new().unwrap();
        let path = script(&tmp, "boom.rhai", r#"fn OnStart() { throw "boom"; }"#);

        let (hook, _) = RhaiHook::load(&path, &roots(&tmp)).unwrap();
        let err = hook.on_start().unwrap_err();
        assert!(matches!(err, AlvuError::Hook { .. }));
        assert!(err.to_string().contains("boom.rhai"));
    }

    #[test]
    fn test_syntax_error_fails_load() {
        let tmp = TempDir::new().unwrap();
        let path = script(&tmp, "bad.rhai", "fn Writer(input) {");
        assert!(RhaiHook::load(&path, &roots(&tmp)).is_err());
    }
}
