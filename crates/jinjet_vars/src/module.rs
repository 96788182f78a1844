//! Scripted variable modules.
//!
//! A module is a Rhai script. Loading evaluates it into its own namespace
//! and harvests every top-level binding as a context entry; script
//! functions stay callable from inside templates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::value::{Rest, Value};
use minijinja::ErrorKind;
use rhai::{Dynamic, Engine, FnAccess, FuncArgs, Module, Scope, AST};
use tracing::debug;

use crate::context::Context;
use crate::error::ModuleError;

/// Argument pack for calling back into a script function.
struct CallArgs(Vec<Dynamic>);

impl FuncArgs for CallArgs {
    fn parse<ARGS: Extend<Dynamic>>(self, args: &mut ARGS) {
        args.extend(self.0);
    }
}

/// Load a module and expose its top-level bindings as context entries.
///
/// Each module gets its own engine, AST, and scope; nothing is registered
/// globally, so repeated `--module` loads can never collide or leak
/// bindings into one another. Names beginning with an underscore are kept.
/// Values pass through unchanged; top-level functions become callables the
/// template engine can invoke later.
pub fn load_module(path: &Path) -> Result<Context, ModuleError> {
    if !path.exists() {
        return Err(ModuleError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(ModuleError::NotAFile(path.to_path_buf()));
    }

    let engine = Arc::new(Engine::new());
    let ast = engine
        .compile_file(path.to_path_buf())
        .map_err(|err| ModuleError::Compile {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    let namespace =
        Module::eval_ast_as_new(Scope::new(), &ast, &engine).map_err(|err| ModuleError::Eval {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let mut context = Context::new();
    for (name, value) in namespace.iter_var() {
        context.insert(name.to_string(), Value::from_serialize(value));
    }

    let ast = Arc::new(ast);
    let exported: Vec<String> = ast
        .iter_functions()
        .filter(|func| func.access != FnAccess::Private)
        .map(|func| func.name.to_string())
        .collect();
    for name in exported {
        let callable = script_fn(
            engine.clone(),
            ast.clone(),
            path.to_path_buf(),
            name.clone(),
        );
        context.insert(name, callable);
    }

    debug!(
        "Loaded {} bindings from module {}",
        context.len(),
        path.display()
    );
    Ok(context)
}

/// Wrap a script function as a template-callable value.
///
/// Arguments and the return value cross the boundary via serde; failures
/// surface as render-time errors naming the function and its module.
fn script_fn(engine: Arc<Engine>, ast: Arc<AST>, path: PathBuf, name: String) -> Value {
    Value::from_function(
        move |args: Rest<Value>| -> Result<Value, minijinja::Error> {
            let mut call_args = Vec::with_capacity(args.0.len());
            for arg in &args.0 {
                let dynamic = rhai::serde::to_dynamic(arg).map_err(|err| {
                    minijinja::Error::new(
                        ErrorKind::InvalidOperation,
                        format!("invalid argument for {name}(): {err}"),
                    )
                })?;
                call_args.push(dynamic);
            }

            let mut scope = Scope::new();
            let options = rhai::CallFnOptions::new().eval_ast(false);
            let result: Dynamic = engine
                .call_fn_with_options(options, &mut scope, &ast, &name, CallArgs(call_args))
                .map_err(|err| {
                    minijinja::Error::new(
                        ErrorKind::InvalidOperation,
                        format!(
                            "error in module function {name}() from {}: {err}",
                            path.display()
                        ),
                    )
                })?;
            Ok(Value::from_serialize(&result))
        },
    )
}
