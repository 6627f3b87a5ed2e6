use crate::{
    error::{Error, Result},
    renderer::{functions::Function, interface::TemplateEngine},
};
use log::trace;
use minijinja::{
    AutoEscape, Environment, Error as EngineError, ErrorKind, UndefinedBehavior, Value,
};

/// MiniJinja-based template engine.
///
/// Output is never auto-escaped and undefined values are rejected, so a
/// fragment that touches a missing field fails instead of printing nothing.
#[derive(Debug)]
pub struct MiniJinjaEngine {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new MiniJinjaEngine with strict undefined handling.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

type EngineResult<T> = std::result::Result<T, EngineError>;

/// Borrows a string argument, rejecting every other kind of value.
fn string_arg<'a>(function: &str, value: &'a Value) -> EngineResult<&'a str> {
    value.as_str().ok_or_else(|| {
        EngineError::new(
            ErrorKind::InvalidOperation,
            format!("{function}: expected a string, got {}", value.kind()),
        )
    })
}

fn indent_error(err: Error) -> EngineError {
    EngineError::new(ErrorKind::InvalidOperation, err.to_string())
}

impl TemplateEngine for MiniJinjaEngine {
    fn add_function(&mut self, name: &str, function: &Function) {
        let name = name.to_string();
        // Filters receive the piped value first; it is passed on as the last
        // positional argument.
        match function {
            Function::Unary(f) => {
                let (call, pipe) = (f.clone(), f.clone());
                let (call_name, pipe_name) = (name.clone(), name.clone());
                self.env.add_function(name.clone(), move |s: Value| {
                    Ok::<_, EngineError>(call(string_arg(&call_name, &s)?))
                });
                self.env.add_filter(name, move |s: Value| {
                    Ok::<_, EngineError>(pipe(string_arg(&pipe_name, &s)?))
                });
            }
            Function::Binary(f) => {
                let (call, pipe) = (f.clone(), f.clone());
                let (call_name, pipe_name) = (name.clone(), name.clone());
                self.env.add_function(name.clone(), move |a: Value, s: Value| {
                    let a = string_arg(&call_name, &a)?;
                    Ok::<_, EngineError>(call(a, string_arg(&call_name, &s)?))
                });
                self.env.add_filter(name, move |s: Value, a: Value| {
                    let a = string_arg(&pipe_name, &a)?;
                    Ok::<_, EngineError>(pipe(a, string_arg(&pipe_name, &s)?))
                });
            }
            Function::Indent(f) => {
                let (call, pipe) = (f.clone(), f.clone());
                let (call_name, pipe_name) = (name.clone(), name.clone());
                self.env.add_function(name.clone(), move |n: i64, s: Value| {
                    call(n, string_arg(&call_name, &s)?).map_err(indent_error)
                });
                self.env.add_filter(name, move |s: Value, n: i64| {
                    pipe(n, string_arg(&pipe_name, &s)?).map_err(indent_error)
                });
            }
            Function::Ternary(f) => {
                let (call, pipe) = (f.clone(), f.clone());
                let (call_name, pipe_name) = (name.clone(), name.clone());
                self.env.add_function(name.clone(), move |cond: Value, a: Value, b: Value| {
                    let a = string_arg(&call_name, &a)?;
                    let b = string_arg(&call_name, &b)?;
                    Ok::<_, EngineError>(call(cond.is_true(), a, b))
                });
                self.env.add_filter(name, move |b: Value, cond: Value, a: Value| {
                    let a = string_arg(&pipe_name, &a)?;
                    let b = string_arg(&pipe_name, &b)?;
                    Ok::<_, EngineError>(pipe(cond.is_true(), a, b))
                });
            }
        }
    }

    fn add_global(&mut self, name: &str, value: &serde_json::Value) {
        self.env
            .add_global(name.to_string(), Value::from_serialize(value));
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        trace!("Parsing fragment '{name}'");
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(|source| Error::Parse {
                name: name.to_string(),
                source,
            })
    }

    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String> {
        let tmpl = self.env.get_template(name).map_err(|err| match err.kind() {
            ErrorKind::TemplateNotFound => Error::Resolution {
                name: name.to_string(),
            },
            _ => Error::Execution(err),
        })?;
        tmpl.render(Value::from_serialize(data))
            .map_err(Error::Execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine_with(name: &str, source: &str) -> MiniJinjaEngine {
        let mut engine = MiniJinjaEngine::new();
        engine.add_function("wrap", &Function::binary(|a, s| format!("{a}{s}{a}")));
        engine.add_template(name, source).unwrap();
        engine
    }

    #[test]
    fn test_function_and_filter_argument_order() {
        let engine = engine_with("t", r#"{{ wrap("*", "x") }} {{ "y" | wrap("_") }}"#);
        assert_eq!(engine.render_named("t", &json!({})).unwrap(), "*x* _y_");
    }

    #[test]
    fn test_non_string_argument_is_rejected() {
        let engine = engine_with("t", r#"{{ wrap("*", value) }}"#);
        for value in [json!(42), json!(null), json!(["a"]), json!({ "a": 1 })] {
            let err = engine
                .render_named("t", &json!({ "value": value }))
                .unwrap_err();
            match err {
                Error::Execution(err) => {
                    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
                }
                other => panic!("unexpected error for {value}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_indent_failure_is_an_execution_error() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_function("indent", &Function::indent(|_, _| Err(Error::Configuration)));
        engine.add_template("t", r##"{{ indent(1, "#") }}"##).unwrap();
        let err = engine.render_named("t", &json!({})).unwrap_err();
        match err {
            Error::Execution(err) => assert_eq!(err.kind(), ErrorKind::InvalidOperation),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_no_auto_escape() {
        let engine = engine_with("page.html", "{{ value }}");
        let out = engine
            .render_named("page.html", &json!({ "value": "<b>&</b>" }))
            .unwrap();
        assert_eq!(out, "<b>&</b>");
    }

    #[test]
    fn test_undefined_field_is_an_error() {
        let engine = engine_with("t", "{{ missing.field }}");
        let err = engine.render_named("t", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Execution(_)));
    }

    #[test]
    fn test_syntax_error_is_a_parse_error() {
        let mut engine = MiniJinjaEngine::new();
        let err = engine.add_template("broken", "{{ unclosed").unwrap_err();
        assert!(matches!(err, Error::Parse { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_unknown_template_is_a_resolution_error() {
        let engine = MiniJinjaEngine::new();
        let err = engine.render_named("all", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Resolution { ref name } if name == "all"));
    }

    #[test]
    fn test_global_is_visible() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_global("settings", &json!({ "escape_pipe": true }));
        engine.add_template("t", "{{ settings.escape_pipe }}").unwrap();
        assert_eq!(engine.render_named("t", &json!({})).unwrap(), "true");
    }

    #[test]
    fn test_tojson_filter_is_available() {
        let engine = engine_with("t", "{{ value | tojson }}");
        let out = engine
            .render_named("t", &json!({ "value": "10.0.0.0/16" }))
            .unwrap();
        assert_eq!(out, "\"10.0.0.0/16\"");
    }
}
