//! Tests for the standard library through whole programs

use pretty_assertions::assert_eq;
use sprig::*;

fn eval(src: &str) -> Result<Value> {
    let mut env = Environment::with_prelude();
    run(src, &mut env)
}

fn eval_kind(src: &str) -> EvalError {
    match eval(src) {
        Err(SprigError::Eval(err)) => err.kind,
        other => panic!("Expected runtime error, got {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_bare_environment_has_nothing() {
    let mut env = Environment::new();
    let err = run("(+ 1 2)", &mut env).unwrap_err();
    assert!(matches!(
        err,
        SprigError::Eval(RuntimeError {
            kind: EvalError::UndefinedIdentifier { .. },
            ..
        })
    ));
}

#[test]
fn test_import_str_on_demand() {
    assert!(matches!(
        eval_kind("(str:upper \"a\")"),
        EvalError::UndefinedIdentifier { .. }
    ));
    assert_eq!(
        eval("(import str) (str:upper \"a\")").unwrap(),
        Value::text("A")
    );
}

#[test]
fn test_import_inside_do_is_local() {
    assert!(matches!(
        eval_kind("(do (import str)) (str:lower \"A\")"),
        EvalError::UndefinedIdentifier { .. }
    ));
}

#[test]
fn test_import_unknown() {
    assert_eq!(
        eval_kind("(import py)"),
        EvalError::UnknownModule {
            name: "py".to_string()
        }
    );
}

#[test]
fn test_library_registration_contract() {
    let mut exports = Exports::new();
    exports.insert(
        "double".to_string(),
        Value::native("double", 1, |args, _| {
            let n = args[0].as_number().unwrap_or(0.0);
            Ok(Value::Number(n * 2.0))
        }),
    );
    let mut env = Environment::with_prelude();
    env.import(&exports);
    assert_eq!(run("(double 21)", &mut env).unwrap(), Value::Number(42.0));
}

// ═══════════════════════════════════════════════════════════════════════
// Core
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_constants() {
    assert_eq!(eval("true").unwrap(), Value::Bool(true));
    assert_eq!(eval("false").unwrap(), Value::Bool(false));
    assert_eq!(eval("null").unwrap(), Value::Null);
}

#[test]
fn test_binding_forms_check_arguments() {
    assert!(matches!(
        eval_kind("(define x)"),
        EvalError::SpecialFormArity { .. }
    ));
    assert!(matches!(
        eval_kind("(set \"x\" 1)"),
        EvalError::NotAnIdentifier { .. }
    ));
}

#[test]
fn test_print_returns_last_value() {
    assert_eq!(eval("(print 1 \"two\" 3)").unwrap(), Value::Number(3.0));
    assert_eq!(eval("(print)").unwrap(), Value::Null);
}

#[test]
fn test_type_of_values() {
    assert_eq!(
        eval("(#l (type 1) (type \"s\") (type (#l)) (type (fn () 1)) (type null))").unwrap(),
        Value::from(vec!["number", "text", "list", "fn", "null"])
    );
}

#[test]
fn test_error_needs_text() {
    assert!(matches!(eval_kind("(error 1)"), EvalError::TypeError { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Ops
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_num_parses_text() {
    assert_eq!(eval("(+ (num \"1.5\") 1)").unwrap(), Value::Number(2.5));
    assert!(matches!(
        eval_kind("(num \"one\")"),
        EvalError::InvalidNumber { .. }
    ));
}

#[test]
fn test_mod_and_division() {
    assert_eq!(eval("(mod -7 3)").unwrap(), Value::Number(2.0));
    assert_eq!(eval_kind("(/ 1 0)"), EvalError::DivisionByZero);
}

#[test]
fn test_boolean_logic() {
    assert_eq!(
        eval("(and (< 1 2) (not (= 1 2)))").unwrap(),
        Value::Bool(true)
    );
    assert!(matches!(eval_kind("(or 1 true)"), EvalError::TypeError { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Control
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_for_collects_into_list() {
    let src = r#"
        (define squares (#l))
        (for i (1 4) (set squares (#push squares (* i i))))
        squares
    "#;
    assert_eq!(eval(src).unwrap(), Value::from(vec![1, 4, 9]));
}

#[test]
fn test_for_returns_null_and_body_may_move_variable() {
    let src = r#"
        (define count 0)
        (define result (for i (10) (set count (+ count 1)) (set i (+ i 4))))
        (#l result count)
    "#;
    assert_eq!(
        eval(src).unwrap(),
        Value::from(vec![Value::Null, Value::from(2)])
    );
}

#[test]
fn test_for_needs_parenthesized_range() {
    assert!(matches!(
        eval_kind("(for i 10 i)"),
        EvalError::TypeError { .. }
    ));
    assert!(matches!(
        eval_kind("(for i () i)"),
        EvalError::InvalidArgument { .. }
    ));
}

#[test]
fn test_while_with_counter() {
    let src = r#"
        (define i 0)
        (define acc "")
        (while (< i 3)
            (set acc (#push acc i))
            (set i (+ i 1)))
        acc
    "#;
    assert_eq!(eval(src).unwrap(), Value::text("012"));
}

#[test]
fn test_while_condition_must_be_bool() {
    assert!(matches!(
        eval_kind("(while 1 2)"),
        EvalError::TypeError { .. }
    ));
}

#[test]
fn test_repeat_scope_is_discarded() {
    assert!(matches!(
        eval_kind("(repeat 2 (define inside 1)) inside"),
        EvalError::UndefinedIdentifier { .. }
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// List and Text
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_nested_list_element_is_a_copy() {
    let src = r#"
        (define grid (#l (#l 1 2) (#l 3 4)))
        (define row (#nth grid 0))
        (set row (#set row 0 9))
        (#l (#nth (#nth grid 0) 0) (#nth row 0))
    "#;
    assert_eq!(eval(src).unwrap(), Value::from(vec![1, 9]));
}

#[test]
fn test_fmt() {
    assert_eq!(
        eval("(import str) (str:fmt \"% of %%: %\" 3 (#l 1 2))").unwrap(),
        Value::text("3 of %: (1, 2)")
    );
    assert!(matches!(
        eval_kind("(import str) (str:fmt \"% %\" 1)"),
        EvalError::InvalidArgument { .. }
    ));
}
