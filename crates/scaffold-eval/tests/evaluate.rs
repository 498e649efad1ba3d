use scaffold_eval::{evaluate, evaluate_str, Environment, Value};
use scaffold_parse::parse_str;

fn eval(src: &str) -> Value {
    evaluate_str(src, &mut Environment::new())
}

fn eval_err(src: &str) -> String {
    match eval(src) {
        Value::Error(msg) => msg,
        other => panic!("expected an error for {src:?}, got {other:?}"),
    }
}

#[test]
fn integer_and_float_addition() {
    assert_eq!(eval("123 + 456"), Value::Int(579));
    assert_eq!(eval("123.0 + 456.0"), Value::Float(579.0));
    assert_eq!(eval("1 + 0.5"), Value::Float(1.5));
}

#[test]
fn power_always_yields_float() {
    assert_eq!(eval("41 ** 2"), Value::Float(1681.0));
    assert_eq!(eval("2 ** 3 ** 2"), Value::Float(512.0));
    assert_eq!(eval("1 + 2 * 3 ** 2"), Value::Float(19.0));
}

#[test]
fn null_comparisons_are_asymmetric() {
    assert_eq!(eval("null == null"), Value::Bool(true));
    assert_eq!(eval("null != null"), Value::Bool(false));
    assert_eq!(eval("null >= null"), Value::Bool(true));
    assert_eq!(eval("null > null"), Value::Bool(false));
    assert_eq!(eval("null <= null"), Value::Bool(true));
    assert_eq!(eval("null < null"), Value::Bool(false));
}

#[test]
fn null_against_values() {
    assert_eq!(eval("null == 1"), Value::Bool(false));
    assert_eq!(eval("\"x\" != null"), Value::Bool(true));
    assert_eq!(eval("null < 1"), Value::Bool(false));
}

#[test]
fn null_plus_null_is_empty_string() {
    assert_eq!(eval("null + null"), Value::Str(String::new()));
    assert!(eval("null + 1").is_error());
}

#[test]
fn string_concatenation_uses_display_forms() {
    assert_eq!(eval("\"n\" + 1"), Value::Str("n1".to_string()));
    assert_eq!(eval("1.5 + \"x\""), Value::Str("1.5x".to_string()));
    assert_eq!(eval("\"a\" + null"), Value::Str("a".to_string()));
    assert_eq!(eval("\"v\" + true"), Value::Str("vtrue".to_string()));
    assert_eq!(eval("'c' + \"d\""), Value::Str("cd".to_string()));
}

#[test]
fn ternary_picks_one_branch() {
    assert_eq!(eval("2 > 3 ? 2 : 3"), Value::Int(3));

    let mut env = Environment::new();
    let v = evaluate_str("true ? a := 1 : (b := 2)", &mut env);
    assert_eq!(v, Value::Int(1));
    assert_eq!(env.local("a"), Some(&Value::Int(1)));
    assert!(env.local("b").is_none(), "untaken branch must not run");
}

#[test]
fn assignment_binds_and_returns_value() {
    let mut env = Environment::new();
    assert_eq!(evaluate_str("x := 3", &mut env), Value::Int(3));
    assert_eq!(env.local("x"), Some(&Value::Int(3)));

    assert_eq!(evaluate_str("x := x * 2", &mut env), Value::Int(6));
    assert_eq!(evaluate_str("x", &mut env), Value::Int(6));
}

#[test]
fn assignments_inside_logical_operands_run_left_to_right() {
    let mut env = Environment::new();
    let v = evaluate_str("(a := false) && (b := a == false)", &mut env);
    assert_eq!(v, Value::Bool(false));
    assert_eq!(env.local("b"), Some(&Value::Bool(true)));
}

#[test]
fn undefined_variable_is_null() {
    assert_eq!(eval("Missing"), Value::Null);
    assert_eq!(eval("Missing == null"), Value::Bool(true));
}

#[test]
fn comparisons() {
    assert_eq!(eval("1 < 2.5"), Value::Bool(true));
    assert_eq!(eval("2.0 == 2"), Value::Bool(true));
    assert_eq!(eval("\"abc\" < \"abd\""), Value::Bool(true));
    assert_eq!(eval("\"B\" < \"a\""), Value::Bool(true));
    assert_eq!(eval("true == true"), Value::Bool(true));
    assert_eq!(eval("true != false"), Value::Bool(true));
}

#[test]
fn incompatible_operands_fail_closed() {
    assert_eq!(eval_err("\"a\" < 1"), "Cannot apply '<' to Str and Int");
    assert_eq!(eval_err("true < false"), "Cannot apply '<' to Bool and Bool");
    assert_eq!(eval_err("\"a\" - 1"), "Cannot apply '-' to Str and Int");
    assert_eq!(eval_err("1 && true"), "Expected a boolean, found Int");
    assert_eq!(eval_err("-\"a\""), "Cannot apply unary '-' to Str");
}

#[test]
fn integer_arithmetic_is_checked() {
    assert_eq!(eval_err("1 / 0"), "Division by zero");
    assert_eq!(eval_err("1 % 0"), "Division by zero");
    assert_eq!(
        eval_err("9223372036854775807 + 1"),
        "Integer overflow in '+'"
    );
    assert_eq!(eval("1.0 / 0"), Value::Float(f64::INFINITY));
}

#[test]
fn unary_operators() {
    assert_eq!(eval("-5 + 2"), Value::Int(-3));
    assert_eq!(eval("+2.5"), Value::Float(2.5));
    assert_eq!(eval("!false"), Value::Bool(true));
    assert_eq!(eval("!null"), Value::Bool(true));
    assert_eq!(eval("--4"), Value::Int(4));
}

#[test]
fn logical_operators() {
    assert_eq!(eval("true && false || true"), Value::Bool(true));
    assert_eq!(eval("null || true"), Value::Bool(true));
    assert_eq!(eval("1 < 2 && 3 < 4"), Value::Bool(true));
}

#[test]
fn parse_errors_surface_as_error_values() {
    let node = parse_str("null is null").expect("lex ok");
    let v = evaluate(&node, &mut Environment::new());
    assert_eq!(
        v,
        Value::Error("Not all source matched. Only 1 of 3 tokens consumed.".to_string())
    );
}

#[test]
fn lex_errors_surface_as_error_values() {
    assert!(eval("\"open").is_error());
}

#[test]
fn large_literals_promote() {
    assert_eq!(eval("2147483648"), Value::Int(2_147_483_648));
    assert!(matches!(eval("9223372036854775808"), Value::Float(_)));
    assert_eq!(eval("5d"), Value::Float(5.0));
    assert_eq!(eval("5L"), Value::Int(5));
}

#[test]
fn flat_chains_evaluate_or_fail_cleanly() {
    let src = vec!["1"; 200].join(" + ");
    assert_eq!(eval(&src), Value::Int(200));

    let src = vec!["1"; 5000].join("+");
    assert!(eval_err(&src).contains("nesting"));
}
