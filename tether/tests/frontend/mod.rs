//! Programs rejected before any ownership analysis.

use super::*;

#[should_fail(PARSER_ERROR)]
#[test]
fn syntax_error() -> &'static str {
    "
    fn f( {
    "
}

#[should_fail(UNKNOWN_VAR_ERROR)]
#[test]
fn unknown_variable() -> &'static str {
    "
    fn show(n: borrowing Int);

    show(n);
    "
}

#[should_fail(UNKNOWN_VAR_ERROR)]
#[test]
fn functions_cannot_see_top_level_bindings() -> &'static str {
    "
    fn show(n: borrowing Int);

    let n = 1;

    fn f() {
        show(n);
    }
    "
}

#[should_fail(UNKNOWN_FUN_ERROR)]
#[test]
fn unknown_function() -> &'static str {
    "
    launch(1);
    "
}

#[should_fail(UNKNOWN_TYPE_ERROR)]
#[test]
fn unknown_type() -> &'static str {
    "
    fn f(t: consuming Ticket) {}
    "
}

#[should_fail(ARITY_ERROR)]
#[test]
fn wrong_number_of_arguments() -> &'static str {
    "
    fn show(n: borrowing Int);

    show(1, 2);
    "
}

#[should_fail(ARITY_ERROR)]
#[test]
fn wrong_number_of_type_arguments() -> &'static str {
    "
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }

    fn f(m: consuming Maybe) {}
    "
}

#[should_fail(ARITY_ERROR)]
#[test]
fn repeated_field_label() -> &'static str {
    "
    struct Buffer: ~Copyable { id: Int, len: Int }

    let b = Buffer(id: 1, id: 2);
    "
}

#[should_fail(FIELD_ACCESS_ERROR)]
#[test]
fn unknown_field() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn show(n: borrowing Int);

    fn f(t: borrowing Token) {
        show(t.serial);
    }
    "
}

#[should_fail(IMMUTABLE_ASSIGN_ERROR)]
#[test]
fn assignment_to_an_immutable_binding() -> &'static str {
    "
    let n = 1;
    n = 2;
    "
}

#[should_fail(IMMUTABLE_ASSIGN_ERROR)]
#[test]
fn deferred_initialization_happens_once() -> &'static str {
    "
    let n: Int;
    n = 1;
    n = 2;
    "
}

#[should_fail(UNKNOWN_CASE_ERROR)]
#[test]
fn unknown_case() -> &'static str {
    "
    enum Light { red, green }

    let l = Light::blue;
    "
}

#[should_fail(TYPE_MISMATCH_ERROR)]
#[test]
fn type_mismatch() -> &'static str {
    "
    let n: Int = true;
    "
}

#[should_fail(TYPE_MISMATCH_ERROR)]
#[test]
fn non_boolean_condition() -> &'static str {
    "
    if 1 {}
    "
}

#[should_fail(TYPE_MISMATCH_ERROR)]
#[test]
fn boxing_needs_an_existential() -> &'static str {
    "
    let n = 1 as Int;
    "
}

#[should_fail(UNKNOWN_VAR_ERROR)]
#[test]
fn frontend_errors_stop_the_analysis() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        take(t);
        take(t);
        take(u);
    }
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR, USE_AFTER_CONSUME_ERROR)]
#[test]
fn generic_restrictions_do_not_stop_the_analysis() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn ignore<T>(x: borrowing T);

    fn f(t: consuming Token) {
        ignore(t);
        take(t);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn comments_are_ignored() -> &'static str {
    "
    // A move-only resource
    struct Token: ~Copyable { id: Int } // with an identifier
    fn take(t: consuming Token);

    // Consumed exactly once
    take(Token(id: 1));
    "
}

#[test]
fn diagnostics_are_rendered() -> Result<()> {
    let input = unindent::unindent(
        "
        struct Token: ~Copyable { id: Int }
        fn take(t: consuming Token);

        let t = Token(id: 1);
        take(t);
        take(t);
        ",
    );
    let mut ctx = Context::new(Config::with_input(&input));
    let Err(diagnostics) = check(&mut ctx)? else {
        return Err(anyhow!("program should not pass the check"));
    };
    let rendered = diagnostics.render()?;
    assert!(rendered.contains(USE_AFTER_CONSUME_ERROR));
    assert!(rendered.contains("`t` is used after being consumed"));
    assert!(rendered.contains("consumed here"));
    Ok(())
}
