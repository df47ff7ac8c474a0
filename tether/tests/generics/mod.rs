//! Generic instantiation gate.
//!
//! Every generic position declares the capabilities it requires. Anything
//! that does not provide them is rejected, whatever the generic code does
//! with it.

use super::*;

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_argument_to_an_unconstrained_function() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn id<T>(x: consuming T) -> T {
        return x;
    }

    id(Token(id: 1));
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn rejection_does_not_depend_on_usage() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn ignore<T>(x: borrowing T) {}

    let t = Token(id: 1);
    ignore(t);
    "
}

#[tether_test]
#[test]
fn suppressed_requirement_accepts_move_only_arguments() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn ignore<T: ~Copyable>(x: borrowing T) {}

    let t = Token(id: 1);
    ignore(t);
    "
}

#[tether_test]
#[test]
fn copyable_arguments_are_accepted() -> &'static str {
    "
    fn id<T>(x: consuming T) -> T {
        return x;
    }

    id(1);
    id(true);
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_collection_literal() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }

    let tokens = [Token(id: 1)];
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_collection_type() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn count(tokens: borrowing [Token]) -> Int;
    "
}

#[tether_test]
#[test]
fn copyable_collections() -> &'static str {
    "
    fn count(items: borrowing [Int]) -> Int;

    let items = [1, 2, 3];
    count(items);
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_value_in_an_existential_slot() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }

    let t = Token(id: 1);
    print(t);
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_value_boxed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }

    let boxed = Token(id: 1) as any;
    "
}

#[tether_test]
#[test]
fn move_only_value_boxed_into_a_move_only_existential() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(value: consuming any ~Copyable);

    take(Token(id: 1) as any ~Copyable);
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_explicit_type_argument() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Box<T> { value: T }

    fn f(b: borrowing Box<Token>) {}
    "
}

#[tether_test]
#[test]
fn conditionally_copyable_containers() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Wrap<T: ~Copyable> { value: T }
    fn take(w: consuming Wrap<Token>);

    let w = Wrap(value: Token(id: 1));
    take(w);
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn containers_of_move_only_values_are_move_only() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Wrap<T: ~Copyable> { value: T }
    fn take(w: consuming Wrap<Token>);

    let w = Wrap(value: Token(id: 1));
    take(w);
    take(w);
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn containers_of_move_only_values_are_rejected() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Wrap<T: ~Copyable> { value: T }
    fn dup<T>(x: borrowing T);

    dup(Wrap(value: Token(id: 1)));
    "
}

#[tether_test]
#[test]
fn containers_of_copyable_values_are_accepted() -> &'static str {
    "
    struct Wrap<T: ~Copyable> { value: T }
    fn dup<T>(x: borrowing T);

    dup(Wrap(value: 1));
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn non_escapable_argument() -> &'static str {
    "
    struct View: ~Escapable { len: Int }
    fn keep<T: ~Copyable>(x: borrowing T);

    keep(View(len: 1));
    "
}

#[tether_test]
#[test]
fn non_escapable_argument_accepted() -> &'static str {
    "
    struct View: ~Escapable { len: Int }
    fn keep<T: ~Copyable + ~Escapable>(x: borrowing T);

    keep(View(len: 1));
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR, GENERIC_RESTRICTION_ERROR)]
#[test]
fn every_missing_capability_is_reported_once_per_site() -> &'static str {
    "
    struct Handle: ~Copyable, ~Escapable { fd: Int }
    fn keep<T: ~Escapable>(x: borrowing T);
    fn hold<T: ~Copyable>(x: borrowing T);

    fn f(h: borrowing Handle) {
        keep(h);
        hold(h);
    }
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn conformance_of_a_move_only_type() -> &'static str {
    "
    protocol Named {}
    struct Token: ~Copyable, Named { id: Int }
    "
}

#[tether_test]
#[test]
fn conformance_to_a_move_only_protocol() -> &'static str {
    "
    protocol Named: ~Copyable {}
    struct Token: ~Copyable, Named { id: Int }
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn move_only_associated_type() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    protocol Container: ~Copyable { type Item; }
    struct Bag: ~Copyable, Container<Item = Token> { item: Token }
    "
}

#[tether_test]
#[test]
fn move_only_associated_type_accepted() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    protocol Container: ~Copyable { type Item: ~Copyable; }
    struct Bag: ~Copyable, Container<Item = Token> { item: Token }
    "
}

#[should_fail(GENERIC_RESTRICTION_ERROR)]
#[test]
fn dynamic_cast_targets_are_gated() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Box<T> { value: T }

    let b = 1 as! Box<Token>;
    "
}

#[tether_test]
#[test]
fn dynamic_casts_need_no_existential() -> &'static str {
    "
    fn id<T>(x: consuming T) -> T {
        return x;
    }

    let n = 1 as! Int;
    id(n);
    "
}

#[test]
fn restrictions_belong_to_the_verdict_of_their_function() -> Result<()> {
    let funs = verdicts(
        "
        struct Token: ~Copyable { id: Int }
        fn id<T>(x: consuming T) -> T;

        fn f() {
            let a = Token(id: 1);
            id(a);
        }

        fn g() {
            let b = Token(id: 2);
        }
        ",
    )?;
    assert_eq!(find(&funs, "f")?.verdict.kinds(), vec![ErrorKind::GenericRestriction]);
    assert!(find(&funs, "g")?.verdict.is_pass());
    Ok(())
}

#[test]
fn rejected_programs_keep_their_verdicts() -> Result<()> {
    let input = unindent::unindent(
        "
        struct Token: ~Copyable { id: Int }
        fn take(t: consuming Token);
        fn keep<T>(x: borrowing T);

        fn f(t: consuming Token) {
            keep(t);
            take(t);
            take(t);
        }

        fn g(t: consuming Token) {
            take(t);
        }
        ",
    );
    let mut ctx = Context::new(Config::with_input(&input));
    let Err(rejected) = check(&mut ctx)? else {
        return Err(anyhow!("program should not pass the check"));
    };
    let checked = rejected
        .checked
        .ok_or_else(|| anyhow!("the linearity checker should have run"))?;
    assert_eq!(
        find(&checked.funs, "f")?.verdict.kinds(),
        vec![ErrorKind::UseAfterConsume, ErrorKind::GenericRestriction]
    );
    assert!(find(&checked.funs, "g")?.verdict.is_pass());
    Ok(())
}

#[test]
fn frontend_rejections_have_no_verdicts() -> Result<()> {
    let mut ctx = Context::new(Config::with_input("launch(1);"));
    let Err(rejected) = check(&mut ctx)? else {
        return Err(anyhow!("program should not pass the check"));
    };
    assert!(rejected.checked.is_none());
    assert_eq!(rejected.codes(), vec![UNKNOWN_FUN_ERROR.to_string()]);
    Ok(())
}
