//! Parameter conventions decide who owns the argument.

use super::*;

#[should_fail(BORROWED_CONSUME_ERROR)]
#[test]
fn borrowed_parameter_consumed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: borrowing Token) {
        take(t);
    }
    "
}

#[should_fail(BORROWED_CONSUME_ERROR)]
#[test]
fn default_convention_borrows() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: Token) {
        take(t);
    }
    "
}

#[should_fail(BORROWED_CONSUME_ERROR)]
#[test]
fn borrowed_field_consumed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take(t: consuming Token);

    fn f(p: borrowing Pair) {
        take(p.left);
    }
    "
}

#[tether_test]
#[test]
fn borrowed_parameter_passed_along() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn show(t: borrowing Token);

    fn f(t: borrowing Token) {
        show(t);
        show(t);
    }
    "
}

#[tether_test]
#[test]
fn inout_parameter_reinitialized() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn refresh(t: inout Token) {
        take(t);
        t = Token(id: 0);
    }
    "
}

#[should_fail(MISSING_REINIT_ERROR)]
#[test]
fn inout_parameter_left_consumed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn refresh(t: inout Token) {
        take(t);
    }
    "
}

#[should_fail(MISSING_REINIT_ERROR)]
#[test]
fn inout_parameter_consumed_before_returning() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn refresh(t: inout Token, flag: Bool) {
        if flag {
            take(t);
            return;
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn inout_parameter_consumed_on_one_path() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn refresh(t: inout Token, flag: Bool) {
        if flag {
            take(t);
        }
    }
    "
}

#[tether_test]
#[test]
fn inout_parameter_consumed_before_diverging() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn refresh(t: inout Token) {
        take(t);
        fatal_error();
    }
    "
}

#[should_fail(IMMUTABLE_ASSIGN_ERROR)]
#[test]
fn consumed_parameters_are_immutable() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        take(t);
        t = Token(id: 0);
    }
    "
}
