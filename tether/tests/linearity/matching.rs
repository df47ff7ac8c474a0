//! Pattern matching over enumerations with move-only payloads.

use super::*;

#[tether_test]
#[test]
fn consuming_match_over_a_generic_payload() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn take(t: consuming Token);

    fn f(m: consuming Maybe<Token>) {
        match consume m {
            just(t) => {
                take(t);
            }
            none => {}
        }
    }
    "
}

#[tether_test]
#[test]
fn unconsumed_payloads_are_destroyed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }

    fn f(m: consuming Maybe<Token>) {
        match consume m {
            just(t) => {}
            none => {}
        }
    }
    "
}

#[tether_test]
#[test]
fn generic_unwrapping() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn take(t: consuming Token);

    fn unwrap_or<T: ~Copyable>(m: consuming Maybe<T>, fallback: consuming T) -> T {
        match consume m {
            just(value) => {
                return value;
            }
            none => {
                return fallback;
            }
        }
    }

    take(unwrap_or(Maybe::just(Token(id: 1)), Token(id: 2)));
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn scrutinee_used_after_a_consuming_match() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn show(m: borrowing Maybe<Token>);

    fn f(m: consuming Maybe<Token>) {
        match consume m {
            just(t) => {}
            none => {}
        }
        show(m);
    }
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn payload_consumed_twice() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn take(t: consuming Token);

    fn f(m: consuming Maybe<Token>) {
        match consume m {
            just(t) => {
                take(t);
                take(t);
            }
            none => {}
        }
    }
    "
}

#[should_fail(BORROWED_CONSUME_ERROR)]
#[test]
fn payload_of_a_borrowing_match_consumed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn take(t: consuming Token);

    fn f(m: borrowing Maybe<Token>) {
        match m {
            just(t) => {
                take(t);
            }
            none => {}
        }
    }
    "
}

#[tether_test]
#[test]
fn borrowing_match_keeps_the_scrutinee() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn show(t: borrowing Token);
    fn drop_maybe(m: consuming Maybe<Token>);

    fn f(m: consuming Maybe<Token>) {
        match m {
            just(t) => {
                show(t);
            }
            none => {}
        }
        drop_maybe(m);
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn arms_disagree() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }
    fn take(t: consuming Token);

    fn f(m: consuming Maybe<Token>, t: consuming Token) {
        match consume m {
            just(u) => {
                take(u);
                take(t);
            }
            none => {}
        }
    }
    "
}

#[should_fail(UNKNOWN_CASE_ERROR)]
#[test]
fn match_must_be_exhaustive() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Maybe<T: ~Copyable>: ~Copyable { just(T), none }

    fn f(m: consuming Maybe<Token>) {
        match consume m {
            just(t) => {}
        }
    }
    "
}
