//! Each move-only value is consumed at most once.

use super::*;

#[tether_test]
#[test]
fn consumed_once() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn show(t: borrowing Token);

    let t = Token(id: 1);
    show(t);
    show(t);
    take(t);
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn consumed_twice() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    let t = Token(id: 1);
    take(t);
    take(t);
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn borrowed_after_consumption() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn show(t: borrowing Token);

    fn f(t: consuming Token) {
        take(t);
        show(t);
    }
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR, USE_AFTER_CONSUME_ERROR)]
#[test]
fn every_use_after_consumption_is_reported() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn show(t: borrowing Token);

    fn f(t: consuming Token) {
        take(t);
        show(t);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn copyable_values_are_copied() -> &'static str {
    "
    fn take(i: consuming Int);

    fn f(i: consuming Int) {
        take(i);
        take(i);
    }
    "
}

#[tether_test]
#[test]
fn moved_into_a_new_binding() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        let u = t;
        take(u);
    }
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn used_after_being_moved_into_a_new_binding() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        let u = t;
        take(u);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn reinitialized_after_consumption() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f() {
        var t = Token(id: 1);
        take(t);
        t = Token(id: 2);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn deferred_initialization() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f() {
        let t: Token;
        t = Token(id: 1);
        take(t);
    }
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn deferred_initialization_repeated_by_a_loop() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn more() -> Bool;

    fn f() {
        let t: Token;
        while more() {
            t = Token(id: 1);
            take(t);
        }
    }
    "
}

#[tether_test]
#[test]
fn immutable_bindings_declared_in_a_loop() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn more() -> Bool;

    fn f() {
        while more() {
            let t = Token(id: 1);
            take(t);
        }
    }
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn used_before_initialization() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f() {
        let t: Token;
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn returned_values_are_consumed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }

    fn make() -> Token {
        let t = Token(id: 1);
        return t;
    }
    "
}

#[tether_test]
#[test]
fn fields_are_consumed_separately() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take(t: consuming Token);

    fn f(p: consuming Pair) {
        take(p.left);
        take(p.right);
    }
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn field_consumed_twice() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take(t: consuming Token);

    fn f(p: consuming Pair) {
        take(p.left);
        take(p.left);
    }
    "
}

#[should_fail(PARTIAL_USE_ERROR)]
#[test]
fn whole_use_after_partial_consumption() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take(t: consuming Token);
    fn show(p: borrowing Pair);

    fn f(p: consuming Pair) {
        take(p.left);
        show(p);
    }
    "
}

#[tether_test]
#[test]
fn field_reinitialized_after_consumption() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take(t: consuming Token);
    fn take_pair(p: consuming Pair);

    fn f() {
        var p = Pair(left: Token(id: 1), right: Token(id: 2));
        take(p.left);
        p.left = Token(id: 3);
        take_pair(p);
    }
    "
}

#[should_fail(PARTIAL_USE_ERROR)]
#[test]
fn field_reinitialized_into_a_consumed_value() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take_pair(p: consuming Pair);

    fn f() {
        var p = Pair(left: Token(id: 1), right: Token(id: 2));
        take_pair(p);
        p.left = Token(id: 3);
    }
    "
}

#[tether_test]
#[test]
fn copyable_fields_are_copied() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn take_int(i: consuming Int);

    fn f(t: consuming Token) {
        take_int(t.id);
        take_int(t.id);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn positional_initializers() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take_pair(p: consuming Pair);

    let a = Token(1);
    let b = Token(2);
    take_pair(Pair(a, b));
    "
}

#[should_fail(USE_AFTER_CONSUME_ERROR)]
#[test]
fn consumed_twice_in_one_initializer() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn take_pair(p: consuming Pair);

    let a = Token(1);
    take_pair(Pair(a, a));
    "
}
