//! Storage accessed by a borrow cannot be modified until the borrow ends.

use super::*;

#[tether_test]
#[test]
fn several_borrows() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn compare(a: borrowing Token, b: borrowing Token);

    let t = Token(id: 1);
    compare(t, t);
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn mutated_while_borrowed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn update(a: borrowing Token, b: inout Token);

    var t = Token(id: 1);
    update(t, t);
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn mutated_by_a_nested_call_while_borrowed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn touch(t: inout Token) -> Int;
    fn pair(t: borrowing Token, n: Int);

    var t = Token(id: 1);
    pair(t, touch(t));
    "
}

#[tether_test]
#[test]
fn nested_call_after_the_borrow_ends() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn touch(t: inout Token) -> Int;
    fn show(t: borrowing Token);
    fn count(n: Int);

    var t = Token(id: 1);
    show(t);
    count(touch(t));
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn read_while_mutated() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn update(a: inout Token, b: borrowing Token);

    var t = Token(id: 1);
    update(t, t);
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn mutated_twice_at_once() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn swap(a: inout Token, b: inout Token);

    fn f(t: inout Token) {
        swap(t, t);
    }
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn copied_field_while_mutated() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn reset(t: inout Token, id: Int);

    fn f(t: inout Token) {
        reset(t, t.id);
    }
    "
}

#[tether_test]
#[test]
fn copied_field_while_borrowed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn show(t: borrowing Token, id: consuming Int);

    fn f(t: borrowing Token) {
        show(t, t.id);
    }
    "
}

#[tether_test]
#[test]
fn disjoint_fields() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn update(a: borrowing Token, b: inout Token);

    fn f(p: inout Pair) {
        update(p.left, p.right);
        update(p.right, p.left);
    }
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn same_field() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn update(a: borrowing Token, b: inout Token);

    fn f(p: inout Pair) {
        update(p.left, p.left);
    }
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn field_mutated_while_whole_is_borrowed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    struct Pair: ~Copyable { left: Token, right: Token }
    fn update(a: borrowing Pair, b: inout Token);

    fn f(p: inout Pair) {
        update(p, p.right);
    }
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn mutated_during_a_borrowing_match() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Slot: ~Copyable { full(Token), empty }
    fn refill(s: inout Slot);

    fn f(s: inout Slot) {
        match s {
            full(t) => {
                refill(s);
            }
            empty => {}
        }
    }
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR, OVERLAPPING_ACCESS_ERROR)]
#[test]
fn consumed_during_a_borrowing_match() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Slot: ~Copyable { full(Token), empty }
    fn drop_slot(s: consuming Slot);

    fn f() {
        var s = Slot::empty;
        match s {
            full(t) => {
                drop_slot(s);
            }
            empty => {
                drop_slot(s);
            }
        }
    }
    "
}

#[should_fail(OVERLAPPING_ACCESS_ERROR)]
#[test]
fn assigned_during_a_borrowing_match() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Slot: ~Copyable { full(Token), empty }

    fn f() {
        var s = Slot::empty;
        match s {
            full(t) => {
                s = Slot::empty;
            }
            empty => {}
        }
    }
    "
}

#[tether_test]
#[test]
fn mutated_after_a_borrowing_match() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    enum Slot: ~Copyable { full(Token), empty }
    fn refill(s: inout Slot);
    fn show(t: borrowing Token);

    fn f(s: inout Slot) {
        match s {
            full(t) => {
                show(t);
            }
            empty => {}
        }
        refill(s);
    }
    "
}

#[tether_test]
#[test]
fn borrow_ends_with_the_call() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn show(t: borrowing Token);
    fn touch(t: inout Token);
    fn take(t: consuming Token);

    fn f(t: inout Token) {
        show(t);
        touch(t);
        show(t);
        take(t);
        t = Token(id: 2);
    }
    "
}
