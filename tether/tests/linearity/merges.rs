//! Paths that merge must agree on what they consumed.

use super::*;

#[tether_test]
#[test]
fn consumed_on_both_branches() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            take(t);
        } else {
            take(t);
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn consumed_on_one_branch() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            take(t);
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn used_again_after_an_inconsistent_merge() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn show(t: borrowing Token);

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            take(t);
        } else {
            show(t);
        }
        show(t);
        take(t);
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn one_report_per_binding_per_merge() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, a: Bool, b: Bool) {
        if a {
            take(t);
        } else if b {
            show(t);
        } else {
            show(t);
        }
    }

    fn show(t: borrowing Token);
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR, INCONSISTENT_MERGE_ERROR)]
#[test]
fn each_binding_is_reported() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(a: consuming Token, b: consuming Token, flag: Bool) {
        if flag {
            take(a);
            take(b);
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn initialized_on_one_branch() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }

    fn f(flag: Bool) {
        var t: Token;
        if flag {
            t = Token(id: 1);
        }
    }
    "
}

#[tether_test]
#[test]
fn initialized_on_both_branches() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(flag: Bool) {
        var t: Token;
        if flag {
            t = Token(id: 1);
        } else {
            t = Token(id: 2);
        }
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn divergent_branches_do_not_merge() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            take(t);
        } else {
            fatal_error();
        }
    }
    "
}

#[tether_test]
#[test]
fn divergence_after_consumption() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn show(t: borrowing Token);

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            take(t);
            exit();
        }
        show(t);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn user_functions_can_diverge() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn crash(reason: Int) -> Never;

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            crash(1);
        }
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn returning_branches_do_not_merge() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, flag: Bool) {
        if flag {
            take(t);
            return;
        }
        take(t);
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn consumed_in_a_loop() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, flag: Bool) {
        while flag {
            take(t);
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn consumed_in_an_infinite_loop() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        loop {
            take(t);
        }
    }
    "
}

#[tether_test]
#[test]
fn reinitialized_in_a_loop() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(flag: Bool) {
        var t = Token(id: 0);
        while flag {
            take(t);
            t = Token(id: 1);
        }
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn consumed_once_before_breaking() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        loop {
            take(t);
            break;
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn consumed_before_continuing() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token, flag: Bool) {
        while flag {
            take(t);
            continue;
        }
    }
    "
}

#[tether_test]
#[test]
fn loop_ending_in_divergence() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        loop {
            take(t);
            fatal_error();
        }
    }
    "
}

#[tether_test]
#[test]
fn loop_local_values() -> &'static str {
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
