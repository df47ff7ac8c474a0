//! Jumps, loops and concurrent bodies.

use super::*;

#[should_fail(STRUCTURAL_CONTROL_FLOW_ERROR)]
#[test]
fn break_outside_a_loop() -> &'static str {
    "
    fn f() {
        break;
    }
    "
}

#[should_fail(STRUCTURAL_CONTROL_FLOW_ERROR)]
#[test]
fn continue_outside_a_loop() -> &'static str {
    "
    continue;
    "
}

#[should_fail(STRUCTURAL_CONTROL_FLOW_ERROR)]
#[test]
fn break_out_of_a_spawned_body() -> &'static str {
    "
    fn f() {
        loop {
            spawn {
                break;
            }
        }
    }
    "
}

#[should_fail(STRUCTURAL_CONTROL_FLOW_ERROR)]
#[test]
fn return_out_of_a_spawned_body() -> &'static str {
    "
    fn f() {
        spawn {
            return;
        }
    }
    "
}

#[tether_test]
#[test]
fn loops_inside_spawned_bodies() -> &'static str {
    "
    fn more() -> Bool;

    fn f() {
        spawn {
            while more() {
                if more() {
                    break;
                }
                continue;
            }
        }
    }
    "
}

#[should_fail(STRUCTURAL_CONTROL_FLOW_ERROR)]
#[test]
fn malformed_functions_are_not_analyzed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f(t: consuming Token) {
        take(t);
        take(t);
        break;
    }
    "
}

#[should_fail(STRUCTURAL_CONTROL_FLOW_ERROR, USE_AFTER_CONSUME_ERROR)]
#[test]
fn other_functions_are_still_analyzed() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f() {
        break;
    }

    fn g(t: consuming Token) {
        take(t);
        take(t);
    }
    "
}

#[tether_test]
#[test]
fn spawned_bodies_own_their_values() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);

    fn f() {
        spawn {
            let t = Token(id: 1);
            take(t);
        }
    }
    "
}

#[tether_test]
#[test]
fn nested_loops() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn more() -> Bool;

    fn f() {
        while more() {
            var t = Token(id: 1);
            loop {
                take(t);
                t = Token(id: 2);
                if more() {
                    break;
                }
            }
        }
    }
    "
}

#[should_fail(INCONSISTENT_MERGE_ERROR)]
#[test]
fn breaking_out_of_an_inner_loop_after_consumption() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn take(t: consuming Token);
    fn more() -> Bool;

    fn f() {
        var t = Token(id: 1);
        while more() {
            loop {
                take(t);
                break;
            }
        }
    }
    "
}

#[tether_test]
#[test]
fn values_declared_in_a_loop_are_destroyed_before_breaking() -> &'static str {
    "
    struct Token: ~Copyable { id: Int }
    fn more() -> Bool;

    fn f() {
        loop {
            let t = Token(id: 1);
            if more() {
                break;
            }
        }
    }
    "
}
