//! Destruction points of owned values.

use super::*;

/// Names of the destroyed bindings of a function, with the destroyed fields.
fn destroyed(f: &CheckedFun) -> Vec<(String, Option<Vec<usize>>)> {
    f.deinits
        .iter()
        .map(|point| {
            (
                f.fun.bindings[point.binding].name.clone(),
                point.fields.clone(),
            )
        })
        .collect()
}

#[test]
fn unconsumed_values_are_destroyed_at_scope_end() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }

        fn f() {
            let t = Token(id: 1);
        }
        ",
    )?;
    let f = find(&p.funs, "f")?;
    assert_eq!(destroyed(f), vec![("t".to_string(), None)]);
    Ok(())
}

#[test]
fn consumed_values_are_not_destroyed() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }
        fn take(t: consuming Token);

        fn f(t: consuming Token) {
            take(t);
        }
        ",
    )?;
    assert!(find(&p.funs, "f")?.deinits.is_empty());
    Ok(())
}

#[test]
fn only_owned_values_are_destroyed() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }

        fn f(a: borrowing Token, b: inout Token, c: consuming Token) {}
        ",
    )?;
    let f = find(&p.funs, "f")?;
    assert_eq!(destroyed(f), vec![("c".to_string(), None)]);
    Ok(())
}

#[test]
fn copyable_values_are_never_destroyed() -> Result<()> {
    let p = checked(
        "
        struct Point { x: Int, y: Int }

        let p = Point(x: 1, y: 2);
        let n = 3;
        ",
    )?;
    assert!(p.funs.iter().all(|f| f.deinits.is_empty()));
    Ok(())
}

#[test]
fn remaining_fields_are_destroyed() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }
        struct Trio: ~Copyable { a: Token, b: Token, c: Token }
        fn take(t: consuming Token);

        fn f(t: consuming Trio) {
            take(t.b);
        }
        ",
    )?;
    let f = find(&p.funs, "f")?;
    assert_eq!(destroyed(f), vec![("t".to_string(), Some(vec![0, 2]))]);
    Ok(())
}

#[test]
fn overwritten_values_are_destroyed() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }

        fn f() {
            var t = Token(id: 1);
            t = Token(id: 2);
        }
        ",
    )?;
    let f = find(&p.funs, "f")?;
    assert_eq!(
        destroyed(f),
        vec![("t".to_string(), None), ("t".to_string(), None)]
    );
    Ok(())
}

#[test]
fn early_exits_destroy_what_they_leave() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }
        fn take(t: consuming Token);

        fn f(t: consuming Token, flag: Bool) {
            if flag {
                return;
            }
            take(t);
        }
        ",
    )?;
    let f = find(&p.funs, "f")?;
    assert_eq!(destroyed(f), vec![("t".to_string(), None)]);
    Ok(())
}

#[test]
fn diverging_paths_destroy_nothing() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }

        fn f(t: consuming Token) {
            fatal_error();
        }
        ",
    )?;
    assert!(find(&p.funs, "f")?.deinits.is_empty());
    Ok(())
}

#[test]
fn destruction_points_are_in_the_graph() -> Result<()> {
    let p = checked(
        "
        struct Token: ~Copyable { id: Int }

        let a = Token(id: 1);
        let b = Token(id: 2);
        ",
    )?;
    let f = find(&p.funs, "<top-level>")?;
    assert_eq!(f.deinits.len(), 2);
    for point in &f.deinits {
        let block = &f.fun.body[&point.label];
        assert!(block.instrs.iter().any(|instr| matches!(
            &instr.kind,
            InstrKind::Deinit { binding, .. } if *binding == point.binding
        )));
    }
    assert!(f.fun.body.labels().all(|label| f.fun.body[&label]
        .instrs
        .iter()
        .all(|instr| !matches!(instr.kind, InstrKind::ScopeEnd(_)))));
    Ok(())
}

#[test]
fn verdicts_list_every_error_kind() -> Result<()> {
    let funs = verdicts(
        "
        struct Token: ~Copyable { id: Int }
        fn take(t: consuming Token);

        fn twice(t: consuming Token) {
            take(t);
            take(t);
        }

        fn borrowed(t: borrowing Token) {
            take(t);
        }

        fn fine(t: consuming Token) {
            take(t);
        }
        ",
    )?;
    assert_eq!(
        find(&funs, "twice")?.verdict.kinds(),
        vec![ErrorKind::UseAfterConsume]
    );
    assert_eq!(
        find(&funs, "borrowed")?.verdict.kinds(),
        vec![ErrorKind::BorrowedConsume]
    );
    assert!(find(&funs, "fine")?.verdict.is_pass());
    Ok(())
}

#[test]
fn failing_functions_still_get_destruction_points() -> Result<()> {
    let funs = verdicts(
        "
        struct Token: ~Copyable { id: Int }
        fn take(t: consuming Token);

        fn f(t: consuming Token, flag: Bool) {
            let u = Token(id: 1);
            if flag {
                take(t);
            }
        }
        ",
    )?;
    let f = find(&funs, "f")?;
    assert_eq!(f.verdict.kinds(), vec![ErrorKind::InconsistentMerge]);
    assert_eq!(destroyed(f), vec![("u".to_string(), None)]);
    Ok(())
}
