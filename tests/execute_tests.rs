use kit::runtime::interpreter::Interpreter;

fn run(program: &str) -> Interpreter {
    let mut interp = Interpreter::new();
    if let Err(err) = interp.execute(program) {
        panic!("program failed: {}\n  program: {}", err, program);
    }
    interp
}

/// Executes `program` and asserts the rendered value of every expected
/// binding in the top frame, plus the absence of every name in `absent`.
fn expect(program: &str, bindings: &[(&str, &str)], absent: &[&str]) {
    let interp = run(program);
    for (name, value) in bindings {
        assert_eq!(
            interp.get_var(name).as_deref(),
            Some(*value),
            "binding {:?} after {:?}",
            name,
            program
        );
    }
    for name in absent {
        assert_eq!(
            interp.get_var(name),
            None,
            "{:?} leaked into the top frame after {:?}",
            name,
            program
        );
    }
}

fn expect_fails(program: &str) -> String {
    let mut interp = Interpreter::new();
    match interp.execute(program) {
        Err(err) => err,
        Ok(_) => panic!("expected failure: {}", program),
    }
}

#[test]
fn set_binds_inferred_values() {
    expect("set a 4;", &[("a", "4")], &[]);
    expect("set a 4;set b 5;", &[("a", "4"), ("b", "5")], &[]);
    expect("set a 4; set b 5", &[("a", "4"), ("b", "5")], &[]);
    expect("set a 4;set b $a;", &[("a", "4"), ("b", "4")], &[]);
}

#[test]
fn set_with_one_argument_reads_back() {
    expect("set a 7; set b [set a]", &[("a", "7"), ("b", "7")], &[]);
    expect_fails("set nope");
}

#[test]
fn nested_substitutions_propagate_values() {
    expect("set a [set b 7];", &[("a", "7"), ("b", "7")], &[]);
    expect(
        "set a [set b [set c 7]];",
        &[("a", "7"), ("b", "7"), ("c", "7")],
        &[],
    );
}

#[test]
fn adjacent_substitutions_concatenate() {
    expect(
        "set a [set b 7][set c 99];",
        &[("a", "799"), ("b", "7"), ("c", "99")],
        &[],
    );
}

#[test]
fn if_runs_taken_bodies_in_the_enclosing_scope() {
    expect("if {1} {set b 2}", &[("b", "2")], &[]);
    expect("if {5 == 6} {set b 2}", &[], &["b"]);
    expect(
        "if {77 == 77} {set b 2;set c 3;}",
        &[("b", "2"), ("c", "3")],
        &[],
    );
    expect(
        "set ahej 77; if {$ahej == 77} {set b 2;set c 3;}",
        &[("ahej", "77"), ("b", "2"), ("c", "3")],
        &[],
    );
    expect(
        "set a 78; if {$a == 77} {set b 2;set c 3;}",
        &[("a", "78")],
        &["b", "c"],
    );
}

#[test]
fn else_takes_the_untaken_branch() {
    expect(
        "set res 0; set input 5; if {$res == 0} {inc input}; else {dec input}",
        &[("res", "0"), ("input", "6")],
        &[],
    );
    expect(
        "set res 1; set input 5; if {$res == 0} {inc input}; else {dec input}",
        &[("res", "1"), ("input", "4")],
        &[],
    );
}

#[test]
fn elif_chains_evaluate_first_match_only() {
    expect(
        "set res 2; set input 5; if {$res == 0} {inc input}; elseif {$res == 2} {inc input 2; inc res}; else {dec input 2};",
        &[("res", "3"), ("input", "7")],
        &[],
    );
    expect(
        "set res 3; set input 5; if {$res == 0} {inc input}; elseif {$res == 2} {inc input 2; inc res}; elseif {$res == 3} {inc input 4; inc res 4}; else {dec input 2};",
        &[("res", "7"), ("input", "9")],
        &[],
    );
    expect(
        "set res 2; set input 5; if {$res == 0} {inc input}; elif {$res == 2} {inc input 2}",
        &[("res", "2"), ("input", "7")],
        &[],
    );
}

#[test]
fn elif_and_else_need_a_preceding_if() {
    expect_fails("else {set a 1}");
    expect_fails("elif {1} {set a 1}");
    expect_fails("if {1} {set a 1}; set b 2; else {set c 3}");
}

#[test]
fn inc_and_dec_step_numbers() {
    expect(
        "set a 1; inc a; set b 66; inc b 1",
        &[("a", "2"), ("b", "67")],
        &[],
    );
    expect(
        "set a 1; inc a 5; set b 66; inc b $a",
        &[("a", "6"), ("b", "72")],
        &[],
    );
    expect("set a 5; dec a", &[("a", "4")], &[]);
    expect("set a 5; dec a 3", &[("a", "2")], &[]);
    expect("set a 5; decr a; incr a 2", &[("a", "6")], &[]);
}

#[test]
fn inc_of_floats_keeps_the_float_tag() {
    expect("set l 0.0; ; inc l 1.0", &[("l", "1.000000")], &[]);
    expect("set l 1.2; ; inc l", &[("l", "2.200000")], &[]);
}

#[test]
fn inc_rejects_mixed_numeric_tags() {
    let err = expect_fails("set l 1.2; inc l 1;");
    assert_eq!(err, "inc Mismatching types. Line 1");
    let err = expect_fails("set l 1; inc l 0.1;");
    assert_eq!(err, "inc: Mismatching types. Line 1");
}

#[test]
fn inc_rejects_missing_and_non_numeric_variables() {
    expect_fails("inc nope");
    expect_fails("set s hej; inc s");
    expect_fails("set a 1; inc a hopp");
}

#[test]
fn while_loops_until_the_condition_fails() {
    expect(
        "set ii 1; set b 66; while {$ii < 10} {inc ii; inc b 1}",
        &[("ii", "10"), ("b", "75")],
        &[],
    );
    expect(
        "set ii 1; set b 66; while {$b < $ii} {inc ii; inc b 1}",
        &[("ii", "1"), ("b", "66")],
        &[],
    );
    expect("set i 0; while {$i < 10} { inc i }", &[("i", "10")], &[]);
}

#[test]
fn break_leaves_the_innermost_loop() {
    expect(
        "set i 0; while {$i < 10} { inc i; if {$i == 5} { break } }",
        &[("i", "5")],
        &[],
    );
    expect(
        "set tot 0; set i 0; while {$i < 10} { inc i; set j 0; while {$j < 10} { inc j; if {$i > 5} { break }; inc tot}}",
        &[("i", "10"), ("j", "1"), ("tot", "50")],
        &[],
    );
}

#[test]
fn continue_skips_to_the_next_iteration() {
    expect(
        "set j 0; set i 0; while {$i < 10} { inc i; if {$i == 5} { continue }; inc j }",
        &[("i", "10"), ("j", "9")],
        &[],
    );
}

#[test]
fn nested_loops_count_independently() {
    expect(
        "set tot 0; set i 0; while {$i < 10} { inc i; set j 0; while {$j < 10} { inc j; inc tot }}",
        &[("i", "10"), ("j", "10"), ("tot", "100")],
        &[],
    );
}

#[test]
fn loop_runs_until_break() {
    expect(
        "set l 0; ; loop { inc l; if {$l > 5} { break }}",
        &[("l", "6")],
        &[],
    );
}

#[test]
fn statement_separators_tolerate_empty_commands() {
    expect("set l 0; ; inc l 100;", &[("l", "100")], &[]);
    expect("set l 0; ; inc l", &[("l", "1")], &[]);
}

#[test]
fn int_conversion_truncates() {
    expect("set l [int 7.5]", &[("l", "7")], &[]);
    expect("set l [int \"7.5\"]", &[("l", "7")], &[]);
    expect("set l [int 7]", &[("l", "7")], &[]);
    expect_fails("set l [int true]");
    expect_fails("set l [int hej]");
}

#[test]
fn float_conversion_widens() {
    expect("set l [float 7]", &[("l", "7.000000")], &[]);
    expect("set l [float 7.5]", &[("l", "7.500000")], &[]);
    expect("set l [float \"7.5\"]", &[("l", "7.500000")], &[]);
    expect_fails("set l [float true]");
    expect_fails("set l [float hej]");
}

#[test]
fn functions_bind_arguments_into_a_fresh_frame() {
    expect("fn test {} {set b 1;}; set a [test];", &[("a", "1")], &["b"]);
    expect(
        "fn test {a} {set b $a;}; set a [test 5];",
        &[("a", "5")],
        &["b"],
    );
    expect(
        "fn test {b} {set b 7;}; set a [test 5];",
        &[("a", "7")],
        &["b"],
    );
}

#[test]
fn function_defaults_fill_missing_arguments() {
    expect(
        "fn test {a {c 4}} {inc a $c;}; set a [test 5];",
        &[("a", "9")],
        &[],
    );
    expect(
        "fn test {a {c 4}} {inc a $c;}; set a [test 5 3];",
        &[("a", "8")],
        &[],
    );
}

#[test]
fn function_arity_is_enforced() {
    expect_fails("fn test {a {c 4}} {inc a $c;}; set a [test];");
    expect_fails("fn test {a {c 4}} {inc a $c;}; set a [test 1 2 3];");
}

#[test]
fn return_stops_the_body() {
    expect("fn test {} {return 1;}; set a [test];", &[("a", "1")], &[]);
    expect(
        "fn test {a} {set b $a;return 2;}; set a [test 77];",
        &[("a", "2")],
        &["b"],
    );
    expect(
        "fn test {} {return 2;return 3;return 4}; set a [test];",
        &[("a", "2")],
        &[],
    );
}

#[test]
fn redefining_with_a_new_arity_adds_an_overload() {
    expect(
        "fn test {a} {set b $a;return 2;}; fn test {a b} {set b $a;return 3;}; set a [test 77 8];",
        &[("a", "3")],
        &[],
    );
    expect(
        "fn test {a} {set b $a;return 2;}; fn test {a b} {set b $a;return 3;}; set a [test 77];",
        &[("a", "2")],
        &[],
    );
}

#[test]
fn redefining_with_the_same_arity_replaces() {
    expect(
        "fn test {a} {return 1;}; fn test {b} {return 2;}; set a [test 0];",
        &[("a", "2")],
        &[],
    );
}

#[test]
fn anonymous_functions_call_through_their_binding() {
    expect(
        "set hello [fn {} {return 2;}]; set a [hello];",
        &[("a", "2"), ("hello", "return 2;")],
        &[],
    );
}

#[test]
fn lists_build_append_and_measure() {
    expect(
        "set a [list 1 2 3];set b [len a];",
        &[("a", "(1, 2, 3)"), ("b", "3")],
        &[],
    );
    expect("set a [list];set b [len a];", &[("a", "()"), ("b", "0")], &[]);
    expect(
        "set a [list 1]; append a 2 3;set b [len a];",
        &[("a", "(1, 2, 3)"), ("b", "3")],
        &[],
    );
    expect(
        "set a [list 1 2 3]; set b [last a]",
        &[("a", "(1, 2, 3)"), ("b", "3")],
        &[],
    );
    expect(
        "set a [list 9 8 7]; set b [first a]",
        &[("a", "(9, 8, 7)"), ("b", "9")],
        &[],
    );
}

#[test]
fn list_errors_name_the_failure() {
    let err = expect_fails("set a [list]; first a");
    assert_eq!(err, "first: list is empty. Line 1");
    let err = expect_fails("set a 4; last a");
    assert_eq!(err, "last: Given object isn't a list. Line 1");
    expect_fails("len nope");
    expect_fails("set a 4; append a 5");
}

#[test]
fn const_bindings_reject_mutation() {
    expect("const a 5; set b $a", &[("a", "5"), ("b", "5")], &[]);
    let err = expect_fails("const a 5; set a 6");
    assert_eq!(err, "set: Can't change const 'a'. Line: 1");
    expect_fails("const a 5; const a 6");
    expect_fails("const a 5; inc a");
    expect_fails("const a [list 1]; append a 2");
}

#[test]
fn concat_joins_and_reinfers() {
    expect(
        "set a hej; set a [concat $a \" hopp\"];set b [width $a];",
        &[("a", "hej hopp"), ("b", "8")],
        &[],
    );
    expect(
        "set a 1; set a [concat $a 2];set b [width $a];",
        &[("a", "12"), ("b", "2")],
        &[],
    );
}

#[test]
fn width_counts_printed_bytes() {
    expect("set b [width 1234];", &[("b", "4")], &[]);
    expect("set a [width abcdef];", &[("a", "6")], &[]);
    expect("set a [width [float 7]];", &[("a", "8")], &[]);
}

#[test]
fn eval_joins_arguments_into_one_expression() {
    expect("set a [eval 1 + 2]", &[("a", "3")], &[]);
    expect("set i 1; set sum 4; set sum [eval $i+$sum]", &[("sum", "5")], &[]);
    expect("set a [expr 2 * 3]", &[("a", "6")], &[]);
    expect(
        "set sum 0; set i 0; while {$i < 50} {inc i; set sum [eval $i+$sum]};",
        &[("sum", "1275"), ("i", "50")],
        &[],
    );
    let err = expect_fails("eval 1 +");
    assert!(err.starts_with("eval failed with: "), "got: {}", err);
}

#[test]
fn print_returns_its_message() {
    expect("set a [print hej]", &[("a", "hej")], &[]);
    expect("set a [puts {hej hopp}]", &[("a", "hej hopp")], &[]);
}

#[test]
fn unhandled_break_and_continue_are_errors() {
    let err = expect_fails("break");
    assert_eq!(err, "Unhandled break. Line: 1");
    let err = expect_fails("set a 4; continue");
    assert_eq!(err, "Unhandled continue. Line: 1");
}

#[test]
fn unknown_commands_report_their_name() {
    let err = expect_fails("nosuchcmd 1 2");
    assert_eq!(err, "Unknown command: nosuchcmd. Line: 1");
}

#[test]
fn truth_is_bool_or_nonzero_int() {
    expect("if {1} {set a yes}", &[("a", "yes")], &[]);
    expect("if {0} {set a yes}", &[], &["a"]);
    expect("if {1 == 1} {set a yes}", &[("a", "yes")], &[]);
    // the expression shim collapses exact floats to ints, so 2.0 loops
    expect("if {1.0 + 1.0} {set a yes}", &[("a", "yes")], &[]);
}

#[test]
fn comments_are_ignored_at_statement_start() {
    expect("# leading comment\nset a 4\n# trailing comment", &[("a", "4")], &[]);
}

#[test]
fn multiline_programs_track_lines_in_errors() {
    let err = expect_fails("set a 4\nset b $nope");
    assert_eq!(err, "Unknown variable: nope Line: 2");
    let err = expect_fails("set a 4\nset a {b");
    assert_eq!(err, "Premature end of file. Line: 2");
}
